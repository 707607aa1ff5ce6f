//! Import transcoder: DOCX package to editor markup
//!
//! A .docx file is a ZIP archive of XML parts. The converter locates the main
//! document part through the package relationships, resolves paragraph and
//! run styles from `word/styles.xml`, and walks the body emitting HTML:
//!
//! - heading styles (`Heading1`-`Heading6`, or names `heading 1`-`heading 6`) → `h1`-`h6`
//! - numbered or bulleted paragraphs → `ul > li`
//! - other paragraphs → `p`; empty paragraphs are skipped
//! - bold / italic runs (direct or via `Strong` / `Emphasis` run styles) → `strong` / `em`
//! - tables → `table > tr > td`
//! - line breaks → `br`

use crate::error::ConversionError;

mod body;
mod package;
mod styles;
mod xml;

use body::BodyWalker;
use package::Package;
use styles::StyleMap;

/// Markup produced from a binary document, with any warnings raised on the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    /// The document as an HTML fragment
    pub markup: String,
    /// Human-readable warnings (unrecognised styles and the like)
    pub messages: Vec<String>,
}

/// Turns document bytes into editor markup
pub trait BinaryToMarkup {
    /// Convert a whole document held in memory
    fn convert(&self, bytes: &[u8]) -> Result<Conversion, ConversionError>;
}

/// Converter for Office Open XML word-processing packages
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxMarkupConverter;

impl BinaryToMarkup for DocxMarkupConverter {
    fn convert(&self, bytes: &[u8]) -> Result<Conversion, ConversionError> {
        let mut package = Package::open(bytes)?;

        let main_part = package.main_document_path()?;
        log::info!("Reading main document part: {}", main_part);

        let styles = match package.read_part(styles::STYLES_PART)? {
            Some(xml) => StyleMap::parse(&xml)?,
            None => {
                log::debug!("Package has no {}", styles::STYLES_PART);
                StyleMap::default()
            }
        };

        let document_xml = package.read_required(&main_part)?;
        let conversion = BodyWalker::new(&styles).walk(&document_xml, &main_part)?;

        log::info!(
            "Converted document to {} bytes of markup ({} messages)",
            conversion.markup.len(),
            conversion.messages.len()
        );
        Ok(conversion)
    }
}

/// Import a DOCX document, logging any conversion messages as warnings
///
/// # Errors
/// * `ConversionError` - the bytes are not a readable .docx package
pub fn import_docx(bytes: &[u8]) -> Result<String, ConversionError> {
    let conversion = DocxMarkupConverter.convert(bytes)?;
    for message in &conversion.messages {
        log::warn!("{}", message);
    }
    Ok(conversion.markup)
}


#[cfg(test)]
mod tests {
    use super::test_support::{document_xml, package};
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="berschrift1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Quote"><w:name w:val="Quote"/></w:style>
</w:styles>"#;

    #[test]
    fn test_convert_headings_paragraphs_and_runs() {
        // Arrange
        let body = concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>world</w:t></w:r></w:p>"#,
        );
        let bytes = package(&[("word/document.xml", &document_xml(body))]);

        // Act
        let conversion = DocxMarkupConverter.convert(&bytes).unwrap();

        // Assert
        assert_eq!(conversion.markup, "<h1>Title</h1><p>Hello <em>world</em></p>");
        assert!(conversion.messages.is_empty());
    }

    #[test]
    fn test_heading_resolved_by_style_name() {
        let body = r#"<w:p><w:pPr><w:pStyle w:val="berschrift1"/></w:pPr><w:r><w:t>Titel</w:t></w:r></w:p>"#;
        let bytes = package(&[
            ("word/document.xml", &document_xml(body)),
            ("word/styles.xml", STYLES),
        ]);

        let markup = import_docx(&bytes).unwrap();
        assert_eq!(markup, "<h1>Titel</h1>");
    }

    #[test]
    fn test_unrecognised_style_produces_message() {
        let body = r#"<w:p><w:pPr><w:pStyle w:val="Quote"/></w:pPr><w:r><w:t>Said</w:t></w:r></w:p>"#;
        let bytes = package(&[
            ("word/document.xml", &document_xml(body)),
            ("word/styles.xml", STYLES),
        ]);

        let conversion = DocxMarkupConverter.convert(&bytes).unwrap();
        assert_eq!(conversion.markup, "<p>Said</p>");
        assert_eq!(
            conversion.messages,
            vec!["Unrecognised paragraph style: 'Quote' (Style ID: Quote)".to_string()]
        );
    }

    #[test]
    fn test_main_part_found_through_relationships() {
        let rels = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/content/main.xml"/>
</Relationships>"#;
        let body = r#"<w:p><w:r><w:t>Moved</w:t></w:r></w:p>"#;
        let bytes = package(&[("_rels/.rels", rels), ("content/main.xml", &document_xml(body))]);

        assert_eq!(import_docx(&bytes).unwrap(), "<p>Moved</p>");
    }

    #[test]
    fn test_not_a_zip_is_conversion_error() {
        let err = import_docx(b"plain text, not a package").unwrap_err();
        assert!(matches!(err, ConversionError::NotAPackage(_)));
    }

    #[test]
    fn test_missing_document_part() {
        let bytes = package(&[("word/styles.xml", STYLES)]);
        let err = import_docx(&bytes).unwrap_err();
        assert!(matches!(err, ConversionError::MissingPart(part) if part == "word/document.xml"));
    }

    #[test]
    fn test_malformed_document_xml() {
        let bytes = package(&[("word/document.xml", "<w:document><w:body><w:p></w:body>")]);
        let err = import_docx(&bytes).unwrap_err();
        assert!(matches!(err, ConversionError::MalformedXml { .. }));
    }
}
