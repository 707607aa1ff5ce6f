//! DOCX export by writing the OOXML parts directly
//!
//! A .docx file is a ZIP archive containing XML files. This writer produces
//! the minimal set Word needs to open a document:
//!
//! - `[Content_Types].xml`
//! - `_rels/.rels`
//! - `word/document.xml`
//! - `word/styles.xml` (Normal plus Heading1-3)
//! - `word/_rels/document.xml.rels`
//!
//! Every entry carries the same fixed modification time, so equal documents
//! serialize to equal bytes.

use super::{text_segments, ModelToBinary};
use crate::document_model::{HeadingLevel, Paragraph, Run, StructuredDocument};
use crate::error::SerializationError;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// US Letter with one-inch margins, in twips
const SECTION_PROPERTIES_XML: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

/// Writer producing reproducible packages from hand-written OOXML
#[derive(Debug, Clone, Copy, Default)]
pub struct OoxmlPackageWriter;

impl ModelToBinary for OoxmlPackageWriter {
    fn serialize(&self, doc: &StructuredDocument) -> Result<Vec<u8>, SerializationError> {
        log::info!(
            "Writing OOXML package: {} paragraphs",
            doc.paragraphs.len()
        );

        let parts: [(&str, String); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", PACKAGE_RELS_XML.to_string()),
            ("word/document.xml", generate_document_xml(doc)),
            ("word/styles.xml", generate_styles_xml()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
        ];

        // 1980-01-01 00:00:00, the earliest ZIP timestamp
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in &parts {
            zip.start_file(*name, options)?;
            zip.write_all(contents.as_bytes())?;
        }
        let bytes = zip.finish()?.into_inner();

        log::info!("Wrote {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Generate `word/document.xml`
fn generate_document_xml(doc: &StructuredDocument) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}"><w:body>"#,
        WORDPROCESSING_NS
    );
    for paragraph in &doc.paragraphs {
        xml.push_str(&generate_paragraph_xml(paragraph));
    }
    xml.push_str(SECTION_PROPERTIES_XML);
    xml.push_str("</w:body></w:document>");
    xml
}

/// Generate OOXML for a paragraph
fn generate_paragraph_xml(paragraph: &Paragraph) -> String {
    let mut xml = String::from("<w:p>");
    if let Some(level) = paragraph.heading {
        xml.push_str(&format!(
            r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
            level.style_id()
        ));
    }
    for run in &paragraph.runs {
        xml.push_str(&generate_run_xml(run));
    }
    xml.push_str("</w:p>");
    xml
}

/// Generate OOXML for a text run with formatting
fn generate_run_xml(run: &Run) -> String {
    let mut xml = String::from("<w:r>");

    if run.has_formatting() {
        xml.push_str("<w:rPr>");
        if run.bold {
            xml.push_str("<w:b/><w:bCs/>");
        }
        if run.italic {
            xml.push_str("<w:i/><w:iCs/>");
        }
        if let Some(size) = run.size {
            xml.push_str(&format!(
                r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#
            ));
        }
        xml.push_str("</w:rPr>");
    }

    for (i, segment) in text_segments(&run.text).iter().enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        xml.push_str(&format!(
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            escape_xml(segment)
        ));
    }
    xml.push_str("</w:r>");
    xml
}

/// Generate `word/styles.xml` with Normal and the heading styles
fn generate_styles_xml() -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
        WORDPROCESSING_NS
    );

    for level in [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3] {
        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="heading {n}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="0"/><w:outlineLvl w:val="{outline}"/></w:pPr><w:rPr><w:b/><w:bCs/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:style>"#,
            id = level.style_id(),
            n = level.level(),
            outline = level.level() - 1,
            size = level.run_size(),
        ));
    }

    xml.push_str("</w:styles>");
    xml
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
