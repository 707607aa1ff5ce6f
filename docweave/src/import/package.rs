//! ZIP package access and main part discovery

use super::xml::get_attr;
use crate::error::ConversionError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

/// Main document part used when the package relationships don't name one
pub(super) const DEFAULT_MAIN_PART: &str = "word/document.xml";

const PACKAGE_RELS_PART: &str = "_rels/.rels";

const OFFICE_DOCUMENT_REL_SUFFIX: &str = "/officeDocument";

/// An opened .docx package held in memory
pub(super) struct Package<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> Package<'a> {
    /// Open the bytes as a ZIP archive
    pub fn open(bytes: &'a [u8]) -> Result<Self, ConversionError> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ConversionError::NotAPackage(e.to_string()))?;
        Ok(Self { archive })
    }

    /// Read a part as UTF-8 text, `None` if the package doesn't contain it
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>, ConversionError> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(ConversionError::NotAPackage(e.to_string())),
        };

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|source| ConversionError::PartRead {
                part: name.to_string(),
                source,
            })?;

        let text = std::str::from_utf8(&contents)?;
        Ok(Some(text.to_string()))
    }

    /// Read a part that must exist
    pub fn read_required(&mut self, name: &str) -> Result<String, ConversionError> {
        self.read_part(name)?
            .ok_or_else(|| ConversionError::MissingPart(name.to_string()))
    }

    /// Locate the main document part via the officeDocument relationship
    pub fn main_document_path(&mut self) -> Result<String, ConversionError> {
        let Some(rels_xml) = self.read_part(PACKAGE_RELS_PART)? else {
            return Ok(DEFAULT_MAIN_PART.to_string());
        };

        Ok(find_office_document(&rels_xml)?.unwrap_or_else(|| DEFAULT_MAIN_PART.to_string()))
    }
}

/// Find the target of the officeDocument relationship, without a leading slash
fn find_office_document(rels_xml: &str) -> Result<Option<String>, ConversionError> {
    let mut reader = Reader::from_str(rels_xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let is_office_document = get_attr(&e, b"Type")
                    .is_some_and(|ty| ty.ends_with(OFFICE_DOCUMENT_REL_SUFFIX));
                if is_office_document {
                    if let Some(target) = get_attr(&e, b"Target") {
                        return Ok(Some(target.trim_start_matches('/').to_string()));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConversionError::MalformedXml {
                    part: PACKAGE_RELS_PART.to_string(),
                    message: e.to_string(),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}
