//! Document model serializers (structured document → .docx bytes)
//!
//! Two engines sit behind [`ModelToBinary`]:
//! - [`OoxmlPackageWriter`] writes the OOXML parts itself. Output is
//!   byte-identical for equal documents (fixed ZIP timestamps, fixed part
//!   order, no date metadata).
//! - [`DocxRsWriter`] builds the document with the `docx-rs` crate. Its output
//!   is not reproducible: paragraph IDs come from a process-wide counter.

use crate::document_model::StructuredDocument;
use crate::error::SerializationError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

mod docx_rs_writer;
mod ooxml_writer;

pub use docx_rs_writer::DocxRsWriter;
pub use ooxml_writer::OoxmlPackageWriter;

/// Turns a structured document into package bytes
pub trait ModelToBinary {
    /// Serialize the whole document into memory
    fn serialize(&self, doc: &StructuredDocument) -> Result<Vec<u8>, SerializationError>;
}

/// DOCX serializer engine selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    /// Hand-written OOXML parts, reproducible output
    #[default]
    Ooxml,
    /// docx-rs builder
    DocxRs,
}

/// Create the serializer for an engine
pub fn writer_for(engine: Engine) -> Box<dyn ModelToBinary> {
    match engine {
        Engine::Ooxml => Box::new(OoxmlPackageWriter),
        Engine::DocxRs => Box::new(DocxRsWriter),
    }
}

/// Split run text at soft breaks into pieces that are legal XML character data
///
/// Vertical tab and form feed become line breaks between pieces; other code
/// points XML 1.0 forbids are removed.
pub(crate) fn text_segments(text: &str) -> Vec<String> {
    text.split(|c: char| matches!(c, '\u{0B}' | '\u{0C}'))
        .map(|segment| segment.chars().filter(|&c| is_xml_char(c)).collect())
        .collect()
}

/// XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
