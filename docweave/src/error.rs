//! Error types for the import, export, and save stages

use std::path::PathBuf;
use thiserror::Error;

/// Input bytes or markup could not be parsed into the expected structure
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The bytes are not a ZIP package
    #[error("Not a valid .docx package: {0}")]
    NotAPackage(String),

    /// The package has no main document part
    #[error("Package is missing required part '{0}'")]
    MissingPart(String),

    /// A package part could not be read
    #[error("Failed to read package part '{part}': {source}")]
    PartRead {
        part: String,
        #[source]
        source: std::io::Error,
    },

    /// A package part is not well-formed XML
    #[error("Malformed XML in '{part}': {message}")]
    MalformedXml { part: String, message: String },

    /// Text input is not valid UTF-8
    #[error("Input is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// Markup contains content that no markup parser accepts
    #[error("Malformed markup: {0}")]
    MalformedMarkup(String),
}

/// A structurally valid document model could not be turned into bytes
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The docx-rs builder rejected the document
    #[error("DOCX builder error: {0}")]
    Engine(String),
}

/// The acquired file was rejected before reaching the transcoder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a valid .{expected} file. '{filename}' is not supported")]
    UnsupportedExtension { filename: String, expected: String },

    #[error("Please upload a valid .{expected} file. '{filename}' has no extension")]
    MissingExtension { filename: String, expected: String },
}

/// Any failure surfaced by the orchestrator
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to parse the document: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Failed to generate the document: {0}")]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to save {path}: {source}", path = .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
