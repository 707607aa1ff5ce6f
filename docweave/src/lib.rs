//! docweave - transcoding between editor markup and Word documents
//!
//! Three transcoders move a document through the editor:
//! - [`import`]: .docx bytes → HTML markup shown on the editing surface
//! - [`transcoder`]: HTML markup → [`StructuredDocument`]
//! - [`serialize`]: [`StructuredDocument`] → .docx bytes
//!
//! The [`orchestrator`] wires them to an editing surface and a save target.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod document_model;
pub mod error;
pub mod import;
pub mod markup_tree;
pub mod orchestrator;
pub mod render;
pub mod serialize;
pub mod transcoder;

pub use config::EditorConfig;
pub use document_model::{HeadingLevel, Paragraph, Run, StructuredDocument};
pub use error::{ConversionError, EditorError, SerializationError, ValidationError};
pub use import::{import_docx, BinaryToMarkup, DocxMarkupConverter};
pub use markup_tree::MarkupTree;
pub use orchestrator::{
    DirectoryTarget, EditingSurface, LogNotifier, MemorySurface, Notifier, Orchestrator, SaveTarget,
};
pub use render::render_markup;
pub use serialize::{writer_for, DocxRsWriter, Engine, ModelToBinary, OoxmlPackageWriter};
pub use transcoder::{export_markup, ExportTranscoder, WalkMode};
