//! DOCX export using the docx-rs library
//!
//! Builds the document from scratch with docx-rs, adding the heading styles
//! that the paragraphs reference.

use super::{text_segments, ModelToBinary};
use crate::document_model::{HeadingLevel, Paragraph, Run, StructuredDocument};
use crate::error::SerializationError;
use std::io::Cursor;

/// Writer backed by the docx-rs builder API
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxRsWriter;

impl ModelToBinary for DocxRsWriter {
    fn serialize(&self, doc: &StructuredDocument) -> Result<Vec<u8>, SerializationError> {
        log::info!(
            "Creating DOCX with docx-rs: {} paragraphs",
            doc.paragraphs.len()
        );

        let mut docx = add_heading_styles(docx_rs::Docx::new());
        for paragraph in &doc.paragraphs {
            docx = docx.add_paragraph(create_paragraph(paragraph));
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| SerializationError::Engine(format!("Failed to write DOCX: {}", e)))?;

        let bytes = buffer.into_inner();
        log::info!("Wrote {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Add heading styles to the document
fn add_heading_styles(mut docx: docx_rs::Docx) -> docx_rs::Docx {
    for level in [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3] {
        // docx-rs sizes are half-points, like the model's
        let style = docx_rs::Style::new(level.style_id(), docx_rs::StyleType::Paragraph)
            .name(format!("heading {}", level.level()))
            .bold()
            .size(level.run_size() as usize);
        docx = docx.add_style(style);
    }
    docx
}

/// Create a docx-rs paragraph from a model paragraph
fn create_paragraph(paragraph: &Paragraph) -> docx_rs::Paragraph {
    let mut para = docx_rs::Paragraph::new();
    if let Some(level) = paragraph.heading {
        para = para.style(level.style_id());
    }
    for run in &paragraph.runs {
        para = para.add_run(create_run(run));
    }
    para
}

/// Create a docx-rs run with the model run's formatting
fn create_run(run: &Run) -> docx_rs::Run {
    let mut docx_run = docx_rs::Run::new();
    for (i, segment) in text_segments(&run.text).iter().enumerate() {
        if i > 0 {
            docx_run = docx_run.add_break(docx_rs::BreakType::TextWrapping);
        }
        docx_run = docx_run.add_text(segment);
    }

    if run.bold {
        docx_run = docx_run.bold();
    }
    if run.italic {
        docx_run = docx_run.italic();
    }
    if let Some(size) = run.size {
        docx_run = docx_run.size(size as usize);
    }

    docx_run
}
