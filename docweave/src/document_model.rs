//! Structured document model produced by the export transcoder
//!
//! A flat, ordered sequence of paragraphs, each holding styled text runs and
//! an optional heading level. This is the format-independent form that the
//! serializers turn into a DOCX package.

use serde::Serialize;

mod paragraph;
mod run;

pub use paragraph::{HeadingLevel, Paragraph};
pub use run::{Run, RunFormatting};

/// The exportable document: paragraphs in reading order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredDocument {
    /// Paragraphs in the order their source nodes appeared
    pub paragraphs: Vec<Paragraph>,
}

impl StructuredDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph
    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Whether the document has no paragraphs
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Number of paragraphs
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Number of heading paragraphs
    pub fn heading_count(&self) -> usize {
        self.paragraphs
            .iter()
            .filter(|p| p.heading.is_some())
            .count()
    }

    /// Total word count across all paragraphs
    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::word_count).sum()
    }
}

impl FromIterator<Paragraph> for StructuredDocument {
    fn from_iter<I: IntoIterator<Item = Paragraph>>(iter: I) -> Self {
        Self {
            paragraphs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_counts() {
        let doc: StructuredDocument = vec![
            Paragraph::heading(HeadingLevel::H1, "Quarterly Report"),
            Paragraph::body(vec![Run::new("Revenue grew in every region")]),
        ]
        .into_iter()
        .collect();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.heading_count(), 1);
        assert_eq!(doc.word_count(), 7);
    }

    #[test]
    fn test_empty_document() {
        let doc = StructuredDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.word_count(), 0);
    }
}
