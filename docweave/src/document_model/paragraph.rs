//! Paragraphs and heading levels

use super::run::Run;
use serde::Serialize;

/// Heading level of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Numeric level (1-3)
    pub fn level(self) -> usize {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Word's built-in paragraph style ID for this level
    pub fn style_id(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "Heading1",
            HeadingLevel::H2 => "Heading2",
            HeadingLevel::H3 => "Heading3",
        }
    }

    /// Run size in half-points that the export gives heading text
    pub fn run_size(self) -> u32 {
        match self {
            HeadingLevel::H1 => 32,
            HeadingLevel::H2 => 28,
            HeadingLevel::H3 => 26,
        }
    }
}

/// A block-level paragraph of styled runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    /// Heading level, `None` for body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<HeadingLevel>,

    /// Runs in reading order
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Create a body paragraph from runs
    pub fn body(runs: Vec<Run>) -> Self {
        Self {
            heading: None,
            runs,
        }
    }

    /// Create a heading paragraph with a single bold, sized run
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self {
            heading: Some(level),
            runs: vec![Run::new(text).bold().size(level.run_size())],
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Word count of the paragraph text
    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }
}
