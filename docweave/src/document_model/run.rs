//! Text run representation with formatting
//!
//! A run is a span of text with consistent formatting applied. This is the
//! unit the serializers turn into `<w:r>` elements.

use serde::Serialize;

/// A span of text with consistent formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Run {
    /// The text content
    pub text: String,

    /// Bold formatting
    pub bold: bool,

    /// Italic formatting
    pub italic: bool,

    /// Font size in half-points (32 = 16pt), `None` for the style default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl Run {
    /// Create a new plain text run
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Create a run with the given formatting
    pub fn with_formatting(text: impl Into<String>, formatting: RunFormatting) -> Self {
        Self {
            text: text.into(),
            bold: formatting.bold,
            italic: formatting.italic,
            size: formatting.size,
        }
    }

    /// Set bold formatting
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set italic formatting
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set the font size in half-points
    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    /// The formatting carried by this run, without its text
    pub fn formatting(&self) -> RunFormatting {
        RunFormatting {
            bold: self.bold,
            italic: self.italic,
            size: self.size,
        }
    }

    /// Check if this run has any formatting applied
    pub fn has_formatting(&self) -> bool {
        self.bold || self.italic || self.size.is_some()
    }
}

/// Formatting state shared by a run and the walk that produces it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RunFormatting {
    pub bold: bool,
    pub italic: bool,
    pub size: Option<u32>,
}

impl RunFormatting {
    /// Combine with inline bold/italic state; flags only ever switch on
    pub fn merged(self, bold: bool, italic: bool) -> Self {
        Self {
            bold: self.bold || bold,
            italic: self.italic || italic,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_run_has_no_formatting() {
        let run = Run::new("plain");
        assert!(!run.has_formatting());
        assert_eq!(run.size, None);
    }

    #[test]
    fn test_builder_flags() {
        let run = Run::new("Title").bold().size(32);
        assert!(run.bold);
        assert!(!run.italic);
        assert_eq!(run.size, Some(32));
        assert!(run.has_formatting());
    }

    #[test]
    fn test_merged_never_clears_flags() {
        let base = RunFormatting {
            bold: true,
            italic: false,
            size: Some(28),
        };
        let merged = base.merged(false, true);
        assert!(merged.bold);
        assert!(merged.italic);
        assert_eq!(merged.size, Some(28));
    }
}
