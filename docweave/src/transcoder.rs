//! Export transcoder: editor markup to structured document model
//!
//! Each top-level markup node produces at most one paragraph:
//!
//! | Tag      | Paragraph                                    |
//! |----------|----------------------------------------------|
//! | `h1`     | heading 1, one bold run sized 32 half-points |
//! | `h2`     | heading 2, one bold run sized 28 half-points |
//! | `p`      | body, plain run                              |
//! | `strong` | body, bold run                               |
//! | `em`     | body, italic run                             |
//!
//! Every other node is dropped and recorded in the [`ExportReport`].
//!
//! With [`WalkMode::Flat`] the node's whole text becomes a single run, so a
//! `<p>Hello <em>world</em></p>` loses its italic. [`WalkMode::Nested`] splits
//! the text at nested `strong`/`b`/`em`/`i` boundaries and layers their
//! formatting over the block's own.

use crate::document_model::{HeadingLevel, Paragraph, Run, RunFormatting, StructuredDocument};
use crate::error::ConversionError;
use crate::markup_tree::{BlockKind, MarkupNode, MarkupTree};
use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// How inline content inside a recognized block is mapped to runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalkMode {
    /// Styled runs for nested bold/italic elements
    #[default]
    Nested,
    /// One run per block from its text content; nested formatting is lost
    Flat,
}

/// A top-level node that produced no paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedNode {
    /// Position among the top-level nodes
    pub index: usize,
    /// Lowercase tag name, `#text` for stray text
    pub tag: String,
}

/// Result of an export: the document plus what was left out of it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub document: StructuredDocument,
    pub dropped: Vec<DroppedNode>,
}

impl ExportReport {
    /// Number of dropped nodes per tag, sorted by tag
    pub fn dropped_counts(&self) -> Vec<(String, usize)> {
        self.dropped
            .iter()
            .map(|node| node.tag.as_str())
            .sorted()
            .dedup_with_count()
            .map(|(count, tag)| (tag.to_string(), count))
            .collect()
    }
}

/// Converts markup snapshots into structured documents
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportTranscoder {
    walk: WalkMode,
}

impl ExportTranscoder {
    pub fn new(walk: WalkMode) -> Self {
        Self { walk }
    }

    pub fn walk_mode(&self) -> WalkMode {
        self.walk
    }

    /// Parse markup and transcode it
    ///
    /// # Errors
    /// * `ConversionError` - the markup could not be parsed at all
    pub fn export(&self, markup: &str) -> Result<ExportReport, ConversionError> {
        let tree = MarkupTree::parse(markup)?;
        Ok(self.transcode(&tree))
    }

    /// Transcode an already parsed markup tree
    pub fn transcode(&self, tree: &MarkupTree) -> ExportReport {
        let mut report = ExportReport::default();

        for (index, node) in tree.iter().enumerate() {
            match self.map_node(node) {
                Some(paragraph) => report.document.push(paragraph),
                None => {
                    log::debug!("Dropping unsupported node <{}> at index {}", node.tag, index);
                    report.dropped.push(DroppedNode {
                        index,
                        tag: node.tag.clone(),
                    });
                }
            }
        }

        log::info!(
            "Transcoded {} nodes into {} paragraphs ({} dropped)",
            tree.len(),
            report.document.len(),
            report.dropped.len()
        );
        report
    }

    /// Map one top-level node, `None` for unsupported kinds
    fn map_node(&self, node: &MarkupNode) -> Option<Paragraph> {
        let (heading, base) = match node.kind {
            BlockKind::Heading1 => (Some(HeadingLevel::H1), heading_formatting(HeadingLevel::H1)),
            BlockKind::Heading2 => (Some(HeadingLevel::H2), heading_formatting(HeadingLevel::H2)),
            BlockKind::Paragraph => (None, RunFormatting::default()),
            BlockKind::BoldRun => (None, RunFormatting::default().merged(true, false)),
            BlockKind::ItalicRun => (None, RunFormatting::default().merged(false, true)),
            BlockKind::Heading3 | BlockKind::ListItem | BlockKind::UnknownBlock => return None,
        };

        let runs = match self.walk {
            WalkMode::Flat => vec![Run::with_formatting(node.text.clone(), base)],
            WalkMode::Nested => nested_runs(node, base),
        };

        Some(Paragraph { heading, runs })
    }
}

fn heading_formatting(level: HeadingLevel) -> RunFormatting {
    RunFormatting {
        bold: true,
        italic: false,
        size: Some(level.run_size()),
    }
}

/// Build runs from the node's inline spans, merging neighbours with equal formatting
fn nested_runs(node: &MarkupNode, base: RunFormatting) -> Vec<Run> {
    let runs: Vec<Run> = node
        .spans
        .iter()
        .map(|span| Run::with_formatting(span.text.clone(), base.merged(span.bold, span.italic)))
        .coalesce(|mut previous, current| {
            if previous.formatting() == current.formatting() {
                previous.text.push_str(&current.text);
                Ok(previous)
            } else {
                Err((previous, current))
            }
        })
        .collect();

    // An empty block still yields its paragraph
    if runs.is_empty() {
        vec![Run::with_formatting(String::new(), base)]
    } else {
        runs
    }
}

/// Export markup with the default nested walk, discarding the drop report
pub fn export_markup(markup: &str) -> Result<StructuredDocument, ConversionError> {
    ExportTranscoder::default()
        .export(markup)
        .map(|report| report.document)
}
