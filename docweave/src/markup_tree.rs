//! Flat markup tree built from the editor's HTML
//!
//! The editor hands over its content as an HTML fragment. Only the top-level
//! children of that fragment become nodes; anything nested below them is kept
//! as the node's text content and as a list of inline spans carrying the
//! bold/italic state of the elements the text sat inside.

use crate::error::ConversionError;
use scraper::{ElementRef, Html, Node};

/// Classification of a top-level markup node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    BoldRun,
    ItalicRun,
    ListItem,
    UnknownBlock,
}

impl BlockKind {
    /// Classify an element by its lowercase tag name
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "h1" => BlockKind::Heading1,
            "h2" => BlockKind::Heading2,
            "h3" => BlockKind::Heading3,
            "p" => BlockKind::Paragraph,
            "strong" => BlockKind::BoldRun,
            "em" => BlockKind::ItalicRun,
            "li" => BlockKind::ListItem,
            _ => BlockKind::UnknownBlock,
        }
    }
}

/// A span of text inside a node with the inline formatting around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

/// A top-level node of the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    /// Classification of the node
    pub kind: BlockKind,

    /// Lowercase tag name, or `#text` for stray top-level text
    pub tag: String,

    /// All descendant text, concatenated as the DOM's `textContent`
    pub text: String,

    /// Descendant text split by inline formatting, in document order
    pub spans: Vec<InlineSpan>,
}

impl MarkupNode {
    fn from_element(element: ElementRef<'_>) -> Self {
        let tag = element.value().name().to_string();
        let mut spans = Vec::new();
        collect_spans(element, false, false, &mut spans);

        Self {
            kind: BlockKind::from_tag(&tag),
            text: element.text().collect(),
            tag,
            spans,
        }
    }

    fn stray_text(text: &str) -> Self {
        Self {
            kind: BlockKind::UnknownBlock,
            tag: "#text".to_string(),
            text: text.to_string(),
            spans: vec![InlineSpan {
                text: text.to_string(),
                bold: false,
                italic: false,
            }],
        }
    }
}

/// Walk an element's subtree, emitting a span for every text node
fn collect_spans(element: ElementRef<'_>, bold: bool, italic: bool, spans: &mut Vec<InlineSpan>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let (child_bold, child_italic) = match child_element.value().name() {
                "strong" | "b" => (true, italic),
                "em" | "i" => (bold, true),
                _ => (bold, italic),
            };
            collect_spans(child_element, child_bold, child_italic, spans);
        } else if let Node::Text(text) = child.value() {
            let content: &str = text;
            if !content.is_empty() {
                spans.push(InlineSpan {
                    text: content.to_string(),
                    bold,
                    italic,
                });
            }
        }
    }
}

/// Ordered top-level nodes of a markup fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupTree {
    pub nodes: Vec<MarkupNode>,
}

impl MarkupTree {
    /// Parse an HTML fragment into its top-level nodes
    ///
    /// HTML parsing is error-tolerant: recoverable syntax errors are logged and
    /// the recovered tree is used. Whitespace-only text and comments between
    /// top-level elements are ignored; other stray text becomes an
    /// `UnknownBlock` node.
    ///
    /// # Errors
    /// * `ConversionError::MalformedMarkup` - the input contains a NUL character,
    ///   which no editor snapshot can carry
    pub fn parse(markup: &str) -> Result<Self, ConversionError> {
        if let Some(position) = markup.find('\0') {
            return Err(ConversionError::MalformedMarkup(format!(
                "NUL character at byte {}",
                position
            )));
        }

        let fragment = Html::parse_fragment(markup);
        for error in &fragment.errors {
            log::debug!("Recovered from markup error: {}", error);
        }

        let mut nodes = Vec::new();
        for child in fragment.root_element().children() {
            if let Some(element) = ElementRef::wrap(child) {
                nodes.push(MarkupNode::from_element(element));
            } else if let Node::Text(text) = child.value() {
                let content: &str = text;
                if !content.trim().is_empty() {
                    nodes.push(MarkupNode::stray_text(content));
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Parse raw bytes, which must be UTF-8
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, ConversionError> {
        let markup = std::str::from_utf8(bytes)?;
        Self::parse(markup)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarkupNode> {
        self.nodes.iter()
    }
}
