//! Walk the main document part and emit markup
//!
//! The walk is a single pass over quick-xml events. Paragraph and run state is
//! collected until the closing tag, then the paragraph is rendered as one
//! block element. Consecutive list paragraphs share a single `<ul>`.

use super::styles::StyleMap;
use super::xml::{get_attr, is_switched_off};
use super::Conversion;
use crate::error::ConversionError;
use crate::render::escape_html;
use itertools::Itertools;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Inline content collected for a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
enum Inline {
    Text {
        text: String,
        bold: bool,
        italic: bool,
    },
    Break,
}

#[derive(Debug, Default)]
struct ParagraphState {
    style_id: Option<String>,
    is_list: bool,
    inlines: Vec<Inline>,
}

#[derive(Debug, Default)]
struct RunState {
    style_id: Option<String>,
    bold: bool,
    italic: bool,
    text: String,
}

/// Event-driven state for one walk over a document part
pub(super) struct BodyWalker<'s> {
    styles: &'s StyleMap,
    html: String,
    messages: Vec<String>,
    paragraph: Option<ParagraphState>,
    run: Option<RunState>,
    in_paragraph_props: bool,
    in_run_props: bool,
    in_text: bool,
    list_open: bool,
    /// Depth inside content that is not part of the body flow (text boxes, fallbacks)
    skip_depth: usize,
}

impl<'s> BodyWalker<'s> {
    pub fn new(styles: &'s StyleMap) -> Self {
        Self {
            styles,
            html: String::new(),
            messages: Vec::new(),
            paragraph: None,
            run: None,
            in_paragraph_props: false,
            in_run_props: false,
            in_text: false,
            list_open: false,
            skip_depth: 0,
        }
    }

    /// Walk the XML of `part` and return the produced markup
    pub fn walk(mut self, xml: &str, part: &str) -> Result<Conversion, ConversionError> {
        let mut reader = Reader::from_str(xml);
        // Whitespace inside w:t is significant
        reader.trim_text(false);
        let mut buf = Vec::new();

        let malformed = |message: String| ConversionError::MalformedXml {
            part: part.to_string(),
            message,
        };

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => self.handle_start(&e),
                Ok(Event::Empty(e)) => self.handle_empty(&e),
                Ok(Event::Text(e)) => {
                    if self.in_text && self.skip_depth == 0 {
                        let text = e.unescape().map_err(|e| malformed(e.to_string()))?;
                        if let Some(run) = self.run.as_mut() {
                            run.text.push_str(&text);
                        }
                    }
                }
                Ok(Event::End(e)) => self.handle_end(e.name().as_ref()),
                Ok(Event::Eof) => break,
                Err(e) => return Err(malformed(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        self.close_list();
        Ok(Conversion {
            markup: self.html,
            messages: self.messages.into_iter().unique().collect(),
        })
    }

    fn handle_start(&mut self, e: &BytesStart<'_>) {
        let name = e.name();
        let name = name.as_ref();

        if matches!(name, b"w:txbxContent" | b"mc:Fallback") {
            self.skip_depth += 1;
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        match name {
            b"w:p" => self.paragraph = Some(ParagraphState::default()),
            b"w:pPr" => self.in_paragraph_props = true,
            b"w:r" => self.run = Some(RunState::default()),
            b"w:rPr" => self.in_run_props = self.run.is_some(),
            b"w:t" => self.in_text = self.run.is_some(),
            b"w:tbl" => {
                self.close_list();
                self.html.push_str("<table>");
            }
            b"w:tr" => self.html.push_str("<tr>"),
            b"w:tc" => self.html.push_str("<td>"),
            _ => self.handle_property(name, e),
        }
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>) {
        if self.skip_depth > 0 {
            return;
        }
        // <w:p/>, <w:t/> and friends carry no content
        let name = e.name();
        self.handle_property(name.as_ref(), e);
    }

    /// Properties and run content that may appear as start or empty tags
    fn handle_property(&mut self, name: &[u8], e: &BytesStart<'_>) {
        match name {
            b"w:pStyle" if self.in_paragraph_props => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.style_id = get_attr(e, b"w:val");
                }
            }
            b"w:numPr" if self.in_paragraph_props => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.is_list = true;
                }
            }
            b"w:b" | b"w:i" | b"w:rStyle" if self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    match name {
                        b"w:b" => run.bold = !is_switched_off(e),
                        b"w:i" => run.italic = !is_switched_off(e),
                        _ => run.style_id = get_attr(e, b"w:val"),
                    }
                }
            }
            // Tab stops inside pPr share the w:tab name
            b"w:tab" if !self.in_paragraph_props && !self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    run.text.push('\t');
                }
            }
            b"w:br" | b"w:cr" if !self.in_run_props => {
                if self.run.is_some() {
                    self.flush_run_text();
                    if let Some(paragraph) = self.paragraph.as_mut() {
                        paragraph.inlines.push(Inline::Break);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_end(&mut self, name: &[u8]) {
        if matches!(name, b"w:txbxContent" | b"mc:Fallback") {
            self.skip_depth = self.skip_depth.saturating_sub(1);
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        match name {
            b"w:t" => self.in_text = false,
            b"w:rPr" => self.in_run_props = false,
            b"w:pPr" => self.in_paragraph_props = false,
            b"w:r" => {
                self.flush_run_text();
                self.run = None;
            }
            b"w:p" => {
                if let Some(paragraph) = self.paragraph.take() {
                    self.emit_paragraph(paragraph);
                }
            }
            b"w:tc" => {
                self.close_list();
                self.html.push_str("</td>");
            }
            b"w:tr" => self.html.push_str("</tr>"),
            b"w:tbl" => self.html.push_str("</table>"),
            b"w:body" => self.close_list(),
            _ => {}
        }
    }

    /// Move the current run's pending text into the paragraph
    fn flush_run_text(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        if run.text.is_empty() {
            return;
        }

        let mut bold = run.bold;
        let mut italic = run.italic;
        if let Some(style_id) = run.style_id.as_deref() {
            if self.styles.is_strong(style_id) {
                bold = true;
            } else if self.styles.is_emphasis(style_id) {
                italic = true;
            } else {
                self.messages.push(format!(
                    "Unrecognised run style: '{}' (Style ID: {})",
                    self.styles.display_name(style_id),
                    style_id
                ));
            }
        }

        let text = std::mem::take(&mut run.text);
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.inlines.push(Inline::Text { text, bold, italic });
        }
    }

    fn emit_paragraph(&mut self, paragraph: ParagraphState) {
        if paragraph.inlines.is_empty() {
            return;
        }

        let heading = paragraph
            .style_id
            .as_deref()
            .and_then(|id| self.styles.heading_level(id));

        if let (None, Some(style_id)) = (heading, paragraph.style_id.as_deref()) {
            if !paragraph.is_list && !self.styles.is_default_paragraph(style_id) {
                self.messages.push(format!(
                    "Unrecognised paragraph style: '{}' (Style ID: {})",
                    self.styles.display_name(style_id),
                    style_id
                ));
            }
        }

        let content = inlines_to_html(&paragraph.inlines);
        match heading {
            Some(level) => {
                self.close_list();
                self.html
                    .push_str(&format!("<h{level}>{content}</h{level}>"));
            }
            None if paragraph.is_list => {
                if !self.list_open {
                    self.html.push_str("<ul>");
                    self.list_open = true;
                }
                self.html.push_str(&format!("<li>{content}</li>"));
            }
            None => {
                self.close_list();
                self.html.push_str(&format!("<p>{content}</p>"));
            }
        }
    }

    fn close_list(&mut self) {
        if self.list_open {
            self.html.push_str("</ul>");
            self.list_open = false;
        }
    }
}

/// Render inline content, merging neighbouring text with equal formatting
fn inlines_to_html(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .cloned()
        .coalesce(|previous, current| match (previous, current) {
            (
                Inline::Text { mut text, bold, italic },
                Inline::Text {
                    text: next,
                    bold: next_bold,
                    italic: next_italic,
                },
            ) if bold == next_bold && italic == next_italic => {
                text.push_str(&next);
                Ok(Inline::Text { text, bold, italic })
            }
            (previous, current) => Err((previous, current)),
        })
        .map(|inline| match inline {
            Inline::Text { text, bold, italic } => {
                let mut html = escape_html(&text);
                if italic {
                    html = format!("<em>{}</em>", html);
                }
                if bold {
                    html = format!("<strong>{}</strong>", html);
                }
                html
            }
            Inline::Break => "<br />".to_string(),
        })
        .collect()
}
