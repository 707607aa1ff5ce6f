//! Render a structured document back into editor markup
//!
//! The inverse of the export mapping: headings become `h1`-`h3`, a body
//! paragraph holding a single bold or single italic run becomes a top-level
//! `strong` or `em`, and any other body paragraph becomes a `p` with inline
//! `strong`/`em` wrappers.

use crate::document_model::{Paragraph, Run, StructuredDocument};

/// Render the whole document as an HTML fragment, one element per paragraph
pub fn render_markup(doc: &StructuredDocument) -> String {
    doc.paragraphs.iter().map(paragraph_to_html).collect()
}

/// Render a single paragraph
fn paragraph_to_html(paragraph: &Paragraph) -> String {
    if let Some(level) = paragraph.heading {
        let tag = format!("h{}", level.level());
        // Heading runs are bold by construction; only italics need marking up
        let content: String = paragraph
            .runs
            .iter()
            .map(|run| {
                let text = escape_html(&run.text);
                if run.italic {
                    format!("<em>{}</em>", text)
                } else {
                    text
                }
            })
            .collect();
        return format!("<{tag}>{content}</{tag}>");
    }

    match paragraph.runs.as_slice() {
        [run] if run.bold && !run.italic => {
            format!("<strong>{}</strong>", escape_html(&run.text))
        }
        [run] if run.italic && !run.bold => format!("<em>{}</em>", escape_html(&run.text)),
        runs => format!("<p>{}</p>", runs_to_html(runs)),
    }
}

/// Render runs with inline formatting
fn runs_to_html(runs: &[Run]) -> String {
    let mut result = String::new();

    for run in runs {
        let mut text = escape_html(&run.text);

        if run.italic {
            text = format!("<em>{}</em>", text);
        }
        if run.bold {
            text = format!("<strong>{}</strong>", text);
        }

        result.push_str(&text);
    }

    result
}

/// Escape HTML special characters
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::HeadingLevel;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_render_heading() {
        let doc: StructuredDocument = vec![Paragraph::heading(HeadingLevel::H1, "Title")]
            .into_iter()
            .collect();
        assert_eq!(render_markup(&doc), "<h1>Title</h1>");
    }

    #[test]
    fn test_render_single_styled_runs_as_top_level() {
        let doc: StructuredDocument = vec![
            Paragraph::body(vec![Run::new("Bold text").bold()]),
            Paragraph::body(vec![Run::new("Aside").italic()]),
        ]
        .into_iter()
        .collect();
        assert_eq!(render_markup(&doc), "<strong>Bold text</strong><em>Aside</em>");
    }

    #[test]
    fn test_render_mixed_paragraph() {
        let doc: StructuredDocument = vec![Paragraph::body(vec![
            Run::new("Hello "),
            Run::new("world").italic(),
            Run::new(" & ").bold().italic(),
        ])]
        .into_iter()
        .collect();
        assert_eq!(
            render_markup(&doc),
            "<p>Hello <em>world</em><strong><em> &amp; </em></strong></p>"
        );
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(render_markup(&StructuredDocument::new()), "");
    }
}
