//! Style definitions from `word/styles.xml`

use super::xml::get_attr;
use crate::error::ConversionError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

pub(super) const STYLES_PART: &str = "word/styles.xml";

/// Highest heading level the importer emits (`h6`)
const MAX_HEADING_LEVEL: usize = 6;

/// Style IDs mapped to their display names
#[derive(Debug, Clone, Default)]
pub(super) struct StyleMap {
    names: HashMap<String, String>,
}

impl StyleMap {
    /// Parse style IDs and names from the styles part
    pub fn parse(xml: &str) -> Result<Self, ConversionError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut buf = Vec::new();

        let mut names = HashMap::new();
        let mut current_id: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) if e.name().as_ref() == b"w:style" => {
                    current_id = get_attr(&e, b"w:styleId");
                }
                Ok(Event::Empty(e)) if e.name().as_ref() == b"w:name" => {
                    if let (Some(id), Some(name)) = (current_id.as_ref(), get_attr(&e, b"w:val")) {
                        names.insert(id.clone(), name);
                    }
                }
                Ok(Event::End(e)) if e.name().as_ref() == b"w:style" => current_id = None,
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ConversionError::MalformedXml {
                        part: STYLES_PART.to_string(),
                        message: e.to_string(),
                    })
                }
                _ => {}
            }
            buf.clear();
        }

        log::debug!("Loaded {} named styles", names.len());
        Ok(Self { names })
    }

    /// Display name of a style, falling back to its ID
    pub fn display_name<'a>(&'a self, style_id: &'a str) -> &'a str {
        self.names.get(style_id).map_or(style_id, String::as_str)
    }

    /// Heading level (1-6) implied by a paragraph style
    pub fn heading_level(&self, style_id: &str) -> Option<usize> {
        trailing_heading_level(style_id, "heading")
            .or_else(|| trailing_heading_level(&self.display_name(style_id).replace(' ', ""), "heading"))
    }

    /// Whether a paragraph style is the document default
    pub fn is_default_paragraph(&self, style_id: &str) -> bool {
        style_id.eq_ignore_ascii_case("Normal")
            || self.display_name(style_id).eq_ignore_ascii_case("normal")
    }

    /// Whether a run style means bold (`Strong`)
    pub fn is_strong(&self, style_id: &str) -> bool {
        self.matches(style_id, "strong")
    }

    /// Whether a run style means italic (`Emphasis`)
    pub fn is_emphasis(&self, style_id: &str) -> bool {
        self.matches(style_id, "emphasis")
    }

    fn matches(&self, style_id: &str, name: &str) -> bool {
        style_id.eq_ignore_ascii_case(name) || self.display_name(style_id).eq_ignore_ascii_case(name)
    }
}

/// Parse `HeadingN` (case-insensitive) into N when 1 <= N <= 6
fn trailing_heading_level(value: &str, prefix: &str) -> Option<usize> {
    let head = value.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let level: usize = value[prefix.len()..].parse().ok()?;
    (1..=MAX_HEADING_LEVEL).contains(&level).then_some(level)
}
