//! Small helpers over quick-xml start tags

use quick_xml::events::BytesStart;

/// Extract an attribute value by key, unescaped
#[inline]
pub(super) fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(Result::ok)
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Whether an on/off property such as `<w:b w:val="0"/>` switches formatting off
///
/// A bare `<w:b/>` means on.
#[inline]
pub(super) fn is_switched_off(e: &BytesStart) -> bool {
    matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}
