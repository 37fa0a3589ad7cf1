//! Attribute Parsing
//!
//! Lenient attribute extraction from start-tag content. Content documents in
//! the wild carry HTML-isms (boolean attributes, unquoted values), so nothing
//! here rejects input.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char};
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Name as written, prefix included
    pub name: Cow<'a, [u8]>,
    /// Value with entities decoded
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a [u8], value: Cow<'a, [u8]>) -> Self {
        Attribute {
            name: Cow::Borrowed(name),
            value,
        }
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parse the attribute list of a start tag (everything after the name).
///
/// Boolean attributes get an empty value; unquoted values run to the next
/// whitespace. Bytes that cannot start a name are skipped.
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute<'_>> {
    let mut attrs = Vec::new();
    let mut pos = skip_whitespace(input, 0);

    while let Some(&b) = input.get(pos) {
        if b == b'/' || b == b'>' {
            break;
        }
        if !is_name_start_char(b) {
            pos = skip_whitespace(input, pos + 1);
            continue;
        }

        let name_end = input[pos..]
            .iter()
            .position(|&c| !is_name_char(c))
            .map_or(input.len(), |i| pos + i);
        let name = &input[pos..name_end];

        pos = skip_whitespace(input, name_end);
        if input.get(pos) != Some(&b'=') {
            attrs.push(Attribute::new(name, Cow::Borrowed(b"")));
            continue;
        }

        let (value, next) = read_value(input, skip_whitespace(input, pos + 1));
        attrs.push(Attribute::new(name, value));
        pos = skip_whitespace(input, next);
    }

    attrs
}

/// Value starting at `pos`, and the position just past it
fn read_value(input: &[u8], pos: usize) -> (Cow<'_, [u8]>, usize) {
    match input.get(pos) {
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            let start = pos + 1;
            let end = input[start..]
                .iter()
                .position(|&c| c == quote)
                .map_or(input.len(), |i| start + i);
            (decode_text(&input[start..end]), (end + 1).min(input.len()))
        }
        Some(_) => {
            let end = input[pos..]
                .iter()
                .position(|&c| is_whitespace(c) || c == b'>')
                .map_or(input.len(), |i| pos + i);
            (decode_text(&input[pos..end]), end)
        }
        None => (Cow::Borrowed(&[] as &[u8]), pos),
    }
}

#[inline]
fn skip_whitespace(input: &[u8], mut pos: usize) -> usize {
    while input.get(pos).is_some_and(|&b| is_whitespace(b)) {
        pos += 1;
    }
    pos
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
