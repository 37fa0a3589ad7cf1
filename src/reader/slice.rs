//! Zero-Copy Slice Reader
//!
//! Pulls markup events from a byte slice. Input references are kept in the
//! events wherever no entity decoding was needed.
//!
//! The reader never fails: a stray `<` that does not open a construct, or a
//! construct that runs off the end of the input, is reported as text.

use super::events::{EndElement, StartElement, XmlEvent};
use crate::core::attributes::parse_attributes;
use crate::core::entities::decode_text;
use crate::core::scanner::Scanner;
use std::borrow::Cow;

/// Zero-copy markup reader from a byte slice
pub struct SliceReader<'a> {
    input: &'a [u8],
    scanner: Scanner<'a>,
}

impl<'a> SliceReader<'a> {
    /// Create a new slice reader
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            scanner: Scanner::new(input),
        }
    }

    /// Get the next markup event, or None at end of input
    pub fn next_event(&mut self) -> Option<XmlEvent<'a>> {
        loop {
            if self.scanner.is_eof() {
                return None;
            }

            let start = self.scanner.position();
            if self.scanner.peek() != Some(b'<') {
                return Some(self.read_text(start));
            }

            if self.scanner.starts_with(b"<!--") {
                return Some(self.read_delimited(start, 4, b"-->", XmlEvent::Comment));
            }
            if self.scanner.starts_with(b"<![CDATA[") {
                return Some(self.read_delimited(start, 9, b"]]>", XmlEvent::CData));
            }
            if self.scanner.starts_with(b"<!") {
                match self.read_doctype(start) {
                    Some(event) => return Some(event),
                    None => continue,
                }
            }
            if self.scanner.starts_with(b"<?") {
                return Some(self.read_processing_instruction(start));
            }
            if self.scanner.starts_with(b"</") {
                match self.read_end_tag(start) {
                    Some(event) => return Some(event),
                    None => continue,
                }
            }
            return Some(self.read_tag(start));
        }
    }

    /// Text up to the next tag start (or end of input)
    fn read_text(&mut self, start: usize) -> XmlEvent<'a> {
        self.scanner.set_position(start + 1);
        let end = self.scanner.find_tag_start().unwrap_or(self.input.len());
        self.scanner.set_position(end);
        XmlEvent::Text(decode_text(self.scanner.slice(start, end)))
    }

    /// `<!--...-->` and `<![CDATA[...]]>`; unterminated runs to end of input
    fn read_delimited(
        &mut self,
        start: usize,
        open_len: usize,
        close: &[u8],
        make: fn(Cow<'a, [u8]>) -> XmlEvent<'a>,
    ) -> XmlEvent<'a> {
        let content_start = start + open_len;
        self.scanner.set_position(content_start);
        let (content_end, next) = match self.scanner.find_sequence(close) {
            Some(end) => (end, end + close.len()),
            None => (self.input.len(), self.input.len()),
        };
        self.scanner.set_position(next);
        make(Cow::Borrowed(self.scanner.slice(content_start, content_end)))
    }

    /// `<!DOCTYPE ...>`; any other `<!` construct is skipped
    fn read_doctype(&mut self, start: usize) -> Option<XmlEvent<'a>> {
        let end = self.scanner.find_doctype_end();
        let next = end.map_or(self.input.len(), |e| e + 1);
        let body_end = end.unwrap_or(next);
        self.scanner.set_position(next);

        let body = self.scanner.slice(start + 2, body_end);
        if body.len() >= 7 && body[..7].eq_ignore_ascii_case(b"DOCTYPE") {
            Some(XmlEvent::DocType(Cow::Borrowed(body[7..].trim_ascii())))
        } else {
            None
        }
    }

    /// `<?target data?>`, with `<?xml ...?>` reported as the declaration
    fn read_processing_instruction(&mut self, start: usize) -> XmlEvent<'a> {
        self.scanner.set_position(start + 2);
        let (body_end, next) = match self.scanner.find_sequence(b"?>") {
            Some(end) => (end, end + 2),
            None => (self.input.len(), self.input.len()),
        };

        let Some(target) = self.scanner.read_name() else {
            self.scanner.set_position(next);
            return XmlEvent::Comment(Cow::Borrowed(self.scanner.slice(start + 2, body_end)));
        };
        let data_start = self.scanner.position().min(body_end);
        self.scanner.set_position(next);

        if target.eq_ignore_ascii_case(b"xml") {
            return XmlEvent::XmlDeclaration;
        }

        let data = self.scanner.slice(data_start, body_end).trim_ascii();
        XmlEvent::ProcessingInstruction {
            target: Cow::Borrowed(target),
            data: (!data.is_empty()).then_some(Cow::Borrowed(data)),
        }
    }

    /// `</name>`; a nameless end tag is dropped
    fn read_end_tag(&mut self, start: usize) -> Option<XmlEvent<'a>> {
        self.scanner.set_position(start + 2);
        let name = self.scanner.read_name();
        let next = self
            .scanner
            .find_tag_end_quoted()
            .map_or(self.input.len(), |e| e + 1);
        self.scanner.set_position(next);
        name.map(|name| XmlEvent::EndElement(EndElement::new(name)))
    }

    /// `<name attrs>` or `<name attrs/>`
    fn read_tag(&mut self, start: usize) -> XmlEvent<'a> {
        self.scanner.set_position(start + 1);
        let Some(name) = self.scanner.read_name() else {
            return self.read_text(start);
        };

        let Some(tag_end) = self.scanner.find_tag_end_quoted() else {
            return self.read_text(start);
        };

        let attr_start = self.scanner.position();
        let self_closing = tag_end > attr_start && self.scanner.slice(tag_end - 1, tag_end) == b"/";
        let attr_end = if self_closing { tag_end - 1 } else { tag_end };
        let attributes = parse_attributes(self.scanner.slice(attr_start, attr_end));
        self.scanner.set_position(tag_end + 1);

        let element = StartElement::new(name, attributes);
        if self_closing {
            XmlEvent::EmptyElement(element)
        } else {
            XmlEvent::StartElement(element)
        }
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = XmlEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

/// Parse markup from a byte slice and return all events
pub fn parse_events(input: &[u8]) -> Vec<XmlEvent<'_>> {
    SliceReader::new(input).collect()
}
