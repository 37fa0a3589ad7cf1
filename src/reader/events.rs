//! Reader events
//!
//! One event per markup construct. Borrowed from the input unless entity
//! decoding had to allocate.

use crate::core::attributes::Attribute;
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub enum XmlEvent<'a> {
    /// `<name attrs...>`
    StartElement(StartElement<'a>),
    /// `</name>`
    EndElement(EndElement<'a>),
    /// `<name attrs.../>`
    EmptyElement(StartElement<'a>),
    /// Character data between tags, entities decoded
    Text(Cow<'a, [u8]>),
    CData(Cow<'a, [u8]>),
    Comment(Cow<'a, [u8]>),
    /// `<?target data?>`
    ProcessingInstruction {
        target: Cow<'a, [u8]>,
        data: Option<Cow<'a, [u8]>>,
    },
    /// `<?xml ...?>`, contents ignored
    XmlDeclaration,
    DocType(Cow<'a, [u8]>),
}

#[derive(Debug, Clone)]
pub struct StartElement<'a> {
    /// Tag name as written, prefix included
    pub name: Cow<'a, [u8]>,
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartElement<'a> {
    pub fn new(name: &'a [u8], attributes: Vec<Attribute<'a>>) -> Self {
        StartElement {
            name: Cow::Borrowed(name),
            attributes,
        }
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Attribute value by name, ignoring ASCII case as HTML does
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.as_bytes()))
            .and_then(|a| a.value_str())
    }
}

#[derive(Debug, Clone)]
pub struct EndElement<'a> {
    pub name: Cow<'a, [u8]>,
}

impl<'a> EndElement<'a> {
    pub fn new(name: &'a [u8]) -> Self {
        EndElement {
            name: Cow::Borrowed(name),
        }
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Whether this closes an element opened as `name`
    pub fn closes(&self, name: &[u8]) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
