//! Compact fragment identifiers
//!
//! The identifier grammar itself lives behind [`FragmentCodec`]; this module
//! decides which codec entry point a range shape needs and turns coarse
//! targets into concrete word ranges.

use super::point::{Point, Range};
use super::traversal::{next_text_node, next_word_from, TraversalOptions};
use crate::dom::{NodeId, TreeCursor};
use crate::error::{Error, Result};
use std::borrow::Cow;
use tracing::debug;

/// What a parsed identifier points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentTarget {
    /// An exact character range
    Range { start: Point, end: Point },
    /// A node, optionally with a character offset when it is a text node
    Element { node: NodeId, offset: Option<usize> },
}

/// Markup the identifier generator must not count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFilter {
    pub class_blacklist: Vec<String>,
    pub id_blacklist: Vec<String>,
    pub element_blacklist: Vec<String>,
}

impl Default for MarkerFilter {
    fn default() -> Self {
        MarkerFilter {
            class_blacklist: vec!["cfi-marker".to_string()],
            id_blacklist: vec![
                "MathJax_Message".to_string(),
                "MathJax_SVG_Hidden".to_string(),
            ],
            element_blacklist: Vec::new(),
        }
    }
}

impl MarkerFilter {
    /// Whether `node` is injected markup to skip
    pub fn is_marker<D: TreeCursor + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        let Some(tag) = doc.tag_name(node) else {
            return false;
        };
        if self
            .element_blacklist
            .iter()
            .any(|name| name.eq_ignore_ascii_case(tag))
        {
            return true;
        }
        if let Some(id) = doc.attribute(node, "id") {
            if self.id_blacklist.iter().any(|blocked| blocked == id) {
                return true;
            }
        }
        doc.attribute(node, "class").is_some_and(|classes| {
            classes
                .split_ascii_whitespace()
                .any(|class| self.class_blacklist.iter().any(|blocked| blocked == class))
        })
    }
}

/// Parser and generator for an identifier grammar
pub trait FragmentCodec {
    fn parse<D: TreeCursor + ?Sized>(&self, doc: &D, identifier: &str) -> Result<FragmentTarget>;

    /// Identifier for a caret inside a text node
    fn generate_character_offset<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        point: Point,
        filter: &MarkerFilter,
    ) -> Result<String>;

    /// Identifier for a whole node
    fn generate_element<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        node: NodeId,
        filter: &MarkerFilter,
    ) -> Result<String>;

    /// Identifier for a spanning range
    fn generate_range<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        range: &Range,
        filter: &MarkerFilter,
    ) -> Result<String>;
}

/// A codec for contexts that only use path addresses
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCodec;

impl FragmentCodec for NullCodec {
    fn parse<D: TreeCursor + ?Sized>(&self, _doc: &D, identifier: &str) -> Result<FragmentTarget> {
        Err(Error::MalformedIdentifier(identifier.to_string()))
    }

    fn generate_character_offset<D: TreeCursor + ?Sized>(
        &self,
        _doc: &D,
        point: Point,
        _filter: &MarkerFilter,
    ) -> Result<String> {
        Err(Error::MalformedIdentifier(format!(
            "no identifier grammar for point in node {}",
            point.container
        )))
    }

    fn generate_element<D: TreeCursor + ?Sized>(
        &self,
        _doc: &D,
        node: NodeId,
        _filter: &MarkerFilter,
    ) -> Result<String> {
        Err(Error::MalformedIdentifier(format!(
            "no identifier grammar for node {}",
            node
        )))
    }

    fn generate_range<D: TreeCursor + ?Sized>(
        &self,
        _doc: &D,
        range: &Range,
        _filter: &MarkerFilter,
    ) -> Result<String> {
        Err(Error::MalformedIdentifier(format!(
            "no identifier grammar for range starting in node {}",
            range.start().container
        )))
    }
}

/// Wrap a bare identifier in the `epubcfi(/99!...)` envelope
pub fn normalize_identifier(identifier: &str) -> Cow<'_, str> {
    if identifier.contains("epubcfi") {
        Cow::Borrowed(identifier)
    } else {
        Cow::Owned(format!("epubcfi(/99!{})", identifier))
    }
}

/// Converts between fragment identifiers and live ranges
#[derive(Debug, Clone, Default)]
pub struct FragmentAddressAdapter<C> {
    codec: C,
    filter: MarkerFilter,
}

impl<C: FragmentCodec> FragmentAddressAdapter<C> {
    pub fn new(codec: C) -> Self {
        FragmentAddressAdapter {
            codec,
            filter: MarkerFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: MarkerFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Resolve `identifier` to a range.
    ///
    /// Exact targets are used as-is. A coarse target becomes the next whole
    /// word from it, so the same identifier always yields the same range.
    pub fn to_range<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        identifier: &str,
        options: &TraversalOptions,
    ) -> Result<Option<Range>> {
        let identifier = normalize_identifier(identifier);
        match self.codec.parse(doc, &identifier)? {
            FragmentTarget::Range { start, end } => Range::build(doc, start, end).map(Some),
            FragmentTarget::Element { node, offset } => {
                debug!(%identifier, node, ?offset, "coarse identifier target, scanning for a word");
                if doc.is_text(node) {
                    let target = offset.filter(|&o| o > 0);
                    if let Some(o) = target {
                        Point::new(node, o).validate(doc)?;
                    }
                    return next_word_from(doc, node, target, options);
                }
                if doc.kind(node).is_none() {
                    return Err(Error::DetachedNode { node });
                }
                match next_text_node(doc, node, options) {
                    Some(text) => next_word_from(doc, text, None, options),
                    None => Ok(None),
                }
            }
        }
    }

    /// Generate an identifier for `range`
    pub fn from_range<D: TreeCursor + ?Sized>(&self, doc: &D, range: &Range) -> Result<String> {
        let start = range.start();
        if !range.is_collapsed() {
            return self.codec.generate_range(doc, range, &self.filter);
        }
        if doc.is_text(start.container) {
            return self
                .codec
                .generate_character_offset(doc, start, &self.filter);
        }

        let identifier = self
            .codec
            .generate_element(doc, start.container, &self.filter)?;
        Ok(match identifier.strip_prefix('!') {
            Some(stripped) => stripped.to_string(),
            None => identifier,
        })
    }
}
