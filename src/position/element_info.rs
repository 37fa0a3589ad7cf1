//! Navigation driven by a stored locator
//!
//! A locator is whatever a caller persisted for a position: either full
//! range data or a compact fragment identifier. These operations resolve it
//! and answer with the next text node or the next word, in whichever form
//! the caller wants back.

use super::fragment::{FragmentAddressAdapter, FragmentCodec};
use super::point::{Point, Range};
use super::range_data::RangeData;
use super::traversal::{next_text_node_range, next_word, TraversalOptions};
use crate::dom::TreeCursor;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A persisted position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    RangeData(RangeData),
    Identifier(String),
}

impl Locator {
    /// The empty identifier, meaning the start of the reading surface
    pub fn start_of_document() -> Self {
        Locator::Identifier(String::new())
    }
}

impl From<RangeData> for Locator {
    fn from(data: RangeData) -> Self {
        Locator::RangeData(data)
    }
}

impl From<String> for Locator {
    fn from(identifier: String) -> Self {
        Locator::Identifier(identifier)
    }
}

impl From<&str> for Locator {
    fn from(identifier: &str) -> Self {
        Locator::Identifier(identifier.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ElementInfo<C> {
    adapter: FragmentAddressAdapter<C>,
}

impl<C: FragmentCodec> ElementInfo<C> {
    pub fn new(adapter: FragmentAddressAdapter<C>) -> Self {
        ElementInfo { adapter }
    }

    pub fn adapter(&self) -> &FragmentAddressAdapter<C> {
        &self.adapter
    }

    /// Where `locator` starts. `Ok(None)` if it does not resolve.
    pub fn start_point<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        locator: &Locator,
        options: &TraversalOptions,
    ) -> Result<Option<Point>> {
        let range = match locator {
            Locator::Identifier(identifier) if identifier.is_empty() => {
                let surface = doc.surface().unwrap_or_else(|| doc.document_node());
                return Ok(Some(Point::new(surface, 0)));
            }
            Locator::Identifier(identifier) => self.adapter.to_range(doc, identifier, options)?,
            Locator::RangeData(data) => data.resolve(doc)?,
        };
        if range.is_none() {
            debug!(?locator, "locator did not resolve to a start point");
        }
        Ok(range.map(|r| r.start()))
    }

    /// The next qualifying text node after the locator's start container
    pub fn next_text_node_range<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        locator: &Locator,
        options: &TraversalOptions,
    ) -> Result<Option<Range>> {
        match self.start_point(doc, locator, options)? {
            Some(start) => next_text_node_range(doc, start.container, options),
            None => Ok(None),
        }
    }

    pub fn next_text_node_data<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        locator: &Locator,
        options: &TraversalOptions,
    ) -> Result<Option<RangeData>> {
        self.next_text_node_range(doc, locator, options)?
            .map(|range| RangeData::from_range(doc, &range))
            .transpose()
    }

    pub fn next_text_node_identifier<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        locator: &Locator,
        options: &TraversalOptions,
    ) -> Result<Option<String>> {
        self.next_text_node_range(doc, locator, options)?
            .map(|range| self.adapter.from_range(doc, &range))
            .transpose()
    }

    /// The next whole word after the locator's start point
    pub fn next_word_range<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        locator: &Locator,
        options: &TraversalOptions,
    ) -> Result<Option<Range>> {
        match self.start_point(doc, locator, options)? {
            Some(start) => next_word(doc, start, options),
            None => Ok(None),
        }
    }

    pub fn next_word_data<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        locator: &Locator,
        options: &TraversalOptions,
    ) -> Result<Option<RangeData>> {
        self.next_word_range(doc, locator, options)?
            .map(|range| RangeData::from_range(doc, &range))
            .transpose()
    }

    pub fn next_word_identifier<D: TreeCursor + ?Sized>(
        &self,
        doc: &D,
        locator: &Locator,
        options: &TraversalOptions,
    ) -> Result<Option<String>> {
        self.next_word_range(doc, locator, options)?
            .map(|range| self.adapter.from_range(doc, &range))
            .transpose()
    }
}
