//! Reading-order traversal
//!
//! Two forward searches in document order: the next qualifying text node
//! after a container, and the next whole word after a character offset.
//! The upward walk through ancestors is iterative, so deep documents cannot
//! exhaust the stack.

use super::point::{Point, Range};
use crate::dom::{NodeId, TreeCursor};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Options shared by the traversal operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "nif", derive(rustler::NifMap))]
#[serde(rename_all = "camelCase", default)]
pub struct TraversalOptions {
    /// Skip text nodes whose trimmed content is empty
    pub not_empty: bool,
    /// Accept the starting node itself if it qualifies
    pub include_first_node: bool,
    /// Return a zero-width result at the start instead of the full span
    pub collapsed: bool,
}

impl TraversalOptions {
    pub fn with_not_empty(mut self, value: bool) -> Self {
        self.not_empty = value;
        self
    }

    pub fn with_include_first_node(mut self, value: bool) -> Self {
        self.include_first_node = value;
        self
    }

    pub fn with_collapsed(mut self, value: bool) -> Self {
        self.collapsed = value;
        self
    }
}

/// Character offsets of one word inside a text node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordSpan {
    pub start_offset: usize,
    /// One past the last character
    pub end_offset: usize,
}

impl WordSpan {
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.end_offset == self.start_offset
    }
}

/// Whether `node` is a text node passing the `not_empty` filter
pub fn is_wanted<D: TreeCursor + ?Sized>(doc: &D, node: NodeId, options: &TraversalOptions) -> bool {
    match doc.text(node) {
        Some(content) => !options.not_empty || !content.trim().is_empty(),
        None => false,
    }
}

/// First qualifying text node among the descendants of `root`, depth first
pub fn find_text_node<D: TreeCursor + ?Sized>(
    doc: &D,
    root: NodeId,
    options: &TraversalOptions,
) -> Option<NodeId> {
    doc.descendants(root)
        .find(|&node| is_wanted(doc, node, options))
}

/// The next qualifying text node in reading order after `start`.
///
/// From the top-level surface (or above it) the whole surface is searched.
/// Otherwise the start itself is considered when `include_first_node` is
/// set, then its descendants, then later siblings of the start and of each
/// ancestor in turn, stopping at the surface.
pub fn next_text_node<D: TreeCursor + ?Sized>(
    doc: &D,
    start: NodeId,
    options: &TraversalOptions,
) -> Option<NodeId> {
    if is_boundary(doc, start) {
        let surface = doc.surface().unwrap_or_else(|| doc.document_node());
        return find_text_node(doc, surface, options);
    }

    if options.include_first_node && is_wanted(doc, start, options) {
        return Some(start);
    }
    find_text_node(doc, start, options).or_else(|| following_text_node(doc, start, options))
}

/// The document node, the document element or the reading surface
fn is_boundary<D: TreeCursor + ?Sized>(doc: &D, node: NodeId) -> bool {
    node == doc.document_node()
        || Some(node) == doc.surface()
        || Some(node) == doc.document_element()
}

/// First qualifying text node after the whole subtree of `node`: later
/// siblings of the node and of each ancestor, stopping at the surface
fn following_text_node<D: TreeCursor + ?Sized>(
    doc: &D,
    node: NodeId,
    options: &TraversalOptions,
) -> Option<NodeId> {
    let mut current = node;
    while !is_boundary(doc, current) {
        let mut sibling = doc.next_sibling(current);
        while let Some(candidate) = sibling {
            if is_wanted(doc, candidate, options) {
                return Some(candidate);
            }
            if let Some(found) = find_text_node(doc, candidate, options) {
                return Some(found);
            }
            sibling = doc.next_sibling(candidate);
        }
        trace!(node = current, "no text after node, moving to parent");
        current = doc.parent(current)?;
    }
    None
}

/// First qualifying text node at or after an element boundary point: the
/// child at `offset` and everything after it. Points on the document node
/// or on a document element above the surface search the whole surface.
fn text_node_from_element_point<D: TreeCursor + ?Sized>(
    doc: &D,
    point: Point,
    options: &TraversalOptions,
) -> Option<NodeId> {
    let container = point.container;
    let surface = doc.surface();
    let above_surface = container == doc.document_node()
        || (Some(container) == doc.document_element() && Some(container) != surface);
    if above_surface {
        return next_text_node(doc, container, options);
    }

    match doc.children(container).nth(point.offset) {
        Some(child) => next_text_node(doc, child, &options.with_include_first_node(true)),
        None => following_text_node(doc, container, options),
    }
}

/// The next qualifying text node as a range over its whole content
/// (collapsed at its start when `options.collapsed`)
pub fn next_text_node_range<D: TreeCursor + ?Sized>(
    doc: &D,
    start: NodeId,
    options: &TraversalOptions,
) -> Result<Option<Range>> {
    let Some(node) = next_text_node(doc, start, options) else {
        return Ok(None);
    };
    let end = if options.collapsed {
        0
    } else {
        doc.content_length(node)
    };
    Range::build(doc, Point::new(node, 0), Point::new(node, end)).map(Some)
}

/// The first whitespace-delimited word in `content` starting strictly
/// after `target`. With no target every word qualifies.
pub fn find_next_word_after_offset(content: &str, target: Option<usize>) -> Option<WordSpan> {
    let mut word_start: Option<usize> = None;

    for (index, c) in content.chars().chain(std::iter::once(' ')).enumerate() {
        match (c.is_whitespace(), word_start) {
            (false, None) => word_start = Some(index),
            (true, Some(start)) => {
                if target.map_or(true, |t| start > t) {
                    return Some(WordSpan {
                        start_offset: start,
                        end_offset: index,
                    });
                }
                word_start = None;
            }
            _ => {}
        }
    }
    None
}

/// The next word after `point`, continuing into later text nodes.
///
/// In a text container, words starting at or before the offset are
/// skipped. In an element container the scan starts at the child at the
/// offset. Every following text node is scanned from its beginning.
pub fn next_word<D: TreeCursor + ?Sized>(
    doc: &D,
    point: Point,
    options: &TraversalOptions,
) -> Result<Option<Range>> {
    point.validate(doc)?;

    if doc.is_text(point.container) {
        return next_word_from(doc, point.container, Some(point.offset), options);
    }
    match text_node_from_element_point(doc, point, options) {
        Some(node) => next_word_from(doc, node, None, options),
        None => Ok(None),
    }
}

/// Scan `text` from `target`, then each following qualifying text node
pub(crate) fn next_word_from<D: TreeCursor + ?Sized>(
    doc: &D,
    text: NodeId,
    target: Option<usize>,
    options: &TraversalOptions,
) -> Result<Option<Range>> {
    let onward = options.with_include_first_node(false);
    let mut node = text;
    let mut target = target;

    loop {
        let content = doc.text(node).unwrap_or_default();
        if let Some(span) = find_next_word_after_offset(content, target) {
            let start = Point::new(node, span.start_offset);
            let range = if options.collapsed {
                Range::collapsed_at(doc, start)?
            } else {
                Range::build(doc, start, Point::new(node, span.end_offset))?
            };
            return Ok(Some(range));
        }

        match next_text_node(doc, node, &onward) {
            Some(next) => {
                node = next;
                target = None;
            }
            None => return Ok(None),
        }
    }
}
