//! Points and ranges
//!
//! A `Point` is a (container, offset) boundary: offsets index children of an
//! element and characters (Unicode scalar values) of a text node. A `Range`
//! is a pair of points whose start never sorts after its end; the only way
//! to get one is through the normalizing constructors below.

use crate::dom::order::ancestor_chain;
use crate::dom::{DocumentOrder, NodeId, TreeCursor};
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// A boundary point inside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub container: NodeId,
    pub offset: usize,
}

impl Point {
    pub fn new(container: NodeId, offset: usize) -> Self {
        Point { container, offset }
    }

    /// Check that the container exists and the offset is within its content
    pub fn validate<D: TreeCursor + ?Sized>(&self, doc: &D) -> Result<()> {
        if doc.kind(self.container).is_none() {
            return Err(Error::DetachedNode {
                node: self.container,
            });
        }
        let length = doc.content_length(self.container);
        if self.offset > length {
            return Err(Error::OffsetOutOfBounds {
                node: self.container,
                offset: self.offset,
                length,
            });
        }
        Ok(())
    }
}

/// Compare two boundary points.
///
/// Unlike plain node order this accounts for a point whose container is an
/// ancestor of the other point's container: `(p, 2)` sorts after anything
/// inside `p`'s first two children.
pub fn compare_points<D: TreeCursor + ?Sized>(doc: &D, a: Point, b: Point) -> Result<Ordering> {
    if a.container == b.container {
        return Ok(a.offset.cmp(&b.offset));
    }

    let order = doc.document_order(a.container, b.container)?;
    if order == DocumentOrder::Unordered {
        return Err(Error::DetachedNode { node: b.container });
    }

    if let Some(index) = child_index_towards(doc, a.container, b.container) {
        return Ok(if a.offset <= index {
            Ordering::Less
        } else {
            Ordering::Greater
        });
    }
    if let Some(index) = child_index_towards(doc, b.container, a.container) {
        return Ok(if b.offset <= index {
            Ordering::Greater
        } else {
            Ordering::Less
        });
    }

    Ok(match order {
        DocumentOrder::Before => Ordering::Less,
        _ => Ordering::Greater,
    })
}

/// If `ancestor` strictly contains `node`, the index of its child on the path
fn child_index_towards<D: TreeCursor + ?Sized>(doc: &D, ancestor: NodeId, node: NodeId) -> Option<usize> {
    let mut current = node;
    while let Some(parent) = doc.parent(current) {
        if parent == ancestor {
            return doc.child_index(current);
        }
        current = parent;
    }
    None
}

/// A normalized range: `start` is at or before `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: Point,
    end: Point,
    collapsed: bool,
}

impl Range {
    /// Build a range from two points given in either order.
    ///
    /// Both points are validated. Points in unrelated trees fail with
    /// `DetachedNode`.
    pub fn build<D: TreeCursor + ?Sized>(doc: &D, a: Point, b: Point) -> Result<Range> {
        a.validate(doc)?;
        b.validate(doc)?;

        let (start, end) = match compare_points(doc, a, b)? {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };
        Ok(Range {
            start,
            end,
            collapsed: start == end,
        })
    }

    /// A zero-width range at `point`
    pub fn collapsed_at<D: TreeCursor + ?Sized>(doc: &D, point: Point) -> Result<Range> {
        point.validate(doc)?;
        Ok(Range {
            start: point,
            end: point,
            collapsed: true,
        })
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// The selected text, as a selection's string value
    pub fn text<D: TreeCursor + ?Sized>(&self, doc: &D) -> String {
        if self.collapsed {
            return String::new();
        }

        let root = ancestor_chain(doc, self.start.container)[0];
        let mut out = String::new();
        for node in std::iter::once(root).chain(doc.descendants(root)) {
            let Some(content) = doc.text(node) else {
                continue;
            };
            let length = content.chars().count();
            let from = if node == self.start.container {
                self.start.offset
            } else {
                match compare_points(doc, Point::new(node, 0), self.start) {
                    Ok(Ordering::Less) | Err(_) => continue,
                    Ok(_) => 0,
                }
            };
            let to = if node == self.end.container {
                self.end.offset
            } else {
                match compare_points(doc, Point::new(node, length), self.end) {
                    Ok(Ordering::Greater) | Err(_) => continue,
                    Ok(_) => length,
                }
            };
            if from < to {
                out.push_str(char_slice(content, from, to));
            }
        }
        out
    }
}

/// Slice `s` by character positions, clamped to its length
pub(crate) fn char_slice(s: &str, from: usize, to: usize) -> &str {
    let byte_at = |chars: usize| {
        s.char_indices()
            .nth(chars)
            .map_or(s.len(), |(index, _)| index)
    };
    let start = byte_at(from);
    let end = byte_at(to).max(start);
    &s[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ContentDocument;
    use pretty_assertions::assert_eq;

    fn page() -> (ContentDocument, Vec<NodeId>) {
        let doc = ContentDocument::parse_str("<body><p>Hello <b>bold</b> world</p><p>next</p></body>");
        let all = doc.descendants(doc.document_node()).collect();
        (doc, all)
    }

    #[test]
    fn test_validate() {
        let (doc, all) = page();
        let hello = all[2];
        assert!(Point::new(hello, 6).validate(&doc).is_ok());
        assert!(matches!(
            Point::new(hello, 7).validate(&doc),
            Err(Error::OffsetOutOfBounds { offset: 7, length: 6, .. })
        ));
        assert!(matches!(
            Point::new(999, 0).validate(&doc),
            Err(Error::DetachedNode { node: 999 })
        ));
    }

    #[test]
    fn test_build_normalizes_order() {
        let (doc, all) = page();
        let (hello, world) = (all[2], all[5]);
        let a = Point::new(world, 3);
        let b = Point::new(hello, 1);

        let forward = Range::build(&doc, b, a).unwrap();
        let backward = Range::build(&doc, a, b).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.start(), b);
        assert!(!forward.is_collapsed());

        let same = Range::build(&doc, Point::new(hello, 4), Point::new(hello, 2)).unwrap();
        assert_eq!(same.start().offset, 2);

        let collapsed = Range::build(&doc, a, a).unwrap();
        assert!(collapsed.is_collapsed());
    }

    #[test]
    fn test_compare_points_with_ancestor_container() {
        let (doc, all) = page();
        let p = all[1];
        let bold_text = all[4];
        // (p, 2) sits after the <b> child, so after any point inside it.
        assert_eq!(
            compare_points(&doc, Point::new(p, 2), Point::new(bold_text, 1)).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            compare_points(&doc, Point::new(p, 1), Point::new(bold_text, 1)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare_points(&doc, Point::new(bold_text, 4), Point::new(p, 1)).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_range_text() {
        let (doc, all) = page();
        let (hello, world, next) = (all[2], all[5], all[7]);
        let range = Range::build(&doc, Point::new(hello, 2), Point::new(world, 3)).unwrap();
        assert_eq!(range.text(&doc), "llo bold wo");

        let across = Range::build(&doc, Point::new(world, 1), Point::new(next, 2)).unwrap();
        assert_eq!(across.text(&doc), "worldne");

        let element_range = Range::build(&doc, Point::new(all[1], 1), Point::new(all[1], 2)).unwrap();
        assert_eq!(element_range.text(&doc), "bold");
    }

    #[test]
    fn test_detached_points_fail() {
        let mut doc = ContentDocument::parse_str("<body><p>x</p></body>");
        let text = doc.descendants(doc.document_node()).last().unwrap();
        let loose = doc.create_text("loose");
        assert!(matches!(
            Range::build(&doc, Point::new(text, 0), Point::new(loose, 0)),
            Err(Error::DetachedNode { node }) if node == loose
        ));
    }

    #[test]
    fn test_char_slice() {
        assert_eq!(char_slice("héllo", 1, 3), "él");
        assert_eq!(char_slice("abc", 2, 10), "c");
        assert_eq!(char_slice("abc", 3, 1), "");
    }
}
