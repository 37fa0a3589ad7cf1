//! DOM Module - Arena-based content document
//!
//! Implements the document tree the position engine walks:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for names, values and text
//! - `TreeCursor`, the read-only navigation seam every engine operation is
//!   generic over

pub mod document;
pub mod node;
pub mod order;
pub mod strings;

pub use document::ContentDocument;
pub use node::{Node, NodeId, NodeKind, StoredAttribute};
pub use order::{document_order, DocumentOrder};
pub use strings::StringPool;

use crate::error::Result;

/// Read-only navigation over a document tree.
///
/// Implementors supply the raw links; traversal helpers are provided.
/// Unknown ids answer `None` everywhere, which callers treat like a node
/// that is not there.
pub trait TreeCursor {
    /// The document (root) node
    fn document_node(&self) -> NodeId;

    /// Kind of a node
    fn kind(&self, node: NodeId) -> Option<NodeKind>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn first_child(&self, node: NodeId) -> Option<NodeId>;
    fn last_child(&self, node: NodeId) -> Option<NodeId>;
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;
    fn prev_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Tag name of an element
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Character content of a text node
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Attribute value of an element (ASCII case-insensitive name match)
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Children in order
    fn children(&self, node: NodeId) -> Children<'_, Self> {
        Children {
            doc: self,
            next: self.first_child(node),
        }
    }

    /// Descendants in pre-order (document order), excluding `node`
    fn descendants(&self, node: NodeId) -> Descendants<'_, Self> {
        Descendants {
            doc: self,
            root: node,
            next: self.first_child(node),
        }
    }

    #[inline]
    fn is_element(&self, node: NodeId) -> bool {
        self.kind(node) == Some(NodeKind::Element)
    }

    #[inline]
    fn is_text(&self, node: NodeId) -> bool {
        self.kind(node) == Some(NodeKind::Text)
    }

    /// Position among the parent's children
    fn child_index(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).position(|child| child == node)
    }

    /// Number of children, or characters for a text node
    fn content_length(&self, node: NodeId) -> usize {
        match self.kind(node) {
            Some(NodeKind::Text) => self.text(node).map_or(0, |t| t.chars().count()),
            Some(_) => self.children(node).count(),
            None => 0,
        }
    }

    /// First element child of the document node
    fn document_element(&self) -> Option<NodeId> {
        let document = self.document_node();
        self.children(document).find(|&c| self.is_element(c))
    }

    /// The top-level reading surface: `body`, else the document element
    fn surface(&self) -> Option<NodeId> {
        let root = self.document_element()?;
        self.children(root)
            .find(|&c| {
                self.tag_name(c)
                    .is_some_and(|t| t.eq_ignore_ascii_case("body"))
            })
            .or(Some(root))
    }

    /// Whether the node reaches the document node through its parents
    fn is_attached(&self, node: NodeId) -> bool {
        if self.kind(node).is_none() {
            return false;
        }
        let document = self.document_node();
        let mut current = node;
        loop {
            if current == document {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Compare two nodes in document order
    fn document_order(&self, a: NodeId, b: NodeId) -> Result<DocumentOrder> {
        order::document_order(self, a, b)
    }
}

/// Iterator over the children of a node
pub struct Children<'d, D: ?Sized> {
    doc: &'d D,
    next: Option<NodeId>,
}

impl<D: TreeCursor + ?Sized> Iterator for Children<'_, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Pre-order iterator over the descendants of a node
pub struct Descendants<'d, D: ?Sized> {
    doc: &'d D,
    root: NodeId,
    next: Option<NodeId>,
}

impl<D: TreeCursor + ?Sized> Iterator for Descendants<'_, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        self.next = match self.doc.first_child(current) {
            Some(child) => Some(child),
            None => {
                let mut node = current;
                loop {
                    if node == self.root {
                        break None;
                    }
                    if let Some(sibling) = self.doc.next_sibling(node) {
                        break Some(sibling);
                    }
                    match self.doc.parent(node) {
                        Some(parent) if parent != self.root => node = parent,
                        _ => break None,
                    }
                }
            }
        };

        Some(current)
    }
}
