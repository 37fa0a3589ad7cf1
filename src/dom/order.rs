//! Document order comparison between nodes

use super::{NodeId, TreeCursor};
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Relative position of two nodes in a depth-first pre-order walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrder {
    Before,
    After,
    Equal,
    /// The nodes live in different trees
    Unordered,
}

impl DocumentOrder {
    /// Map to an `Ordering`, if the nodes share a tree
    pub fn to_ordering(self) -> Option<Ordering> {
        match self {
            DocumentOrder::Before => Some(Ordering::Less),
            DocumentOrder::After => Some(Ordering::Greater),
            DocumentOrder::Equal => Some(Ordering::Equal),
            DocumentOrder::Unordered => None,
        }
    }
}

/// Ancestor chain of `node`, root first
pub(crate) fn ancestor_chain<D: TreeCursor + ?Sized>(doc: &D, node: NodeId) -> Vec<NodeId> {
    let mut chain = vec![node];
    let mut current = node;
    while let Some(parent) = doc.parent(current) {
        chain.push(parent);
        current = parent;
    }
    chain.reverse();
    chain
}

/// Compare `a` and `b` in document order.
///
/// Nodes inside the same detached subtree are still ordered against each
/// other. When exactly one of the nodes is cut off from the document the
/// comparison fails with `DetachedNode` naming it; when both are, in
/// different subtrees, the answer is `Unordered`.
pub fn document_order<D: TreeCursor + ?Sized>(doc: &D, a: NodeId, b: NodeId) -> Result<DocumentOrder> {
    if a == b {
        return Ok(DocumentOrder::Equal);
    }
    if doc.kind(a).is_none() {
        return Err(Error::DetachedNode { node: a });
    }
    if doc.kind(b).is_none() {
        return Err(Error::DetachedNode { node: b });
    }

    let chain_a = ancestor_chain(doc, a);
    let chain_b = ancestor_chain(doc, b);

    if chain_a[0] != chain_b[0] {
        let document = doc.document_node();
        return match (chain_a[0] == document, chain_b[0] == document) {
            (true, false) => Err(Error::DetachedNode { node: b }),
            (false, true) => Err(Error::DetachedNode { node: a }),
            _ => Ok(DocumentOrder::Unordered),
        };
    }

    let shared = chain_a
        .iter()
        .zip(chain_b.iter())
        .take_while(|(x, y)| x == y)
        .count();

    // One chain is a prefix of the other: the ancestor comes first.
    if shared == chain_a.len() {
        return Ok(DocumentOrder::Before);
    }
    if shared == chain_b.len() {
        return Ok(DocumentOrder::After);
    }

    let (branch_a, branch_b) = (chain_a[shared], chain_b[shared]);
    let mut sibling = doc.next_sibling(branch_a);
    while let Some(current) = sibling {
        if current == branch_b {
            return Ok(DocumentOrder::Before);
        }
        sibling = doc.next_sibling(current);
    }
    Ok(DocumentOrder::After)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ContentDocument;

    fn nodes(doc: &ContentDocument) -> Vec<NodeId> {
        doc.descendants(doc.document_node()).collect()
    }

    #[test]
    fn test_equal_and_ancestor() {
        let doc = ContentDocument::parse_str("<div><p>a</p></div>");
        let all = nodes(&doc);
        let (div, p, text) = (all[0], all[1], all[2]);
        assert_eq!(document_order(&doc, p, p).unwrap(), DocumentOrder::Equal);
        assert_eq!(document_order(&doc, div, text).unwrap(), DocumentOrder::Before);
        assert_eq!(document_order(&doc, text, div).unwrap(), DocumentOrder::After);
    }

    #[test]
    fn test_siblings_and_cousins() {
        let doc = ContentDocument::parse_str("<div><p>a</p><p>b</p></div>");
        let all = nodes(&doc);
        let (a, b) = (all[2], all[4]);
        assert_eq!(doc.text(a), Some("a"));
        assert_eq!(doc.text(b), Some("b"));
        assert_eq!(document_order(&doc, a, b).unwrap(), DocumentOrder::Before);
        assert_eq!(document_order(&doc, b, a).unwrap(), DocumentOrder::After);
    }

    #[test]
    fn test_detached_nodes() {
        let mut doc = ContentDocument::parse_str("<div><p>a</p></div>");
        let div = doc.document_element().unwrap();
        let loose = doc.create_text("loose");
        let other = doc.create_element("span", &[]);

        assert!(matches!(
            document_order(&doc, div, loose),
            Err(Error::DetachedNode { node }) if node == loose
        ));
        assert_eq!(
            document_order(&doc, loose, other).unwrap(),
            DocumentOrder::Unordered
        );

        assert!(doc.append_child(other, loose));
        assert_eq!(document_order(&doc, other, loose).unwrap(), DocumentOrder::Before);
    }
}
