//! Parallel batch operations
//!
//! Uses Rayon to resolve or encode many positions against one shared,
//! read-only document, e.g. restoring every stored highlight after a reload.

use rayon::prelude::*;
use crate::dom::{NodeId, TreeCursor};
use crate::error::Result;
use crate::position::{encode, highlight_id, Locator, PathAddress, Range, RangeData};

/// Resolve many stored ranges in parallel, preserving input order
pub fn resolve_parallel<D: TreeCursor + Sync + ?Sized>(
    doc: &D,
    ranges: &[RangeData],
) -> Vec<Result<Option<Range>>> {
    ranges
        .par_iter()
        .map(|data| data.resolve(doc))
        .collect()
}

/// Encode many nodes in parallel, preserving input order
pub fn encode_parallel<D: TreeCursor + Sync + ?Sized>(
    doc: &D,
    nodes: &[NodeId],
) -> Vec<Result<PathAddress>> {
    nodes
        .par_iter()
        .map(|&node| encode(doc, node))
        .collect()
}

/// Highlight ids for many locators
pub fn highlight_ids_parallel(locators: &[Locator]) -> Vec<String> {
    locators.par_iter().map(highlight_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ContentDocument;
    use crate::position::Point;
    use pretty_assertions::assert_eq;

    fn page() -> (ContentDocument, Vec<NodeId>) {
        let doc = ContentDocument::parse_str(
            "<html><body><p>alpha</p><p>beta <i>gamma</i></p></body></html>",
        );
        let texts = doc
            .descendants(doc.document_node())
            .filter(|&n| doc.is_text(n))
            .collect();
        (doc, texts)
    }

    #[test]
    fn test_resolve_parallel() {
        let (doc, t) = page();
        let stored: Vec<RangeData> = t
            .iter()
            .map(|&node| {
                let range = Range::build(&doc, Point::new(node, 0), Point::new(node, 2)).unwrap();
                RangeData::from_range(&doc, &range).unwrap()
            })
            .collect();

        let results = resolve_parallel(&doc, &stored);
        assert_eq!(results.len(), 3);
        let texts: Vec<String> = results
            .into_iter()
            .map(|r| r.unwrap().unwrap().text(&doc))
            .collect();
        assert_eq!(texts, vec!["al", "be", "ga"]);
    }

    #[test]
    fn test_encode_parallel_matches_sequential() {
        let (doc, _) = page();
        let nodes: Vec<NodeId> = doc.descendants(doc.document_node()).collect();
        let parallel = encode_parallel(&doc, &nodes);
        for (node, address) in nodes.iter().zip(parallel) {
            assert_eq!(address.unwrap(), encode(&doc, *node).unwrap());
        }
    }

    #[test]
    fn test_highlight_ids_parallel() {
        let ids = highlight_ids_parallel(&["a".into(), "b".into()]);
        assert_eq!(ids, vec!["highlight-a", "highlight-b"]);
    }
}
