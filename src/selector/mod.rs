//! Selector Engine
//!
//! The CSS subset used by structural path selectors:
//! - Type, universal, `#id`, `.class`, `[attr]`, `[attr=value]`
//! - `:nth-child()`, `:nth-of-type()`, `:first-child`, `:last-child`
//! - Descendant and child combinators, selector lists
//! - Compiled selector caching

pub mod cache;
pub mod lexer;
pub mod matcher;
pub mod parser;

pub use cache::compile;
pub use lexer::escape_ident;
pub use parser::SelectorList;

use crate::dom::{NodeId, TreeCursor};
use crate::error::Result;

/// First element below `scope` matching `selector`, in document order
pub fn query_first<D: TreeCursor + ?Sized>(
    doc: &D,
    scope: NodeId,
    selector: &str,
) -> Result<Option<NodeId>> {
    let list = compile(selector)?;
    Ok(matcher::first_match(doc, scope, &list))
}

/// Every element below `scope` matching `selector`, in document order
pub fn query_all<D: TreeCursor + ?Sized>(
    doc: &D,
    scope: NodeId,
    selector: &str,
) -> Result<Vec<NodeId>> {
    let list = compile(selector)?;
    Ok(matcher::all_matches(doc, scope, &list))
}

/// Check whether `node` is an element matching `selector`
pub fn matches<D: TreeCursor + ?Sized>(doc: &D, node: NodeId, selector: &str) -> Result<bool> {
    let list = compile(selector)?;
    Ok(matcher::matches_list(doc, node, &list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ContentDocument;
    use crate::error::Error;

    #[test]
    fn test_query_functions() {
        let doc = ContentDocument::parse_str("<body><p>a</p><p class=\"x\">b</p></body>");
        let root = doc.document_node();

        let first = query_first(&doc, root, "p").unwrap().unwrap();
        assert_eq!(doc.text_content(first), "a");
        assert_eq!(query_all(&doc, root, "body > p").unwrap().len(), 2);
        assert!(query_first(&doc, root, "span").unwrap().is_none());

        let second = query_first(&doc, root, ".x").unwrap().unwrap();
        assert!(matches(&doc, second, "p:last-child").unwrap());
        assert!(!matches(&doc, first, "p:last-child").unwrap());
    }

    #[test]
    fn test_invalid_selector_propagates() {
        let doc = ContentDocument::parse_str("<p/>");
        assert!(matches!(
            query_first(&doc, doc.document_node(), "p ~ q"),
            Err(Error::InvalidSelector { .. })
        ));
    }
}
