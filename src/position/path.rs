//! Path addresses
//!
//! A path address is the portable form of a node: an ordered list of
//! selector tokens from the document element down to the target. Each
//! element level is a structural selector that re-locates that element
//! among its siblings; a text node adds a trailing `@text` marker carrying
//! its rank among the parent's text children.
//!
//! Tokens starting with `@` are reserved. Besides the text marker they name
//! pseudo-roots (`@window`, `@document`) which take no part in resolution.

use crate::dom::{NodeId, NodeKind, TreeCursor};
use crate::error::{Error, Result};
use crate::selector::{compile, escape_ident, matcher};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const PSEUDO_PREFIX: char = '@';
const TEXT_MARKER: &str = "@text";
const TEXT_RANK_PREFIX: &str = "@text:nth-child(";

/// A reserved, non-structural address token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoRoot {
    /// `@window`
    Window,
    /// `@document`
    Document,
    /// Any other `@name`, kept verbatim (without the `@`)
    Other(String),
}

/// One token of a path address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Re-locates one element among its siblings
    Structural(String),
    PseudoRoot(PseudoRoot),
    /// Zero-based rank among the parent's text-node children
    TextIndex(usize),
}

impl Selector {
    /// Classify an external token
    pub fn parse(token: &str) -> Self {
        if let Some(rest) = token.strip_prefix(TEXT_MARKER) {
            return Selector::TextIndex(parse_text_rank(rest));
        }
        match token.strip_prefix(PSEUDO_PREFIX) {
            Some("window") => Selector::PseudoRoot(PseudoRoot::Window),
            Some("document") => Selector::PseudoRoot(PseudoRoot::Document),
            Some(name) => Selector::PseudoRoot(PseudoRoot::Other(name.to_string())),
            None => Selector::Structural(token.to_string()),
        }
    }

    /// The selector text actually used for lookup: a `>`-joined chain is
    /// reduced to its last segment
    pub fn lookup_text(&self) -> Option<&str> {
        match self {
            Selector::Structural(token) => Some(token.rsplit('>').next().unwrap_or(token).trim()),
            _ => None,
        }
    }
}

/// `:nth-child(N)` suffix after `@text`; anything malformed is rank 0
fn parse_text_rank(suffix: &str) -> usize {
    suffix
        .strip_prefix(":nth-child(")
        .and_then(|rest| rest.strip_suffix(')'))
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or(0)
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Structural(token) => f.write_str(token),
            Selector::PseudoRoot(PseudoRoot::Window) => f.write_str("@window"),
            Selector::PseudoRoot(PseudoRoot::Document) => f.write_str("@document"),
            Selector::PseudoRoot(PseudoRoot::Other(name)) => write!(f, "@{}", name),
            Selector::TextIndex(0) => f.write_str(TEXT_MARKER),
            Selector::TextIndex(rank) => write!(f, "{}{})", TEXT_RANK_PREFIX, rank),
        }
    }
}

/// Root-to-target selector sequence. Serializes as a plain string array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PathAddress(Vec<Selector>);

impl PathAddress {
    pub fn new(selectors: Vec<Selector>) -> Self {
        PathAddress(selectors)
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, selector: Selector) {
        self.0.push(selector);
    }

    /// Rank of the addressed text node, if the address names one
    pub fn text_rank(&self) -> Option<usize> {
        self.0.iter().rev().find_map(|s| match s {
            Selector::TextIndex(rank) => Some(*rank),
            _ => None,
        })
    }

    /// The external string tokens
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl From<Vec<String>> for PathAddress {
    fn from(tokens: Vec<String>) -> Self {
        PathAddress(tokens.iter().map(|t| Selector::parse(t)).collect())
    }
}

impl From<&[&str]> for PathAddress {
    fn from(tokens: &[&str]) -> Self {
        PathAddress(tokens.iter().map(|t| Selector::parse(t)).collect())
    }
}

impl From<PathAddress> for Vec<String> {
    fn from(address: PathAddress) -> Self {
        address.to_strings()
    }
}

impl FromIterator<Selector> for PathAddress {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        PathAddress(iter.into_iter().collect())
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

/// Zero-based rank of a text node among its parent's text children
pub fn text_rank<D: TreeCursor + ?Sized>(doc: &D, text: NodeId) -> usize {
    let mut rank = 0;
    let mut sibling = doc.prev_sibling(text);
    while let Some(current) = sibling {
        if doc.is_text(current) {
            rank += 1;
        }
        sibling = doc.prev_sibling(current);
    }
    rank
}

/// The text child of `parent` with the given rank
pub fn nth_text_child<D: TreeCursor + ?Sized>(doc: &D, parent: NodeId, rank: usize) -> Option<NodeId> {
    doc.children(parent)
        .filter(|&child| doc.is_text(child))
        .nth(rank)
}

/// The text marker token for a text node (`@text` or `@text:nth-child(N)`)
pub fn text_selector<D: TreeCursor + ?Sized>(doc: &D, text: NodeId) -> Selector {
    Selector::TextIndex(text_rank(doc, text))
}

/// Structural selector for one element: the bare tag when no element
/// sibling shares it, otherwise `tag:nth-child(N)`
pub fn element_selector<D: TreeCursor + ?Sized>(doc: &D, element: NodeId) -> Selector {
    let tag = doc.tag_name(element).unwrap_or_default();
    let escaped = escape_ident(tag);

    let shared = doc.parent(element).is_some_and(|parent| {
        doc.children(parent).any(|sibling| {
            sibling != element
                && doc
                    .tag_name(sibling)
                    .is_some_and(|other| other.eq_ignore_ascii_case(tag))
        })
    });

    if shared {
        let position = matcher::element_position(doc, element, false);
        Selector::Structural(format!("{}:nth-child({})", escaped, position))
    } else {
        Selector::Structural(escaped)
    }
}

/// Encode a node as a root-to-target path address.
///
/// The document node encodes as `["@document"]`; text directly under the
/// document node gets a `@document` root so the address stays resolvable.
/// Structural selectors are unique among siblings at encode time; decoding
/// trusts that.
pub fn encode<D: TreeCursor + ?Sized>(doc: &D, node: NodeId) -> Result<PathAddress> {
    let kind = doc.kind(node).ok_or(Error::DetachedNode { node })?;
    if !matches!(kind, NodeKind::Document | NodeKind::Element | NodeKind::Text) {
        return Err(Error::UnaddressableNode { node });
    }
    if !doc.is_attached(node) {
        return Err(Error::DetachedNode { node });
    }

    let document = doc.document_node();
    let mut selectors = Vec::new();
    let mut current = if kind == NodeKind::Text {
        doc.parent(node)
    } else {
        Some(node)
    };
    while let Some(element) = current.filter(|&n| n != document) {
        selectors.push(element_selector(doc, element));
        current = doc.parent(element);
    }
    if selectors.is_empty() {
        selectors.push(Selector::PseudoRoot(PseudoRoot::Document));
    }
    selectors.reverse();

    if kind == NodeKind::Text {
        selectors.push(text_selector(doc, node));
    }
    Ok(PathAddress(selectors))
}

/// Resolve a path address back to a node.
///
/// Returns `None` when anything fails to resolve: the document may have
/// changed since the address was captured. Selectors are tried against the
/// children of the previously resolved node first, then its descendants.
pub fn decode<D: TreeCursor + ?Sized>(doc: &D, address: &PathAddress) -> Option<NodeId> {
    let mut structural: Vec<&str> = address
        .selectors()
        .iter()
        .filter_map(Selector::lookup_text)
        .collect();
    let has_pseudo_root = address
        .selectors()
        .iter()
        .any(|s| matches!(s, Selector::PseudoRoot(_)));

    if structural.is_empty() && !has_pseudo_root {
        debug!(address = %address, "address has no resolvable root");
        return None;
    }

    // Target-first addresses end at the document element and do not start
    // with it. An `html` element nested deeper keeps a root-first address.
    let is_root = |s: &&str| s.eq_ignore_ascii_case("html");
    let ends_at_root = structural.last().is_some_and(is_root);
    let starts_at_root = structural.first().is_some_and(is_root);
    if structural.len() > 1 && ends_at_root && !starts_at_root {
        structural.reverse();
    }

    let mut current = doc.document_node();
    for text in structural {
        let list = match compile(text) {
            Ok(list) => list,
            Err(error) => {
                debug!(address = %address, %error, "unusable selector in address");
                return None;
            }
        };
        let next = matcher::first_child_match(doc, current, &list)
            .or_else(|| matcher::first_match(doc, current, &list));
        match next {
            Some(node) => current = node,
            None => {
                debug!(address = %address, selector = text, "selector did not resolve");
                return None;
            }
        }
    }

    match address.text_rank() {
        Some(rank) => {
            let text = nth_text_child(doc, current, rank);
            if text.is_none() {
                debug!(address = %address, rank, "text rank did not resolve");
            }
            text
        }
        None => Some(current),
    }
}

/// Target-first, space-joined structural selector with every reserved
/// token removed. Stable across contexts, used to derive identities.
pub fn selector_string(address: &PathAddress) -> String {
    address
        .selectors()
        .iter()
        .rev()
        .filter_map(Selector::lookup_text)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ContentDocument;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const PAGE: &str = "<html><head><title>t</title></head><body>\
        <p>one</p>\
        <p>a<!--c-->b<em>c</em>d</p>\
        <div><span>x</span></div>\
        </body></html>";

    fn strings(address: &PathAddress) -> Vec<String> {
        address.to_strings()
    }

    #[rstest]
    #[case("@text", Selector::TextIndex(0))]
    #[case("@text:nth-child(2)", Selector::TextIndex(2))]
    #[case("@text:nth-child(x)", Selector::TextIndex(0))]
    #[case("@window", Selector::PseudoRoot(PseudoRoot::Window))]
    #[case("@document", Selector::PseudoRoot(PseudoRoot::Document))]
    #[case("@frame", Selector::PseudoRoot(PseudoRoot::Other("frame".into())))]
    #[case("p:nth-child(2)", Selector::Structural("p:nth-child(2)".into()))]
    fn test_selector_parse(#[case] token: &str, #[case] expected: Selector) {
        assert_eq!(Selector::parse(token), expected);
    }

    #[test]
    fn test_selector_display_round_trip() {
        for token in ["@text", "@text:nth-child(3)", "@window", "@document", "@frame", "body"] {
            assert_eq!(Selector::parse(token).to_string(), token);
        }
    }

    #[test]
    fn test_encode_element_and_text() {
        let doc = ContentDocument::parse_str(PAGE);
        let body = doc.surface().unwrap();
        let second_p = doc.children(body).nth(1).unwrap();
        assert_eq!(
            strings(&encode(&doc, second_p).unwrap()),
            vec!["html", "body", "p:nth-child(2)"]
        );

        let texts: Vec<_> = doc.children(second_p).filter(|&c| doc.is_text(c)).collect();
        assert_eq!(
            strings(&encode(&doc, texts[0]).unwrap()),
            vec!["html", "body", "p:nth-child(2)", "@text"]
        );
        assert_eq!(
            strings(&encode(&doc, texts[2]).unwrap()),
            vec!["html", "body", "p:nth-child(2)", "@text:nth-child(2)"]
        );
        assert_eq!(doc.text(texts[2]), Some("d"));
    }

    #[test]
    fn test_round_trip_every_node() {
        let doc = ContentDocument::parse_str(PAGE);
        for node in doc.descendants(doc.document_node()) {
            match encode(&doc, node) {
                Ok(address) => assert_eq!(decode(&doc, &address), Some(node), "{}", address),
                Err(Error::UnaddressableNode { .. }) => {
                    assert_eq!(doc.kind(node), Some(NodeKind::Comment))
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn test_round_trip_nested_html_element() {
        let doc = ContentDocument::parse_str(
            "<html><body><section><html>inner</html></section></body></html>",
        );
        let inner = doc
            .descendants(doc.document_node())
            .filter(|&n| doc.tag_name(n) == Some("html"))
            .nth(1)
            .unwrap();
        let address = encode(&doc, inner).unwrap();
        assert_eq!(strings(&address), vec!["html", "body", "section", "html"]);

        for node in doc.descendants(doc.document_node()) {
            let address = encode(&doc, node).unwrap();
            assert_eq!(decode(&doc, &address), Some(node), "{}", address);
        }
    }

    #[test]
    fn test_document_node() {
        let doc = ContentDocument::parse_str(PAGE);
        let address = encode(&doc, doc.document_node()).unwrap();
        assert_eq!(strings(&address), vec!["@document"]);
        assert_eq!(decode(&doc, &address), Some(doc.document_node()));
    }

    #[test]
    fn test_decode_with_pseudo_roots_and_target_first() {
        let doc = ContentDocument::parse_str(PAGE);
        let address = PathAddress::from(&["@window", "@document", "html", "body", "div", "span"][..]);
        let span = decode(&doc, &address).unwrap();
        assert_eq!(doc.text_content(span), "x");

        let reversed = PathAddress::from(&["span", "div", "body", "html", "@window"][..]);
        assert_eq!(decode(&doc, &reversed), Some(span));

        let chained = PathAddress::from(&["html", "body>div", "span"][..]);
        assert_eq!(decode(&doc, &chained), Some(span));
    }

    #[test]
    fn test_decode_descendant_fallback() {
        let doc = ContentDocument::parse_str(PAGE);
        let address = PathAddress::from(&["body", "span", "@text"][..]);
        let text = decode(&doc, &address).unwrap();
        assert_eq!(doc.text(text), Some("x"));
    }

    #[test]
    fn test_decode_not_found() {
        let doc = ContentDocument::parse_str(PAGE);
        assert_eq!(decode(&doc, &PathAddress::default()), None);
        assert_eq!(decode(&doc, &PathAddress::from(&["@text"][..])), None);
        assert_eq!(decode(&doc, &PathAddress::from(&["html", "aside"][..])), None);
        assert_eq!(decode(&doc, &PathAddress::from(&["html", "p:hover"][..])), None);
        assert_eq!(
            decode(&doc, &PathAddress::from(&["html", "body", "p", "@text:nth-child(5)"][..])),
            None
        );
    }

    #[test]
    fn test_encode_errors() {
        let mut doc = ContentDocument::parse_str(PAGE);
        let comment = doc
            .descendants(doc.document_node())
            .find(|&n| doc.kind(n) == Some(NodeKind::Comment))
            .unwrap();
        assert!(matches!(encode(&doc, comment), Err(Error::UnaddressableNode { .. })));

        let loose = doc.create_element("p", &[]);
        assert!(matches!(encode(&doc, loose), Err(Error::DetachedNode { node }) if node == loose));
    }

    #[test]
    fn test_prefixed_tag_is_escaped() {
        let doc = ContentDocument::parse_str("<html><body><svg:svg><svg:rect/></svg:svg></body></html>");
        let rect = doc
            .descendants(doc.document_node())
            .find(|&n| doc.tag_name(n) == Some("svg:rect"))
            .unwrap();
        let address = encode(&doc, rect).unwrap();
        assert_eq!(strings(&address), vec!["html", "body", "svg\\:svg", "svg\\:rect"]);
        assert_eq!(decode(&doc, &address), Some(rect));
    }

    #[test]
    fn test_serde_string_array() {
        let address = PathAddress::from(&["html", "body", "@text:nth-child(1)"][..]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, r#"["html","body","@text:nth-child(1)"]"#);
        let back: PathAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }

    #[test]
    fn test_selector_string() {
        let address = PathAddress::from(&["@window", "html", "body", "div>p:nth-child(2)", "@text"][..]);
        assert_eq!(selector_string(&address), "p:nth-child(2) body html");
    }
}
