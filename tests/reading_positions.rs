use folio::position::{find_next_word_after_offset, PseudoRoot, Selector, WordSpan};
use folio::{
    decode, encode, next_text_node, next_word, ContentDocument, Error, FragmentAddressAdapter,
    FragmentCodec, FragmentTarget, Locator, MarkerFilter, NodeId, PathAddress, Point, Range,
    RangeData, Result, TraversalOptions, TreeCursor,
};
use folio::position::ElementInfo;
use pretty_assertions::assert_eq;
use rstest::rstest;

const CHAPTER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Chapter One</title></head>
<body>
  <section id="c1">
    <h1>Chapter One</h1>
    <p>It was a <em>bright</em> cold day in April,</p>
    <p>   </p>
    <p>and the clocks were striking thirteen.<br/>Winston Smith</p>
  </section>
  <div class="cfi-marker"></div>
  <p>End &amp; after</p>
</body>
</html>"#;

fn chapter() -> ContentDocument {
    ContentDocument::parse_str(CHAPTER)
}

fn text_nodes(doc: &ContentDocument) -> Vec<NodeId> {
    doc.descendants(doc.document_node())
        .filter(|&n| doc.is_text(n))
        .collect()
}

/// Identifiers of the form `epubcfi(/99!node=<id>)` resolve to a coarse
/// node target; `epubcfi(/99!node=<id>;offset=<n>)` adds an offset.
struct NodeNumberCodec;

impl FragmentCodec for NodeNumberCodec {
    fn parse<D: TreeCursor + ?Sized>(&self, _doc: &D, identifier: &str) -> Result<FragmentTarget> {
        let malformed = || Error::MalformedIdentifier(identifier.to_string());
        let inner = identifier
            .strip_prefix("epubcfi(/99!node=")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(malformed)?;
        let (node, offset) = match inner.split_once(";offset=") {
            Some((node, offset)) => (node, Some(offset.parse().map_err(|_| malformed())?)),
            None => (inner, None),
        };
        Ok(FragmentTarget::Element {
            node: node.parse().map_err(|_| malformed())?,
            offset,
        })
    }

    fn generate_character_offset<D: TreeCursor + ?Sized>(
        &self,
        _doc: &D,
        point: Point,
        _filter: &MarkerFilter,
    ) -> Result<String> {
        Ok(format!("node={};offset={}", point.container, point.offset))
    }

    fn generate_element<D: TreeCursor + ?Sized>(
        &self,
        _doc: &D,
        node: NodeId,
        _filter: &MarkerFilter,
    ) -> Result<String> {
        Ok(format!("!node={}", node))
    }

    fn generate_range<D: TreeCursor + ?Sized>(
        &self,
        _doc: &D,
        range: &Range,
        _filter: &MarkerFilter,
    ) -> Result<String> {
        Ok(format!(
            "node={};offset={}",
            range.start().container,
            range.start().offset
        ))
    }
}

#[test]
fn test_round_trip_every_element_and_text() {
    let doc = chapter();
    for node in doc.descendants(doc.document_node()) {
        if !(doc.is_element(node) || doc.is_text(node)) {
            continue;
        }
        let address = encode(&doc, node).unwrap();
        assert_eq!(decode(&doc, &address), Some(node), "address {}", address);

        let json = serde_json::to_string(&address).unwrap();
        let restored: PathAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(decode(&doc, &restored), Some(node));
    }
}

#[test]
fn test_build_is_order_invariant() {
    let doc = chapter();
    let texts = text_nodes(&doc);
    let points: Vec<Point> = texts
        .iter()
        .flat_map(|&t| [Point::new(t, 0), Point::new(t, doc.content_length(t))])
        .collect();

    for &p in &points {
        for &q in &points {
            let forward = Range::build(&doc, p, q).unwrap();
            let backward = Range::build(&doc, q, p).unwrap();
            assert_eq!(forward, backward);
            assert_ne!(
                folio::position::compare_points(&doc, forward.start(), forward.end()).unwrap(),
                std::cmp::Ordering::Greater
            );
        }
    }
}

#[rstest]
#[case("the quick  fox", Some(0), Some((4, 9)))]
#[case("lastword", Some(0), None)]
fn test_word_scan_scenarios(
    #[case] content: &str,
    #[case] target: Option<usize>,
    #[case] expected: Option<(usize, usize)>,
) {
    let found = find_next_word_after_offset(content, target).map(|w: WordSpan| (w.start_offset, w.end_offset));
    assert_eq!(found, expected);
}

#[test]
fn test_single_trailing_word_without_successor() {
    let doc = ContentDocument::parse_str("<html><body><p>lastword</p></body></html>");
    let text = text_nodes(&doc)[0];
    let result = next_word(&doc, Point::new(text, 0), &TraversalOptions::default()).unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_address_with_pseudo_root_and_text_rank() {
    let doc = ContentDocument::parse_str(
        "<html><body>zero<hr/>one<hr/>two<hr/>three</body></html>",
    );
    let address = PathAddress::from(&["@window", "body", "@text:nth-child(2)"][..]);
    assert_eq!(
        address.selectors()[0],
        Selector::PseudoRoot(PseudoRoot::Window)
    );

    let node = decode(&doc, &address).unwrap();
    assert_eq!(doc.text(node), Some("two"));
    assert_eq!(
        encode(&doc, node).unwrap().to_strings(),
        vec!["html", "body", "@text:nth-child(2)"]
    );
}

#[test]
fn test_coarse_identifier_falls_back_to_first_word() {
    let doc = ContentDocument::parse_str(
        "<html><body><div id=\"target\">  <span>hello world</span></div></body></html>",
    );
    let div = folio::selector::query_first(&doc, doc.document_node(), "#target")
        .unwrap()
        .unwrap();

    let adapter = FragmentAddressAdapter::new(NodeNumberCodec);
    let range = adapter
        .to_range(&doc, &format!("node={}", div), &TraversalOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(range.text(&doc), "hello");

    // the same identifier always yields the same range
    let again = adapter
        .to_range(&doc, &format!("node={}", div), &TraversalOptions::default())
        .unwrap();
    assert_eq!(again, Some(range));
}

#[test]
fn test_next_word_is_monotonic() {
    let doc = chapter();
    let options = TraversalOptions::default();
    let mut cursor = Point::new(doc.surface().unwrap(), 0);
    let mut words = Vec::new();

    while let Some(range) = next_word(&doc, cursor, &options).unwrap() {
        if !words.is_empty() {
            assert_eq!(
                folio::position::compare_points(&doc, range.start(), cursor).unwrap(),
                std::cmp::Ordering::Greater
            );
        }
        words.push(range.text(&doc));
        cursor = range.end();
    }

    assert_eq!(
        words,
        vec![
            "Chapter", "One", "It", "was", "a", "bright", "cold", "day", "in", "April,", "and",
            "the", "clocks", "were", "striking", "thirteen.", "Winston", "Smith", "End", "&",
            "after",
        ]
    );
}

#[test]
fn test_not_empty_never_returns_blank_text() {
    let doc = chapter();
    let options = TraversalOptions::default().with_not_empty(true);
    for node in doc.descendants(doc.document_node()) {
        if let Some(found) = next_text_node(&doc, node, &options) {
            assert!(!doc.text(found).unwrap().trim().is_empty());
        }
    }
}

#[test]
fn test_collapsed_results_are_zero_width() {
    let doc = chapter();
    let options = TraversalOptions::default()
        .with_collapsed(true)
        .with_not_empty(true);
    let info = ElementInfo::new(FragmentAddressAdapter::new(NodeNumberCodec));

    let mut locator = Locator::start_of_document();
    for _ in 0..5 {
        let range = info.next_word_range(&doc, &locator, &options).unwrap().unwrap();
        assert!(range.is_collapsed());
        assert_eq!(range.start(), range.end());

        let data = RangeData::from_range(&doc, &range).unwrap();
        assert!(data.collapsed);
        let node_range = info
            .next_text_node_range(&doc, &data.clone().into(), &options)
            .unwrap()
            .unwrap();
        assert!(node_range.is_collapsed());
        locator = data.into();
    }
}

#[test]
fn test_next_word_identifier_uses_character_offset_generator() {
    let doc = chapter();
    let info = ElementInfo::new(FragmentAddressAdapter::new(NodeNumberCodec));
    let options = TraversalOptions::default().with_collapsed(true);

    let identifier = info
        .next_word_identifier(&doc, &Locator::start_of_document(), &options)
        .unwrap()
        .unwrap();
    let heading_text = text_nodes(&doc)
        .into_iter()
        .find(|&t| doc.text(t) == Some("Chapter One") && doc.parent(t).and_then(|p| doc.tag_name(p)) == Some("h1"))
        .unwrap();
    assert_eq!(identifier, format!("node={};offset=0", heading_text));
}
