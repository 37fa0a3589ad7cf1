//! Content document arena
//!
//! Owns every node of one content document. Built from reader events, with
//! the leniency real e-book markup needs: HTML void elements close
//! themselves, stray end tags close up to the nearest matching open element
//! or are dropped, and all text (whitespace-only runs included) becomes a
//! text node so text ranks stay stable between parses.

use super::node::{Node, NodeId, NodeKind, StoredAttribute};
use super::strings::StringPool;
use super::TreeCursor;
use crate::reader::events::{StartElement, XmlEvent};
use crate::reader::slice::SliceReader;
use tracing::debug;

/// Elements that never have content, whether or not they are written `<x/>`
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Check whether a tag names an HTML void element
pub fn is_void_element(name: &[u8]) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.as_bytes().eq_ignore_ascii_case(name))
}

/// Arena-backed content document
#[derive(Debug)]
pub struct ContentDocument {
    nodes: Vec<Node>,
    attributes: Vec<StoredAttribute>,
    strings: StringPool,
}

impl Default for ContentDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentDocument {
    /// Create a document holding only the document node
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(256);
        nodes.push(Node::document());
        ContentDocument {
            nodes,
            attributes: Vec::with_capacity(128),
            strings: StringPool::new(),
        }
    }

    /// Parse a content document from bytes. Never fails.
    pub fn parse(input: &[u8]) -> Self {
        let mut doc = Self::new();
        doc.build_from_events(input);
        debug!(
            nodes = doc.nodes.len(),
            strings = doc.strings.len(),
            "parsed content document"
        );
        doc
    }

    /// Parse a content document from a string
    pub fn parse_str(input: &str) -> Self {
        Self::parse(input.as_bytes())
    }

    fn build_from_events(&mut self, input: &[u8]) {
        let document: NodeId = 0;
        let mut stack: Vec<NodeId> = vec![document];
        let mut pending_text: Vec<u8> = Vec::new();

        for event in SliceReader::new(input) {
            if let XmlEvent::Text(text) = &event {
                pending_text.extend_from_slice(text);
                continue;
            }
            let parent = *stack.last().unwrap_or(&document);
            self.flush_text(parent, &mut pending_text);

            match event {
                XmlEvent::StartElement(elem) => {
                    let void = is_void_element(elem.name.as_ref());
                    let id = self.push_element(parent, &elem);
                    if !void {
                        stack.push(id);
                    }
                }
                XmlEvent::EmptyElement(elem) => {
                    self.push_element(parent, &elem);
                }
                XmlEvent::EndElement(end) => {
                    let open = stack
                        .iter()
                        .rposition(|&id| id != document && end.closes(self.name_bytes(id)));
                    if let Some(index) = open {
                        stack.truncate(index);
                    }
                }
                XmlEvent::CData(content) => {
                    let value_id = self.strings.intern_bytes(&content);
                    self.push_linked(parent, Node::cdata(value_id));
                }
                XmlEvent::Comment(content) => {
                    let value_id = self.strings.intern_bytes(&content);
                    self.push_linked(parent, Node::comment(value_id));
                }
                XmlEvent::ProcessingInstruction { target, data } => {
                    let name_id = self.strings.intern_bytes(&target);
                    let value_id = data.map_or(0, |d| self.strings.intern_bytes(&d));
                    self.push_linked(parent, Node::processing_instruction(name_id, value_id));
                }
                XmlEvent::Text(_) | XmlEvent::XmlDeclaration | XmlEvent::DocType(_) => {}
            }
        }

        let parent = *stack.last().unwrap_or(&document);
        self.flush_text(parent, &mut pending_text);
    }

    /// Emit buffered text as one node; whitespace outside the document element is dropped
    fn flush_text(&mut self, parent: NodeId, pending: &mut Vec<u8>) {
        if pending.is_empty() {
            return;
        }
        let keep = parent != 0 || !pending.iter().all(u8::is_ascii_whitespace);
        if keep {
            let value_id = self.strings.intern_bytes(pending);
            self.push_linked(parent, Node::text(value_id));
        }
        pending.clear();
    }

    fn push_element(&mut self, parent: NodeId, elem: &StartElement<'_>) -> NodeId {
        let name_id = self.strings.intern_bytes(elem.name.as_ref());
        let attr_start = self.attributes.len() as u32;
        for attr in &elem.attributes {
            let stored = StoredAttribute {
                name_id: self.strings.intern_bytes(attr.name.as_ref()),
                value_id: self.strings.intern_bytes(attr.value.as_ref()),
            };
            self.attributes.push(stored);
        }
        let attr_count = elem.attributes.len().min(u16::MAX as usize) as u16;
        self.push_linked(parent, Node::element(name_id, attr_start, attr_count))
    }

    fn push_linked(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.link_child(parent, id);
        id
    }

    /// Link a child node as the last child of its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child = self.nodes[parent_id as usize].last_child;

        if let Some(last_id) = last_child {
            self.nodes[child_id as usize].prev_sibling = Some(last_id);
            self.nodes[last_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
        self.nodes[child_id as usize].parent = Some(parent_id);
    }

    fn name_bytes(&self, id: NodeId) -> &[u8] {
        self.get_node(id)
            .and_then(|n| self.strings.get(n.name_id))
            .unwrap_or("")
            .as_bytes()
    }

    // ------------------------------------------------------------------
    // Host mutation API. The position engine only reads.
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let name_id = self.strings.intern(tag);
        let attr_start = self.attributes.len() as u32;
        for (name, value) in attributes {
            let stored = StoredAttribute {
                name_id: self.strings.intern(name),
                value_id: self.strings.intern(value),
            };
            self.attributes.push(stored);
        }
        let attr_count = attributes.len().min(u16::MAX as usize) as u16;
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::element(name_id, attr_start, attr_count));
        id
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        let value_id = self.strings.intern(content);
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::text(value_id));
        id
    }

    /// Move `child` (with its subtree) to the end of `parent`'s children.
    ///
    /// Returns false and changes nothing when either id is unknown, the
    /// parent cannot hold children, or the move would make a node its own
    /// ancestor.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let (Some(parent_kind), Some(child_kind)) = (self.kind(parent), self.kind(child)) else {
            return false;
        };
        if !parent_kind.is_container() || child_kind == NodeKind::Document {
            return false;
        }

        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return false;
            }
            ancestor = self.parent(current);
        }

        self.detach(child);
        self.link_child(parent, child);
        true
    }

    /// Unlink a node (and its subtree) from its parent. The document node
    /// cannot be detached.
    pub fn detach(&mut self, node: NodeId) {
        let Some(entry) = self.get_node(node) else {
            return;
        };
        let Some(parent) = entry.parent else {
            return;
        };
        let (prev, next) = (entry.prev_sibling, entry.next_sibling);

        match prev {
            Some(prev) => self.nodes[prev as usize].next_sibling = next,
            None => self.nodes[parent as usize].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next as usize].prev_sibling = prev,
            None => self.nodes[parent as usize].last_child = prev,
        }

        let entry = &mut self.nodes[node as usize];
        entry.parent = None;
        entry.prev_sibling = None;
        entry.next_sibling = None;
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Get a node by ID
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Total nodes in the arena, detached ones included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Concatenated text and CDATA content of a node's subtree
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let own = std::iter::once(id);
        for node in own.chain(self.descendants(id)) {
            if let Some(entry) = self.get_node(node) {
                if matches!(entry.kind, NodeKind::Text | NodeKind::CData) {
                    out.push_str(self.strings.get(entry.value_id).unwrap_or(""));
                }
            }
        }
        out
    }

    /// All attributes of an element as (name, value) pairs
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        let Some(node) = self.get_node(id).filter(|n| n.is_element()) else {
            return Vec::new();
        };
        let start = node.attr_start as usize;
        let end = start + node.attr_count as usize;
        self.attributes
            .get(start..end)
            .unwrap_or(&[])
            .iter()
            .map(|a| {
                (
                    self.strings.get(a.name_id).unwrap_or(""),
                    self.strings.get(a.value_id).unwrap_or(""),
                )
            })
            .collect()
    }

    /// Get the string pool for direct access
    pub fn strings(&self) -> &StringPool {
        &self.strings
    }
}

impl TreeCursor for ContentDocument {
    #[inline]
    fn document_node(&self) -> NodeId {
        0
    }

    #[inline]
    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.get_node(node).map(|n| n.kind)
    }

    #[inline]
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node)?.parent
    }

    #[inline]
    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node)?.first_child
    }

    #[inline]
    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node)?.last_child
    }

    #[inline]
    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node)?.next_sibling
    }

    #[inline]
    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node)?.prev_sibling
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        let entry = self.get_node(node).filter(|n| n.is_element())?;
        self.strings.get(entry.name_id)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        let entry = self.get_node(node).filter(|n| n.is_text())?;
        self.strings.get(entry.value_id)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attributes(node)
            .into_iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn child_tags(doc: &ContentDocument, node: NodeId) -> Vec<String> {
        doc.children(node)
            .map(|c| match doc.tag_name(c) {
                Some(tag) => tag.to_string(),
                None => format!("#{}", doc.text(c).unwrap_or("?")),
            })
            .collect()
    }

    #[test]
    fn test_parse_structure() {
        let doc = ContentDocument::parse_str(
            "<?xml version=\"1.0\"?>\n<!DOCTYPE html>\n<html><head><title>T</title></head><body><p id=\"a\">Hi</p></body></html>\n",
        );
        let html = doc.document_element().unwrap();
        assert_eq!(doc.tag_name(html), Some("html"));
        assert_eq!(doc.children(doc.document_node()).count(), 1);
        assert_eq!(child_tags(&doc, html), vec!["head", "body"]);

        let body = doc.surface().unwrap();
        let p = doc.first_child(body).unwrap();
        assert_eq!(doc.attribute(p, "id"), Some("a"));
        assert_eq!(doc.attribute(p, "ID"), Some("a"));
        assert_eq!(doc.text_content(body), "Hi");
    }

    #[test]
    fn test_void_elements_and_whitespace_text() {
        let doc = ContentDocument::parse_str("<p>a<br>b <img src=x> <span> </span></p>");
        let p = doc.document_element().unwrap();
        assert_eq!(child_tags(&doc, p), vec!["#a", "br", "#b ", "img", "# ", "span"]);
        let span = doc.last_child(p).unwrap();
        assert_eq!(child_tags(&doc, span), vec!["# "]);
    }

    #[test]
    fn test_stray_end_tags() {
        let doc = ContentDocument::parse_str("<div><p>one</span>two</div>three");
        let div = doc.document_element().unwrap();
        let p = doc.first_child(div).unwrap();
        assert_eq!(child_tags(&doc, p), vec!["#one", "#two"]);
        assert_eq!(doc.children(doc.document_node()).count(), 2);
    }

    #[test]
    fn test_stray_lt_merges_into_one_text_node() {
        let doc = ContentDocument::parse_str("<p>1 < 2</p>");
        let p = doc.document_element().unwrap();
        assert_eq!(child_tags(&doc, p), vec!["#1 < 2"]);
    }

    #[test]
    fn test_comments_split_text_and_are_not_text() {
        let doc = ContentDocument::parse_str("<p>a<!--c-->b<![CDATA[d]]></p>");
        let p = doc.document_element().unwrap();
        let kinds: Vec<_> = doc.children(p).map(|c| doc.kind(c).unwrap()).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Text, NodeKind::Comment, NodeKind::Text, NodeKind::CData]
        );
        assert_eq!(doc.text_content(p), "abd");
    }

    #[test]
    fn test_mutation_api() {
        let mut doc = ContentDocument::parse_str("<body><p>x</p></body>");
        let body = doc.document_element().unwrap();
        let p = doc.first_child(body).unwrap();

        let mark = doc.create_element("mark", &[("class", "cfi-marker")]);
        let text = doc.create_text("note");
        assert!(!doc.is_attached(mark));
        assert!(doc.append_child(mark, text));
        assert!(doc.append_child(body, mark));
        assert!(doc.is_attached(text));
        assert_eq!(doc.attribute(mark, "class"), Some("cfi-marker"));
        assert_eq!(child_tags(&doc, body), vec!["p", "mark"]);

        // A node cannot become its own ancestor.
        assert!(!doc.append_child(text, body));
        assert!(!doc.append_child(mark, body));

        doc.detach(p);
        assert_eq!(child_tags(&doc, body), vec!["mark"]);
        assert!(!doc.is_attached(p));
        assert_eq!(doc.prev_sibling(mark), None);

        doc.detach(doc.document_node());
        assert!(doc.is_attached(mark));
    }
}
