//! Document node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of document node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

impl NodeKind {
    /// Whether the kind can hold children
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element)
    }

    /// Whether the kind carries character data
    #[inline]
    pub fn is_character_data(self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::CData | NodeKind::Comment | NodeKind::ProcessingInstruction
        )
    }
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the document node and detached subtree roots)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// String pool id of the tag name (elements) or PI target
    pub name_id: u32,
    /// String pool id of the character data (text, CDATA, comments, PI data)
    pub value_id: u32,
    /// Start of attributes in the attribute arena (elements)
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u16,
}

impl Node {
    fn with_kind(kind: NodeKind, name_id: u32, value_id: u32) -> Self {
        Node {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            value_id,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Create the document root node
    pub fn document() -> Self {
        Self::with_kind(NodeKind::Document, 0, 0)
    }

    /// Create an unlinked element node
    pub fn element(name_id: u32, attr_start: u32, attr_count: u16) -> Self {
        Node {
            attr_start,
            attr_count,
            ..Self::with_kind(NodeKind::Element, name_id, 0)
        }
    }

    /// Create an unlinked text node
    pub fn text(value_id: u32) -> Self {
        Self::with_kind(NodeKind::Text, 0, value_id)
    }

    /// Create an unlinked CDATA node
    pub fn cdata(value_id: u32) -> Self {
        Self::with_kind(NodeKind::CData, 0, value_id)
    }

    /// Create an unlinked comment node
    pub fn comment(value_id: u32) -> Self {
        Self::with_kind(NodeKind::Comment, 0, value_id)
    }

    /// Create an unlinked processing instruction node
    pub fn processing_instruction(name_id: u32, value_id: u32) -> Self {
        Self::with_kind(NodeKind::ProcessingInstruction, name_id, value_id)
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Check if this node has children
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// Stored attribute
#[derive(Debug, Clone, Copy)]
pub struct StoredAttribute {
    /// String pool id of the attribute name
    pub name_id: u32,
    /// String pool id of the attribute value
    pub value_id: u32,
}
