//! Positions inside a document
//!
//! - `path`: portable structural addresses for nodes
//! - `point`: boundary points and normalized ranges
//! - `range_data`: the serializable form of a range
//! - `traversal`: next text node / next word in reading order
//! - `fragment`: compact fragment identifiers through a pluggable codec
//! - `element_info`: locator-driven navigation
//! - `highlight`: highlight ids and selection reports

pub mod element_info;
pub mod fragment;
pub mod highlight;
pub mod path;
pub mod point;
pub mod range_data;
pub mod traversal;

pub use element_info::{ElementInfo, Locator};
pub use fragment::{
    normalize_identifier, FragmentAddressAdapter, FragmentCodec, FragmentTarget, MarkerFilter,
    NullCodec,
};
pub use highlight::{highlight_id, SelectionReport};
pub use path::{decode, encode, selector_string, PathAddress, PseudoRoot, Selector};
pub use point::{compare_points, Point, Range};
pub use range_data::RangeData;
pub use traversal::{
    find_next_word_after_offset, next_text_node, next_text_node_range, next_word,
    TraversalOptions, WordSpan,
};
