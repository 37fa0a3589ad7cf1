//! Folio - Position addressing for e-book content documents
//!
//! Layers:
//! - core / reader: memchr-backed lenient markup scanning (zero-copy events)
//! - dom: arena document model behind the `TreeCursor` trait
//! - selector: the CSS subset used by structural path selectors
//! - position: path addresses, ranges, reading-order traversal, fragment
//!   identifiers, highlight ids
//! - strategy: Rayon batch operations
//! - nif (feature `nif`): BEAM bindings

pub mod core;
pub mod dom;
pub mod error;
pub mod position;
pub mod reader;
pub mod selector;
pub mod strategy;

#[cfg(feature = "nif")]
mod nif;

pub use dom::{ContentDocument, NodeId, NodeKind, TreeCursor};
pub use error::{Error, Result};
pub use position::{
    decode, encode, highlight_id, next_text_node, next_text_node_range, next_word, ElementInfo,
    FragmentAddressAdapter, FragmentCodec, FragmentTarget, Locator, MarkerFilter, NullCodec,
    PathAddress, Point, Range, RangeData, SelectionReport, TraversalOptions,
};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(all(feature = "nif", feature = "mimalloc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
