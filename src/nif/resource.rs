//! ResourceArc Wrappers
//!
//! A parsed content document kept alive on the Rust side between calls.

use crate::dom::ContentDocument;
use rustler::ResourceArc;

/// Wrapper for ContentDocument that can be stored in a ResourceArc.
///
/// The document is parsed once and never mutated afterwards, so every call
/// (including dirty-scheduler batch calls) reads it without locking.
pub struct DocumentResource {
    pub doc: ContentDocument,
}

impl DocumentResource {
    pub fn new(input: &[u8]) -> Self {
        DocumentResource {
            doc: ContentDocument::parse(input),
        }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;
