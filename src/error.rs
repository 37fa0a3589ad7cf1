//! Error types
//!
//! "Not found" is never an error in this crate: addresses that no longer
//! resolve, exhausted traversals and missing words come back as `None`.
//! The variants below are the conditions a caller has to react to.

use crate::dom::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The node has no parent chain to the document root.
    #[error("node {node} is not attached to the document")]
    DetachedNode { node: NodeId },

    /// The external fragment parser rejected the identifier.
    #[error("malformed fragment identifier: {0}")]
    MalformedIdentifier(String),

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("offset {offset} is out of bounds for node {node} (length {length})")]
    OffsetOutOfBounds {
        node: NodeId,
        offset: usize,
        length: usize,
    },

    /// Comments and processing instructions cannot be path-addressed.
    #[error("node {node} cannot be addressed by a path")]
    UnaddressableNode { node: NodeId },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        Error::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}
