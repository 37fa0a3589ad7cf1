//! Transport form of a range
//!
//! `RangeData` carries both boundary points as path addresses so a range
//! captured in one context can be rebuilt in another, or after a reload.

use super::path::{decode, encode, PathAddress};
use super::point::{Point, Range};
use crate::dom::TreeCursor;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "nif", derive(rustler::NifMap))]
#[serde(rename_all = "camelCase")]
pub struct RangeData {
    pub start_offset: usize,
    pub start_container: PathAddress,
    pub end_offset: usize,
    pub end_container: PathAddress,
    pub collapsed: bool,
}

impl RangeData {
    /// Capture a live range
    pub fn from_range<D: TreeCursor + ?Sized>(doc: &D, range: &Range) -> Result<Self> {
        let (start, end) = (range.start(), range.end());
        Ok(RangeData {
            start_offset: start.offset,
            start_container: encode(doc, start.container)?,
            end_offset: end.offset,
            end_container: encode(doc, end.container)?,
            collapsed: range.is_collapsed(),
        })
    }

    /// Rebuild the live range. `Ok(None)` when either address no longer
    /// resolves or a stored offset no longer fits the resolved content.
    pub fn resolve<D: TreeCursor + ?Sized>(&self, doc: &D) -> Result<Option<Range>> {
        let (Some(start), Some(end)) = (
            decode(doc, &self.start_container),
            decode(doc, &self.end_container),
        ) else {
            warn!(
                start = %self.start_container,
                end = %self.end_container,
                "range data did not resolve against the document"
            );
            return Ok(None);
        };

        match Range::build(
            doc,
            Point::new(start, self.start_offset),
            Point::new(end, self.end_offset),
        ) {
            Ok(range) => Ok(Some(range)),
            Err(Error::OffsetOutOfBounds { node, offset, length }) => {
                warn!(
                    node,
                    offset,
                    length,
                    start = %self.start_container,
                    "stored offset is past the end of the resolved node"
                );
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }
}
