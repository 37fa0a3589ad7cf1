//! Highlight identity and selection reporting

use super::element_info::Locator;
use super::path::selector_string;
use super::point::Range;
use super::range_data::RangeData;
use crate::dom::TreeCursor;
use crate::error::Result;
use serde::{Deserialize, Serialize};

const HIGHLIGHT_PREFIX: &str = "highlight-";

/// Stable identity for a highlight anchored at `locator`.
///
/// The same locator gives the same id in every context the document is
/// loaded in, so stored highlights can be matched up after a reload.
pub fn highlight_id(locator: &Locator) -> String {
    match locator {
        Locator::Identifier(identifier) => format!("{}{}", HIGHLIGHT_PREFIX, identifier),
        Locator::RangeData(data) => {
            let key = format!(
                "{}{}{}{}",
                selector_string(&data.start_container),
                data.start_offset,
                selector_string(&data.end_container),
                data.end_offset
            );
            let mut id = String::with_capacity(HIGHLIGHT_PREFIX.len() + key.len());
            id.push_str(HIGHLIGHT_PREFIX);
            id.extend(key.chars().filter(|&c| c != ' '));
            id
        }
    }
}

/// What the host reports when the user's selection changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionReport {
    pub text: String,
    pub range_data: Option<RangeData>,
}

impl SelectionReport {
    /// Report for the current selection, or an empty report when nothing is
    /// selected
    pub fn from_selection<D: TreeCursor + ?Sized>(doc: &D, selection: Option<&Range>) -> Result<Self> {
        let Some(range) = selection else {
            return Ok(SelectionReport {
                text: String::new(),
                range_data: None,
            });
        };
        Ok(SelectionReport {
            text: range.text(doc),
            range_data: Some(RangeData::from_range(doc, range)?),
        })
    }
}
