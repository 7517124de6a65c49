use serde::{Deserialize, Serialize};

use crate::domain::PageId;

pub const FRAGMENT_ROUTE_PREFIX: &str = "/api/page";

pub fn fragment_path(page_id: &PageId) -> String {
    format!("{FRAGMENT_ROUTE_PREFIX}/{page_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentResponse {
    pub html: String,
    pub page_id: PageId,
}

/// State attached to a history entry; only used to resynchronize after
/// back/forward navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub page_index: usize,
    pub url: String,
}

impl HistoryEntry {
    pub fn new(page_index: usize, url: impl Into<String>) -> Self {
        Self {
            page_index,
            url: url.into(),
        }
    }
}
