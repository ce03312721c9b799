use serde::{Deserialize, Serialize};

use crate::catalog_entry::CatalogEntry;

/// Catalog entries that share a grouping key
///
/// Built fresh on every scan. `title` and `year` come from the first member
/// seen for the key; `members` keeps catalog order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityGroup {
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    pub members: Vec<CatalogEntry>,
}

impl IdentityGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// More than one entry shares this key
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }
}
