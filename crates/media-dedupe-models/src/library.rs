use serde::{Deserialize, Serialize};

/// A top-level library (view) on the media server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Library {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<String>,
}

impl Library {
    /// Movie libraries are the only ones scanned for duplicates
    pub fn is_movies(&self) -> bool {
        self.collection_type
            .as_deref()
            .map(|t| t.eq_ignore_ascii_case("movies"))
            .unwrap_or(false)
    }
}
