use serde::{Deserialize, Serialize};

/// Third-party metadata identifiers attached to a catalog entry
///
/// Only the TMDB and IMDB keys are recognized. Servers occasionally report a
/// provider key with an empty value, so lookups go through [`ExternalIds::tmdb_id`]
/// and [`ExternalIds::imdb_id`], which treat empty strings as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExternalIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
}

impl ExternalIds {
    /// Create an empty ExternalIds struct
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tmdb(mut self, tmdb: impl Into<String>) -> Self {
        self.tmdb = Some(tmdb.into());
        self
    }

    pub fn with_imdb(mut self, imdb: impl Into<String>) -> Self {
        self.imdb = Some(imdb.into());
        self
    }

    /// TMDB id, if present and non-empty
    pub fn tmdb_id(&self) -> Option<&str> {
        non_empty(self.tmdb.as_deref())
    }

    /// IMDB id, if present and non-empty
    pub fn imdb_id(&self) -> Option<&str> {
        non_empty(self.imdb.as_deref())
    }

    /// Check if neither recognized ID is usable
    pub fn is_empty(&self) -> bool {
        self.tmdb_id().is_none() && self.imdb_id().is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
