use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::external_ids::ExternalIds;
use crate::media_source::MediaSource;

/// A movie as reported by the media server
///
/// Only `id`, `title`, `release_year`, `external_ids` and the first entry of
/// `sources` take part in duplicate detection. The remaining fields are carried
/// for display and image lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u32>,
    #[serde(default)]
    pub external_ids: ExternalIds,
    /// Files behind this entry; index 0 is the primary file
    #[serde(default)]
    pub sources: Vec<MediaSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_image_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            release_year: None,
            external_ids: ExternalIds::default(),
            sources: Vec::new(),
            date_created: None,
            primary_image_tag: None,
            path: None,
        }
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.release_year = Some(year);
        self
    }

    pub fn with_external_ids(mut self, external_ids: ExternalIds) -> Self {
        self.external_ids = external_ids;
        self
    }

    pub fn with_source(mut self, source: MediaSource) -> Self {
        self.sources.push(source);
        self
    }

    /// The authoritative file for ranking
    pub fn primary_source(&self) -> Option<&MediaSource> {
        self.sources.first()
    }

    /// Size of the primary file, 0 when unknown or when there are no files
    pub fn primary_size(&self) -> u64 {
        self.primary_source().map(MediaSource::size).unwrap_or(0)
    }

    /// Bitrate of the primary file, 0 when unknown or when there are no files
    pub fn primary_bitrate(&self) -> u64 {
        self.primary_source().map(MediaSource::bitrate).unwrap_or(0)
    }
}
