use chrono::{DateTime, Utc};
use media_dedupe_models::{CatalogEntry, IdentityGroup};
use serde::Serialize;
use tracing::{debug, info};

use crate::grouper::find_duplicate_groups;
use crate::ranker::{duplicate_count, group_wasted_space, preferred_index, wasted_space};

/// A duplicate group together with the copy chosen to keep
#[derive(Debug, Clone, Serialize)]
pub struct RankedGroup {
    #[serde(flatten)]
    pub group: IdentityGroup,
    pub preferred_index: usize,
    pub preferred_id: String,
    pub wasted_bytes: u64,
}

impl RankedGroup {
    /// Returns `None` for an empty group
    pub fn new(group: IdentityGroup) -> Option<Self> {
        let preferred_index = preferred_index(&group.members)?;
        let preferred_id = group.members[preferred_index].id.clone();
        let wasted_bytes = group_wasted_space(&group);
        Some(Self {
            group,
            preferred_index,
            preferred_id,
            wasted_bytes,
        })
    }

    pub fn preferred(&self) -> &CatalogEntry {
        &self.group.members[self.preferred_index]
    }

    /// Every member except the preferred one, in catalog order
    pub fn discardable(&self) -> impl Iterator<Item = &CatalogEntry> {
        let keep = self.preferred_index;
        self.group
            .members
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != keep)
            .map(|(_, entry)| entry)
    }
}

/// Result of one duplicate scan over a catalog snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    pub generated_at: DateTime<Utc>,
    pub scanned_entries: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter: String,
    pub duplicate_count: usize,
    pub wasted_bytes: u64,
    pub groups: Vec<RankedGroup>,
}

impl DuplicateReport {
    /// Run the full pipeline: group, filter, sort, rank
    pub fn build(entries: &[CatalogEntry], filter: &str) -> Self {
        let groups = find_duplicate_groups(entries, filter);
        let duplicate_count = duplicate_count(&groups);
        let wasted_bytes = wasted_space(&groups);

        let ranked: Vec<RankedGroup> = groups.into_iter().filter_map(RankedGroup::new).collect();
        for group in &ranked {
            debug!(
                key = %group.group.key,
                members = group.group.members.len(),
                preferred = %group.preferred_id,
                "ranked duplicate group"
            );
        }

        info!(
            scanned = entries.len(),
            groups = ranked.len(),
            duplicates = duplicate_count,
            wasted_bytes,
            "duplicate scan complete"
        );

        Self {
            generated_at: Utc::now(),
            scanned_entries: entries.len(),
            filter: filter.to_string(),
            duplicate_count,
            wasted_bytes,
            groups: ranked,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Ids of every non-preferred copy across all groups
    pub fn discardable_ids(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|group| group.discardable().map(|entry| entry.id.as_str()))
            .collect()
    }
}
