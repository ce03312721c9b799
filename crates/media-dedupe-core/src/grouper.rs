// Grouping of catalog entries into identity groups

use media_dedupe_models::{CatalogEntry, IdentityGroup};
use std::collections::HashMap;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Year token used in name keys when an entry has no usable year
const UNKNOWN_YEAR: &str = "0000";

/// Lower-case the title and drop every character outside `[a-z0-9]`
///
/// Characters are deleted rather than replaced, so "Spider-Man" and
/// "SpiderMan" both become "spiderman".
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Compute the grouping key for an entry
///
/// Priority: non-empty TMDB id, then non-empty IMDB id, then normalized title
/// plus release year. A missing year and a year of 0 both map to "0000".
pub fn group_key(entry: &CatalogEntry) -> String {
    if let Some(tmdb) = entry.external_ids.tmdb_id() {
        return format!("tmdb-{}", tmdb);
    }
    if let Some(imdb) = entry.external_ids.imdb_id() {
        return format!("imdb-{}", imdb);
    }

    let year = match entry.release_year {
        Some(year) if year != 0 => year.to_string(),
        _ => UNKNOWN_YEAR.to_string(),
    };
    format!("name-{}-{}", normalize_title(&entry.title), year)
}

/// Partition entries by key and keep only groups with more than one member
///
/// Groups come out in the order their key was first seen, members in catalog
/// order. The first member of each group supplies its title and year.
pub fn group(entries: &[CatalogEntry]) -> Vec<IdentityGroup> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<IdentityGroup> = Vec::new();

    for entry in entries {
        let key = group_key(entry);
        if let Some(&position) = positions.get(&key) {
            groups[position].members.push(entry.clone());
            continue;
        }

        positions.insert(key.clone(), groups.len());
        groups.push(IdentityGroup {
            key,
            title: entry.title.clone(),
            year: entry.release_year,
            members: vec![entry.clone()],
        });
    }

    let candidate_count = groups.len();
    let duplicates: Vec<IdentityGroup> = groups
        .into_iter()
        .filter(IdentityGroup::is_duplicate)
        .collect();

    debug!(
        "group: entries={}, keys={}, duplicate_groups={}",
        entries.len(),
        candidate_count,
        duplicates.len()
    );

    duplicates
}

/// Keep groups whose title contains `filter`, ignoring case
///
/// An empty filter keeps everything.
pub fn filter_groups(groups: Vec<IdentityGroup>, filter: &str) -> Vec<IdentityGroup> {
    if filter.is_empty() {
        return groups;
    }

    let needle = filter.to_lowercase();
    groups
        .into_iter()
        .filter(|group| group.title.to_lowercase().contains(&needle))
        .collect()
}

/// Sort key for presenting groups: accents and case folded first, the
/// lower-cased title as tie-break
///
/// "Élite" sorts next to "Eden" rather than after "Zodiac"; "alien" and
/// "Alien" produce equal keys and keep their relative order.
pub fn title_sort_key(title: &str) -> (String, String) {
    let folded = title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    (folded, title.to_lowercase())
}

/// Stable ascending sort by title
pub fn sort_groups(groups: &mut [IdentityGroup]) {
    groups.sort_by_cached_key(|group| title_sort_key(&group.title));
}

/// Group, filter and sort in one pass over a catalog snapshot
pub fn find_duplicate_groups(entries: &[CatalogEntry], filter: &str) -> Vec<IdentityGroup> {
    let mut groups = filter_groups(group(entries), filter);
    sort_groups(&mut groups);
    groups
}

#[cfg(test)]
mod tests;
