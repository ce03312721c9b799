// Preferred-copy selection and duplicate statistics

use media_dedupe_models::{CatalogEntry, IdentityGroup};

/// Whether `current` beats `prev`: higher primary bitrate, then strictly
/// larger primary size. Full ties go to `prev`.
fn outranks(current: &CatalogEntry, prev: &CatalogEntry) -> bool {
    let prev_bitrate = prev.primary_bitrate();
    let curr_bitrate = current.primary_bitrate();

    if curr_bitrate != prev_bitrate {
        return curr_bitrate > prev_bitrate;
    }
    current.primary_size() > prev.primary_size()
}

/// Index of the copy to keep
///
/// Left fold over `members`; the earliest of equally ranked entries wins.
/// Returns `None` only for an empty slice.
pub fn preferred_index(members: &[CatalogEntry]) -> Option<usize> {
    let mut indexed = members.iter().enumerate();
    let first = indexed.next()?;

    let (index, _) = indexed.fold(first, |prev, current| {
        if outranks(current.1, prev.1) {
            current
        } else {
            prev
        }
    });
    Some(index)
}

/// The copy to keep
pub fn preferred_entry(members: &[CatalogEntry]) -> Option<&CatalogEntry> {
    preferred_index(members).map(|index| &members[index])
}

/// Id of the copy to keep
pub fn pick_preferred(members: &[CatalogEntry]) -> Option<&str> {
    preferred_entry(members).map(|entry| entry.id.as_str())
}

/// Number of entries that are extra copies: sum of (members - 1)
pub fn duplicate_count(groups: &[IdentityGroup]) -> usize {
    groups
        .iter()
        .map(|group| group.members.len().saturating_sub(1))
        .sum()
}

/// Bytes freed by keeping only the largest copy of one group
pub fn group_wasted_space(group: &IdentityGroup) -> u64 {
    let sizes = group.members.iter().map(CatalogEntry::primary_size);
    let total: u64 = sizes.clone().sum();
    let largest = sizes.max().unwrap_or(0);
    total - largest
}

/// Sum of [`group_wasted_space`] over all groups
pub fn wasted_space(groups: &[IdentityGroup]) -> u64 {
    groups.iter().map(group_wasted_space).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_dedupe_models::{ExternalIds, MediaSource};

    fn copy(id: &str, bitrate: u64, size: u64) -> CatalogEntry {
        CatalogEntry::new(id, "Movie").with_source(MediaSource::new(size, bitrate))
    }

    fn group_of(members: Vec<CatalogEntry>) -> IdentityGroup {
        IdentityGroup {
            key: "tmdb-1".to_string(),
            title: "Movie".to_string(),
            year: None,
            members,
        }
    }

    #[test]
    fn test_pick_preferred_first_occurrence_of_max() {
        let members = vec![copy("0", 5000, 10), copy("1", 8000, 5), copy("2", 8000, 5)];
        assert_eq!(preferred_index(&members), Some(1));
        assert_eq!(pick_preferred(&members), Some("1"));
    }

    #[test]
    fn test_pick_preferred_single_member() {
        let members = vec![copy("only", 0, 0)];
        assert_eq!(pick_preferred(&members), Some("only"));
    }

    #[test]
    fn test_pick_preferred_empty() {
        assert_eq!(pick_preferred(&[]), None);
    }

    #[test]
    fn test_bitrate_beats_size() {
        let members = vec![copy("big", 1000, 9_000_000), copy("sharp", 2000, 1)];
        assert_eq!(pick_preferred(&members), Some("sharp"));
    }

    #[test]
    fn test_size_breaks_bitrate_tie() {
        let members = vec![copy("small", 3000, 10), copy("large", 3000, 11), copy("mid", 3000, 10)];
        assert_eq!(pick_preferred(&members), Some("large"));
    }

    #[test]
    fn test_lower_bitrate_never_wins_on_size() {
        let members = vec![copy("a", 4000, 1), copy("b", 3999, 1_000_000)];
        assert_eq!(pick_preferred(&members), Some("a"));
    }

    #[test]
    fn test_full_tie_keeps_earliest() {
        let members = vec![copy("first", 100, 100), copy("second", 100, 100), copy("third", 100, 100)];
        assert_eq!(pick_preferred(&members), Some("first"));
    }

    #[test]
    fn test_missing_sources_read_as_zero() {
        let bare = CatalogEntry::new("bare", "Movie");
        let no_values = CatalogEntry::new("empty", "Movie").with_source(MediaSource::default());
        let real = copy("real", 1, 1);

        assert_eq!(pick_preferred(&[bare.clone(), no_values.clone()]), Some("bare"));
        assert_eq!(pick_preferred(&[bare, no_values, real]), Some("real"));
    }

    #[test]
    fn test_only_primary_source_is_ranked() {
        let first = copy("first", 2000, 10);
        let second = CatalogEntry::new("second", "Movie")
            .with_source(MediaSource::new(10, 1000))
            .with_source(MediaSource::new(50, 99_000));
        assert_eq!(pick_preferred(&[first, second]), Some("first"));
    }

    #[test]
    fn test_foo_bar_scenario() {
        let ids = ExternalIds::new().with_tmdb("1");
        let a = CatalogEntry::new("A", "Foo")
            .with_external_ids(ids.clone())
            .with_source(MediaSource { bitrate_bps: Some(1000), ..MediaSource::default() });
        let b = CatalogEntry::new("B", "Foo")
            .with_external_ids(ids)
            .with_source(MediaSource { bitrate_bps: Some(2000), ..MediaSource::default() });
        let c = CatalogEntry::new("C", "Bar");

        let groups = crate::grouper::find_duplicate_groups(&[a, b, c], "");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "tmdb-1");
        assert_eq!(pick_preferred(&groups[0].members), Some("B"));
    }

    #[test]
    fn test_wasted_space_of_one_group() {
        let group = group_of(vec![copy("a", 0, 10), copy("b", 0, 20), copy("c", 0, 30)]);
        assert_eq!(group_wasted_space(&group), 30);
        assert_eq!(wasted_space(&[group]), 30);
    }

    #[test]
    fn test_aggregates_over_groups() {
        let groups = vec![
            group_of(vec![copy("a", 0, 10), copy("b", 0, 20), copy("c", 0, 30)]),
            group_of(vec![copy("d", 0, 5), CatalogEntry::new("e", "Movie")]),
        ];
        assert_eq!(duplicate_count(&groups), 3);
        assert_eq!(wasted_space(&groups), 30);
    }

    #[test]
    fn test_aggregates_of_nothing() {
        assert_eq!(duplicate_count(&[]), 0);
        assert_eq!(wasted_space(&[]), 0);
    }
}
