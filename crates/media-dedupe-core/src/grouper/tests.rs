use super::*;
use media_dedupe_models::{ExternalIds, MediaSource};

fn movie(id: &str, title: &str, year: Option<u32>) -> CatalogEntry {
    let mut entry = CatalogEntry::new(id, title);
    entry.release_year = year;
    entry
}

fn tmdb_movie(id: &str, tmdb: &str, title: &str, year: Option<u32>) -> CatalogEntry {
    movie(id, title, year).with_external_ids(ExternalIds::new().with_tmdb(tmdb))
}

fn imdb_movie(id: &str, imdb: &str, title: &str) -> CatalogEntry {
    movie(id, title, None).with_external_ids(ExternalIds::new().with_imdb(imdb))
}

fn member_ids(group: &IdentityGroup) -> Vec<&str> {
    group.members.iter().map(|m| m.id.as_str()).collect()
}

#[test]
fn test_normalize_title_deletes_non_alphanumerics() {
    assert_eq!(normalize_title("Spider-Man!"), "spiderman");
    assert_eq!(normalize_title("SpiderMan"), "spiderman");
    assert_eq!(normalize_title("Se7en"), "se7en");
    assert_eq!(normalize_title("  2001: A Space Odyssey "), "2001aspaceodyssey");
    assert_eq!(normalize_title("Amélie"), "amlie");
    assert_eq!(normalize_title(""), "");
}

#[test]
fn test_group_key_priority() {
    let both = movie("1", "Heat", Some(1995))
        .with_external_ids(ExternalIds::new().with_tmdb("949").with_imdb("tt0113277"));
    assert_eq!(group_key(&both), "tmdb-949");

    let imdb_only = imdb_movie("2", "tt0113277", "Heat");
    assert_eq!(group_key(&imdb_only), "imdb-tt0113277");

    let empty_tmdb = movie("3", "Heat", Some(1995))
        .with_external_ids(ExternalIds::new().with_tmdb("").with_imdb("tt0113277"));
    assert_eq!(group_key(&empty_tmdb), "imdb-tt0113277");

    let no_ids = movie("4", "Heat", Some(1995));
    assert_eq!(group_key(&no_ids), "name-heat-1995");
}

#[test]
fn test_group_key_missing_and_zero_year_collide() {
    assert_eq!(group_key(&movie("1", "Heat", None)), "name-heat-0000");
    assert_eq!(group_key(&movie("2", "Heat", Some(0))), "name-heat-0000");
}

#[test]
fn test_tmdb_groups_ignore_title_and_year() {
    let entries = vec![
        tmdb_movie("a", "603", "The Matrix", Some(1999)),
        tmdb_movie("b", "603", "Matrix, The", Some(2000)),
        tmdb_movie("c", "603", "", None),
    ];

    let groups = group(&entries);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "tmdb-603");
    assert_eq!(member_ids(&groups[0]), vec!["a", "b", "c"]);
}

#[test]
fn test_name_groups_require_same_normalized_title_and_year() {
    let entries = vec![
        movie("a", "Dune", Some(1984)),
        movie("b", "Dune", Some(2021)),
        movie("c", "DUNE", Some(1984)),
        movie("d", "Dune Part Two", Some(2024)),
    ];

    let groups = group(&entries);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "name-dune-1984");
    assert_eq!(member_ids(&groups[0]), vec!["a", "c"]);
}

#[test]
fn test_spider_man_titles_group_together() {
    let entries = vec![
        movie("a", "Spider-Man!", Some(2002)),
        movie("b", "spiderman", Some(2002)),
    ];

    let groups = group(&entries);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "name-spiderman-2002");
    assert_eq!(member_ids(&groups[0]), vec!["a", "b"]);
}

#[test]
fn test_singletons_are_dropped() {
    let entries = vec![
        tmdb_movie("a", "1", "Foo", None),
        tmdb_movie("b", "1", "Foo", None),
        movie("c", "Bar", None),
        imdb_movie("d", "tt1", "Baz"),
    ];

    let groups = group(&entries);
    assert_eq!(groups.len(), 1);
    assert!(groups.iter().all(|g| g.members.len() > 1));
    assert_eq!(groups[0].key, "tmdb-1");
    assert_eq!(member_ids(&groups[0]), vec!["a", "b"]);
}

#[test]
fn test_empty_input_yields_no_groups() {
    assert!(group(&[]).is_empty());
    assert!(find_duplicate_groups(&[], "anything").is_empty());
}

#[test]
fn test_empty_titles_group_by_year() {
    let entries = vec![
        movie("a", "", Some(2010)),
        movie("b", "!!!", Some(2010)),
        movie("c", "", Some(2011)),
    ];

    let groups = group(&entries);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "name--2010");
    assert_eq!(member_ids(&groups[0]), vec!["a", "b"]);
}

#[test]
fn test_first_member_supplies_group_metadata() {
    let entries = vec![
        tmdb_movie("a", "78", "Blade Runner", Some(1982)),
        tmdb_movie("b", "78", "Blade Runner (Final Cut)", Some(2007)),
    ];

    let groups = group(&entries);
    assert_eq!(groups[0].title, "Blade Runner");
    assert_eq!(groups[0].year, Some(1982));
}

#[test]
fn test_member_order_follows_input_across_interleaved_keys() {
    let entries = vec![
        tmdb_movie("a1", "1", "A", None),
        tmdb_movie("b1", "2", "B", None),
        tmdb_movie("a2", "1", "A", None),
        tmdb_movie("b2", "2", "B", None),
        tmdb_movie("a3", "1", "A", None),
    ];

    let groups = group(&entries);
    assert_eq!(groups.len(), 2);
    assert_eq!(member_ids(&groups[0]), vec!["a1", "a2", "a3"]);
    assert_eq!(member_ids(&groups[1]), vec!["b1", "b2"]);
}

#[test]
fn test_membership_is_order_independent() {
    let forward = vec![
        tmdb_movie("a", "1", "A", None),
        movie("x", "Solo", Some(2018)),
        tmdb_movie("b", "1", "A", None),
        movie("y", "Solo", Some(2018)),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let mut keys_forward: Vec<(String, Vec<String>)> = group(&forward)
        .into_iter()
        .map(|g| {
            let mut ids: Vec<String> = g.members.into_iter().map(|m| m.id).collect();
            ids.sort();
            (g.key, ids)
        })
        .collect();
    let mut keys_reversed: Vec<(String, Vec<String>)> = group(&reversed)
        .into_iter()
        .map(|g| {
            let mut ids: Vec<String> = g.members.into_iter().map(|m| m.id).collect();
            ids.sort();
            (g.key, ids)
        })
        .collect();
    keys_forward.sort();
    keys_reversed.sort();

    assert_eq!(keys_forward, keys_reversed);
}

#[test]
fn test_grouping_is_deterministic() {
    let entries = vec![
        tmdb_movie("a", "1", "Foo", None).with_source(MediaSource::new(10, 100)),
        movie("b", "Bar", Some(2001)),
        tmdb_movie("c", "1", "Foo", None).with_source(MediaSource::new(20, 100)),
        movie("d", "bar", Some(2001)),
    ];

    assert_eq!(find_duplicate_groups(&entries, ""), find_duplicate_groups(&entries, ""));
}

#[test]
fn test_filter_groups_by_substring() {
    let entries = vec![
        tmdb_movie("a", "1", "Foo", None),
        tmdb_movie("b", "1", "Foo", None),
        tmdb_movie("c", "2", "Barbarian", None),
        tmdb_movie("d", "2", "Barbarian", None),
    ];

    let filtered = filter_groups(group(&entries), "bar");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title, "Barbarian");
}

#[test]
fn test_filter_is_case_insensitive_and_empty_matches_all() {
    let entries = vec![
        tmdb_movie("a", "1", "Foo", None),
        tmdb_movie("b", "1", "Foo", None),
        tmdb_movie("c", "2", "Barbarian", None),
        tmdb_movie("d", "2", "Barbarian", None),
    ];

    assert_eq!(filter_groups(group(&entries), "BARB").len(), 1);
    assert_eq!(filter_groups(group(&entries), "").len(), 2);
    assert!(filter_groups(group(&entries), "zzz").is_empty());
}

#[test]
fn test_sort_groups_by_title_case_insensitive() {
    let entries = vec![
        tmdb_movie("z1", "1", "zodiac", None),
        tmdb_movie("z2", "1", "zodiac", None),
        tmdb_movie("a1", "2", "Alien", None),
        tmdb_movie("a2", "2", "Alien", None),
        tmdb_movie("m1", "3", "Memento", None),
        tmdb_movie("m2", "3", "Memento", None),
    ];

    let groups = find_duplicate_groups(&entries, "");
    let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Memento", "zodiac"]);
}

#[test]
fn test_sort_groups_is_stable_for_equal_titles() {
    let entries = vec![
        tmdb_movie("x1", "10", "Crash", Some(2004)),
        tmdb_movie("x2", "10", "Crash", Some(2004)),
        tmdb_movie("y1", "20", "crash", Some(1996)),
        tmdb_movie("y2", "20", "crash", Some(1996)),
    ];

    let groups = find_duplicate_groups(&entries, "");
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["tmdb-10", "tmdb-20"]);
}

#[test]
fn test_sort_groups_folds_accents() {
    let titles = ["Zodiac", "Élite", "Eden", "Amélie"];
    let entries: Vec<CatalogEntry> = titles
        .iter()
        .enumerate()
        .flat_map(|(i, title)| {
            let tmdb = (i + 1).to_string();
            vec![
                tmdb_movie(&format!("{}-a", i), &tmdb, title, None),
                tmdb_movie(&format!("{}-b", i), &tmdb, title, None),
            ]
        })
        .collect();

    let groups = find_duplicate_groups(&entries, "");
    let sorted: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(sorted, vec!["Amélie", "Eden", "Élite", "Zodiac"]);
}

#[test]
fn test_title_sort_key_tie_break() {
    assert_eq!(title_sort_key("Élite").0, "elite");
    assert_eq!(title_sort_key("Alien"), title_sort_key("alien"));
    assert!(title_sort_key("Elite") < title_sort_key("Élite"));
}
