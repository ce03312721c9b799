pub mod grouper;
pub mod ranker;
pub mod report;

pub use grouper::{filter_groups, find_duplicate_groups, group, group_key, normalize_title, sort_groups, title_sort_key};
pub use ranker::{duplicate_count, group_wasted_space, pick_preferred, preferred_entry, wasted_space};
pub use report::{DuplicateReport, RankedGroup};
