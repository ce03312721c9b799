use super::catalog::{load_settings, open_source, scan_libraries, LibraryReport, ScanArgs};
use crate::output::{format_bitrate, format_bytes, Output};
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use media_dedupe_config::PathManager;
use media_dedupe_core::RankedGroup;
use media_dedupe_models::CatalogEntry;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_scan(args: ScanArgs, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let (config, credentials) = load_settings(&path_manager)?;
    let args = args.with_defaults(&config);

    let source = open_source(&config, &credentials, args.snapshot.as_deref()).await?;
    let reports = scan_libraries(source.as_ref(), &args, output.is_human() && !output.is_quiet()).await?;

    if output.is_human() {
        print_reports(&reports, output);
    } else {
        output.json(&reports_json(&reports));
    }

    Ok(())
}

pub fn reports_json(reports: &[LibraryReport]) -> serde_json::Value {
    let duplicate_count: usize = reports.iter().map(|r| r.report.duplicate_count).sum();
    let wasted_bytes: u64 = reports.iter().map(|r| r.report.wasted_bytes).sum();

    json!({
        "duplicate_count": duplicate_count,
        "wasted_bytes": wasted_bytes,
        "libraries": reports.iter().map(LibraryReport::to_json).collect::<Vec<_>>(),
    })
}

fn print_reports(reports: &[LibraryReport], output: &Output) {
    let mut total_duplicates = 0;
    let mut total_wasted = 0;

    for library_report in reports {
        let report = &library_report.report;
        output.println("");
        output.println(format!(
            "{} {} ({} movies scanned)",
            "Library:".bold(),
            library_report.library.name.bright_cyan(),
            report.scanned_entries
        ));

        if report.is_empty() {
            output.success("No duplicates found");
            continue;
        }

        for group in &report.groups {
            output.println("");
            output.println(group_heading(group));
            output.println(group_table(group).to_string());
        }

        output.println("");
        output.info(format!(
            "{} duplicate(s) in {} group(s), {} reclaimable",
            report.duplicate_count,
            report.groups.len(),
            format_bytes(report.wasted_bytes)
        ));

        total_duplicates += report.duplicate_count;
        total_wasted += report.wasted_bytes;
    }

    if reports.len() > 1 {
        output.println("");
        output.success(format!(
            "Total: {} duplicate(s), {} reclaimable",
            total_duplicates,
            format_bytes(total_wasted)
        ));
    }
}

fn group_heading(group: &RankedGroup) -> String {
    let year = group
        .group
        .year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();

    format!(
        "{}{} {}",
        group.group.title.bold(),
        year,
        format!("[{}]", group.group.key).dimmed()
    )
}

fn group_table(group: &RankedGroup) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new(""),
        Cell::new("Id").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Size").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Bitrate").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Resolution").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Container").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Added").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Path").add_attribute(comfy_table::Attribute::Bold),
    ]);

    for (index, entry) in group.group.members.iter().enumerate() {
        let keep = index == group.preferred_index;
        let marker = if keep {
            Cell::new("✓ keep").fg(Color::Green)
        } else {
            Cell::new("")
        };

        let mut row = vec![marker];
        row.extend(entry_cells(entry));
        table.add_row(row);
    }

    table
}

fn entry_cells(entry: &CatalogEntry) -> Vec<Cell> {
    let source = entry.primary_source();
    let size = source
        .and_then(|s| s.size_bytes)
        .map(format_bytes)
        .unwrap_or_else(|| "-".to_string());
    let bitrate = format_bitrate(source.and_then(|s| s.display_bitrate()));
    let resolution = source
        .and_then(|s| s.resolution())
        .map(|(w, h)| format!("{}x{}", w, h))
        .unwrap_or_else(|| "-".to_string());
    let container = source
        .and_then(|s| s.container.clone())
        .unwrap_or_else(|| "-".to_string());
    let added = entry
        .date_created
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    vec![
        Cell::new(&entry.id),
        Cell::new(size),
        Cell::new(bitrate),
        Cell::new(resolution),
        Cell::new(container),
        Cell::new(added),
        Cell::new(entry.path.as_deref().unwrap_or("-")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_dedupe_core::DuplicateReport;
    use media_dedupe_models::{ExternalIds, Library, MediaSource};

    fn heat_report() -> LibraryReport {
        let entries = vec![
            CatalogEntry::new("a", "Heat")
                .with_year(1995)
                .with_external_ids(ExternalIds::new().with_tmdb("949"))
                .with_source(MediaSource::new(4_000, 5_000)),
            CatalogEntry::new("b", "Heat")
                .with_year(1995)
                .with_external_ids(ExternalIds::new().with_tmdb("949"))
                .with_source(MediaSource::new(9_000, 8_000)),
        ];

        LibraryReport {
            library: Library {
                id: "lib".to_string(),
                name: "Movies".to_string(),
                collection_type: Some("movies".to_string()),
            },
            report: DuplicateReport::build(&entries, ""),
        }
    }

    #[test]
    fn test_reports_json_totals() {
        let value = reports_json(&[heat_report(), heat_report()]);
        assert_eq!(value["duplicate_count"], 2);
        assert_eq!(value["wasted_bytes"], 8_000);

        let group = &value["libraries"][0]["report"]["groups"][0];
        assert_eq!(value["libraries"][0]["library"]["name"], "Movies");
        assert_eq!(group["key"], "tmdb-949");
        assert_eq!(group["preferred_id"], "b");
    }

    #[test]
    fn test_group_table_marks_preferred() {
        let library_report = heat_report();
        let rendered = group_table(&library_report.report.groups[0]).to_string();
        let keep_line = rendered
            .lines()
            .find(|line| line.contains("✓ keep"))
            .unwrap();
        assert!(keep_line.contains(" b "));
    }
}
