use super::catalog::{load_settings, open_source, scan_libraries, LibraryReport, ScanArgs};
use super::prompts;
use super::scan_ui::is_interactive;
use crate::output::{format_bytes, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_dedupe_config::PathManager;
use media_dedupe_models::CatalogEntry;
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::{info, warn};

/// One copy scheduled for removal, with the copy it loses to
pub struct PlannedDeletion<'a> {
    pub library: &'a str,
    pub entry: &'a CatalogEntry,
    pub kept: &'a CatalogEntry,
}

/// Every non-preferred member of every group, in report order
pub fn plan_deletions(reports: &[LibraryReport]) -> Vec<PlannedDeletion<'_>> {
    reports
        .iter()
        .flat_map(|library_report| {
            library_report.report.groups.iter().flat_map(move |group| {
                let kept = group.preferred();
                group.discardable().map(move |entry| PlannedDeletion {
                    library: library_report.library.name.as_str(),
                    entry,
                    kept,
                })
            })
        })
        .collect()
}

pub async fn run_delete(args: ScanArgs, dry_run: bool, yes: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let (config, credentials) = load_settings(&path_manager)?;
    let args = args.with_defaults(&config);

    let source = open_source(&config, &credentials, args.snapshot.as_deref()).await?;
    let reports = scan_libraries(source.as_ref(), &args, output.is_human() && !output.is_quiet()).await?;
    let planned = plan_deletions(&reports);

    if planned.is_empty() {
        if output.is_human() {
            output.success("No duplicates to delete");
        } else {
            output.json(&json!({ "dry_run": dry_run, "deleted": [], "failed": [] }));
        }
        return Ok(());
    }

    let reclaimable: u64 = planned.iter().map(|p| p.entry.primary_size()).sum();
    print_plan(&planned, output);

    if dry_run {
        if output.is_human() {
            output.info(format!(
                "Dry run: would delete {} item(s), freeing {}",
                planned.len(),
                format_bytes(reclaimable)
            ));
        } else {
            let ids: Vec<&str> = planned.iter().map(|p| p.entry.id.as_str()).collect();
            output.json(&json!({
                "dry_run": true,
                "planned": ids,
                "reclaimable_bytes": reclaimable,
            }));
        }
        return Ok(());
    }

    if !yes {
        if !is_interactive() {
            return Err(eyre!("Refusing to delete without confirmation. Pass --yes to skip the prompt"));
        }
        let prompt = format!(
            "Delete {} item(s) from {} ({})?",
            planned.len(),
            source.source_name(),
            format_bytes(reclaimable)
        );
        if !prompts::prompt_yes_no_with_output(&prompt, Some(false), Some(output))? {
            output.warn("Aborted, nothing was deleted");
            return Ok(());
        }
    }

    let mut deleted = Vec::new();
    let mut failed = Vec::new();
    for item in &planned {
        let id = item.entry.id.as_str();
        match source.delete_item(id).await {
            Ok(()) => {
                info!(id, title = %item.entry.title, "deleted duplicate");
                deleted.push(id);
            }
            Err(e) => {
                warn!(id, error = %e, "failed to delete duplicate");
                output.warn_human(format!("Failed to delete {} ({}): {}", item.entry.title, id, e));
                let auth_error = e.is_auth_error();
                failed.push(json!({ "id": id, "error": e.to_string() }));
                if auth_error {
                    break;
                }
            }
        }
    }

    if output.is_human() {
        output.success(format!("Deleted {} of {} item(s)", deleted.len(), planned.len()));
    } else {
        output.json(&json!({
            "dry_run": false,
            "deleted": deleted,
            "failed": failed,
        }));
    }

    deletion_outcome(deleted.len(), failed.len())
}

/// Any failed deletion makes the command fail, even after partial success
pub fn deletion_outcome(deleted: usize, failed: usize) -> Result<()> {
    match (deleted, failed) {
        (_, 0) => Ok(()),
        (0, failed) => Err(eyre!("No items could be deleted ({} failed)", failed)),
        (deleted, failed) => Err(eyre!(
            "{} item(s) could not be deleted ({} deleted)",
            failed,
            deleted
        )),
    }
}

fn print_plan(planned: &[PlannedDeletion<'_>], output: &Output) {
    if !output.is_human() {
        return;
    }

    output.println("");
    for item in planned {
        let year = item
            .entry
            .release_year
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        output.println(format!(
            "  {} {}{} {} [{}] {}, keeping {}",
            "✗".red(),
            item.entry.title,
            year,
            item.entry.id.dimmed(),
            item.library,
            format_bytes(item.entry.primary_size()),
            item.kept.id.green()
        ));
    }
    output.println("");
}
