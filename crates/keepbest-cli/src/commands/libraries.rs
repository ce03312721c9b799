use super::catalog::{load_settings, open_source};
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use media_dedupe_config::PathManager;
use serde_json::json;
use std::path::PathBuf;

pub async fn run_libraries(snapshot: Option<PathBuf>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let (config, credentials) = load_settings(&path_manager)?;

    let source = open_source(&config, &credentials, snapshot.as_deref()).await?;
    let libraries = source
        .get_libraries()
        .await
        .wrap_err("Failed to list libraries")?;

    if !output.is_human() {
        output.json(&json!({ "libraries": libraries }));
        return Ok(());
    }

    if libraries.is_empty() {
        output.warn(format!("{} reports no libraries", source.source_name()));
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Id").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Name").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Type").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Scanned").add_attribute(comfy_table::Attribute::Bold),
    ]);

    for library in &libraries {
        let scanned = if library.is_movies() {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no")
        };
        table.add_row(vec![
            Cell::new(&library.id),
            Cell::new(&library.name),
            Cell::new(library.collection_type.as_deref().unwrap_or("-")),
            scanned,
        ]);
    }

    output.println(table.to_string());
    if let Some(library_id) = &config.scan.library_id {
        output.info(format!("Configured scan library: {}", library_id));
    }

    Ok(())
}
