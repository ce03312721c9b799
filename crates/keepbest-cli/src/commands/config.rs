use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_dedupe_config::{Config, CredentialStore, PathManager};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output).await,
    }
}

async fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Configuration will be created automatically when you run 'keepbest login'.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {:#}", config_file.display(), e))?;

    let mut credentials = CredentialStore::new(path_manager.credentials_file());
    credentials
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {:#}", e))?;

    let secret = |value: Option<&String>| -> String {
        match value {
            Some(v) if full => v.clone(),
            Some(v) => mask_string(v),
            None => "<not set>".to_string(),
        }
    };

    match output.format() {
        crate::output::OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "Configuration".bright_cyan().bold());
            println!();

            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            table.set_header(vec![
                Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
            ]);

            table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
            match &config.server {
                Some(server) => {
                    table.add_row(vec![Cell::new("Server URL"), Cell::new(&server.url)]);
                    table.add_row(vec![Cell::new("Username"), Cell::new(&server.username)]);
                    table.add_row(vec![Cell::new("Client name"), Cell::new(&server.client_name)]);
                    table.add_row(vec![Cell::new("Device name"), Cell::new(&server.device_name)]);
                }
                None => {
                    table.add_row(vec![Cell::new("Server"), Cell::new("<not configured>")]);
                }
            }
            table.add_row(vec![
                Cell::new("Scan library"),
                Cell::new(config.scan.library_id.as_deref().unwrap_or("<all movie libraries>")),
            ]);
            table.add_row(vec![
                Cell::new("Default filter"),
                Cell::new(if config.scan.filter.is_empty() { "<none>" } else { config.scan.filter.as_str() }),
            ]);
            table.add_row(vec![Cell::new("Access token"), Cell::new(secret(credentials.get_access_token()))]);
            table.add_row(vec![Cell::new("User id"), Cell::new(secret(credentials.get_user_id()))]);
            table.add_row(vec![Cell::new("Device id"), Cell::new(secret(credentials.get_device_id()))]);

            println!("{}", table);
        }
        crate::output::OutputFormat::Json | crate::output::OutputFormat::JsonPretty => {
            let json = json!({
                "config_file": config_file.display().to_string(),
                "server": config.server,
                "scan": config.scan,
                "credentials": {
                    "access_token": secret(credentials.get_access_token()),
                    "user_id": secret(credentials.get_user_id()),
                    "device_id": secret(credentials.get_device_id()),
                },
            });
            output.json(&json);
        }
    }

    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}
