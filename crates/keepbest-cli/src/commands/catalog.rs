use super::scan_ui::ScanUI;
use clap::Args;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use media_dedupe_config::{Config, CredentialStore, PathManager};
use media_dedupe_core::DuplicateReport;
use media_dedupe_models::Library;
use media_dedupe_sources::{create_source, CatalogSource};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Options shared by `scan` and `delete`
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Only keep groups whose title contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    /// Library id or name; every movie library when omitted
    #[arg(long)]
    pub library: Option<String>,

    /// Read the catalog from a JSON snapshot instead of the server
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,
}

impl ScanArgs {
    /// Fill unset options from the `[scan]` section of the config
    ///
    /// The configured library id belongs to the server, so it is not applied
    /// to snapshot scans.
    pub fn with_defaults(mut self, config: &Config) -> Self {
        if self.filter.is_none() && !config.scan.filter.is_empty() {
            self.filter = Some(config.scan.filter.clone());
        }
        if self.library.is_none() && self.snapshot.is_none() {
            self.library = config.scan.library_id.clone();
        }
        self
    }

    pub fn filter(&self) -> &str {
        self.filter.as_deref().unwrap_or("")
    }
}

/// Duplicate report for a single library
pub struct LibraryReport {
    pub library: Library,
    pub report: DuplicateReport,
}

impl LibraryReport {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "library": self.library,
            "report": self.report,
        })
    }
}

pub fn load_settings(path_manager: &PathManager) -> Result<(Config, CredentialStore)> {
    let config_file = path_manager.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {:#}", config_file.display(), e))?;

    let mut credentials = CredentialStore::new(path_manager.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {:#}", e))?;

    Ok((config, credentials))
}

pub async fn open_source(
    config: &Config,
    credentials: &CredentialStore,
    snapshot: Option<&Path>,
) -> Result<Box<dyn CatalogSource>> {
    create_source(config, credentials, snapshot)
        .await
        .map_err(|e| eyre!("{:#}", e))
}

/// The requested library (by id or name), or every movie library
pub fn select_libraries(libraries: Vec<Library>, requested: Option<&str>) -> Result<Vec<Library>> {
    match requested {
        Some(wanted) => libraries
            .into_iter()
            .find(|l| l.id == wanted || l.name.eq_ignore_ascii_case(wanted))
            .map(|l| vec![l])
            .ok_or_else(|| {
                eyre!("Library '{}' not found. Run 'keepbest libraries' to list them", wanted)
            }),
        None => {
            let movies: Vec<Library> = libraries.into_iter().filter(Library::is_movies).collect();
            if movies.is_empty() {
                return Err(eyre!("No movie libraries found on the server"));
            }
            Ok(movies)
        }
    }
}

/// Fetch each library and build its report; libraries are never mixed
pub async fn scan_libraries(
    source: &dyn CatalogSource,
    args: &ScanArgs,
    show_progress: bool,
) -> Result<Vec<LibraryReport>> {
    let ui = ScanUI::new(show_progress);
    ui.set_message(format!("Listing libraries on {}...", source.source_name()));

    let libraries = source
        .get_libraries()
        .await
        .wrap_err("Failed to list libraries")?;
    let libraries = select_libraries(libraries, args.library.as_deref())?;

    let mut reports = Vec::with_capacity(libraries.len());
    for library in libraries {
        ui.set_message(format!("Fetching movies from {}...", library.name));
        let entries = source
            .get_movies(&library.id)
            .await
            .wrap_err_with(|| format!("Failed to fetch movies from library '{}'", library.name))?;

        let report = DuplicateReport::build(&entries, args.filter());
        reports.push(LibraryReport { library, report });
    }
    ui.finish();

    Ok(reports)
}
