use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner shown while catalogs are fetched; structured log lines when not
/// attached to a terminal
pub struct ScanUI {
    spinner: Option<ProgressBar>,
}

impl ScanUI {
    pub fn new(enabled: bool) -> Self {
        let spinner = (enabled && is_interactive()).then(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
            {
                spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
            }
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        });

        if spinner.is_none() {
            tracing::debug!(
                operation = "ui_init",
                mode = "non_interactive",
                "Progress spinner disabled"
            );
        }

        Self { spinner }
    }

    pub fn set_message(&self, msg: String) {
        match &self.spinner {
            Some(spinner) => spinner.set_message(msg),
            None => tracing::info!(operation = "progress", message = %msg, "Progress update"),
        }
    }

    pub fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }
}

impl Drop for ScanUI {
    fn drop(&mut self) {
        self.finish();
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
