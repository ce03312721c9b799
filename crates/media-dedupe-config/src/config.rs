use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub scan: ScanOptions,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub url: String,
    pub username: String,
    #[serde(default = "default_client_name")]
    pub client_name: String,
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ScanOptions {
    /// Restrict scans to one library; all movie libraries when unset
    #[serde(default)]
    pub library_id: Option<String>,
    /// Default title filter for scan and delete
    #[serde(default)]
    pub filter: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Server is not configured. Run 'keepbest login' first")]
    ServerMissing,
    #[error("Server URL must start with http:// or https://: {0}")]
    InvalidUrl(String),
    #[error("Server username cannot be empty")]
    EmptyUsername,
}

fn default_client_name() -> String {
    "keepbest".to_string()
}

fn default_device_name() -> String {
    "keepbest-cli".to_string()
}

impl ServerConfig {
    pub fn new(url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            client_name: default_client_name(),
            device_name: default_device_name(),
        }
    }

    /// Server URL without trailing slashes
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or an empty config if it does not exist yet
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let server = self.server.as_ref().ok_or(ConfigError::ServerMissing)?;

        if !(server.url.starts_with("http://") || server.url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(server.url.clone()).into());
        }
        if server.username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername.into());
        }

        Ok(())
    }

    pub fn is_server_configured(&self) -> bool {
        self.validate().is_ok()
    }
}
