pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, ConfigError, ScanOptions, ServerConfig};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
