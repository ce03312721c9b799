use super::prompts;
use crate::output::Output;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use media_dedupe_config::{Config, CredentialStore, PathManager, ServerConfig};
use media_dedupe_sources::{ClientIdentity, JellyfinClient};
use serde_json::json;

/// Device id stored with the credentials, generated on first use
pub fn ensure_device_id(credentials: &mut CredentialStore) -> String {
    if let Some(existing) = credentials.get_device_id().filter(|id| !id.is_empty()) {
        return existing.clone();
    }

    let device_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(device_id = %device_id, "generated new device id");
    credentials.set_device_id(device_id.clone());
    device_id
}

/// Merge the URL and username into the existing server section, keeping
/// client and device names
pub fn merge_server(existing: Option<ServerConfig>, url: String, username: String) -> ServerConfig {
    match existing {
        Some(mut server) => {
            server.url = url;
            server.username = username;
            server
        }
        None => ServerConfig::new(url, username),
    }
}

pub async fn run_login(url_arg: Option<String>, username_arg: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create {}: {:#}", path_manager.config_dir().display(), e))?;

    let config_file = path_manager.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {:#}", config_file.display(), e))?;
    let existing = config.server.clone();

    let url = match url_arg {
        Some(url) => url,
        None => prompts::prompt_string(
            "Jellyfin server URL",
            existing.as_ref().map(|s| s.url.as_str()),
        )?,
    };
    let username = match username_arg {
        Some(username) => username,
        None => prompts::prompt_string(
            "Username",
            existing.as_ref().map(|s| s.username.as_str()),
        )?,
    };

    config.server = Some(merge_server(existing, url.trim().to_string(), username.trim().to_string()));
    config.validate().map_err(|e| eyre!("{:#}", e))?;
    let server = config
        .server
        .clone()
        .ok_or_else(|| eyre!("Server is not configured"))?;

    let mut credentials = CredentialStore::new(path_manager.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {:#}", e))?;
    let device_id = ensure_device_id(&mut credentials);

    let password = prompts::prompt_password(&format!("Password for {}", server.username))?;

    let identity = ClientIdentity::new(server.client_name.clone(), server.device_name.clone(), device_id);
    let mut client = JellyfinClient::new(server.base_url(), identity)
        .wrap_err("Failed to create Jellyfin client")?;
    let session = client
        .login(&server.username, &password)
        .await
        .wrap_err_with(|| format!("Login to {} failed", server.url))?;

    credentials.set_access_token(session.access_token.clone());
    credentials.set_user_id(session.user_id.clone());
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {:#}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {:#}", config_file.display(), e))?;

    if output.is_human() {
        output.success(format!("Logged in to {} as {}", server.url, server.username));
        output.info(format!("Configuration saved to {}", config_file.display()));
    } else {
        output.json(&json!({
            "type": "success",
            "server": server.url,
            "username": server.username,
            "user_id": session.user_id,
        }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn empty_store() -> CredentialStore {
        CredentialStore::new(PathBuf::from("/nonexistent/credentials.toml"))
    }

    #[test]
    fn test_ensure_device_id_generates_once() {
        let mut store = empty_store();
        let first = ensure_device_id(&mut store);
        assert!(uuid::Uuid::parse_str(&first).is_ok());
        assert_eq!(ensure_device_id(&mut store), first);
        assert_eq!(store.get_device_id(), Some(&first));
    }

    #[test]
    fn test_ensure_device_id_keeps_stored_value() {
        let mut store = empty_store();
        store.set_device_id("device-from-disk".to_string());
        assert_eq!(ensure_device_id(&mut store), "device-from-disk");
    }

    #[test]
    fn test_merge_server_keeps_names() {
        let mut existing = ServerConfig::new("http://old:8096", "old");
        existing.device_name = "living-room".to_string();

        let merged = merge_server(Some(existing), "http://new:8096".to_string(), "admin".to_string());
        assert_eq!(merged.url, "http://new:8096");
        assert_eq!(merged.username, "admin");
        assert_eq!(merged.device_name, "living-room");

        let fresh = merge_server(None, "http://new:8096".to_string(), "admin".to_string());
        assert_eq!(fresh.client_name, "keepbest");
    }
}
