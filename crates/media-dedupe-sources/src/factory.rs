//! Catalog source construction from configuration
//!
//! The CLI asks for a source and gets either the configured server or a
//! snapshot file.

use anyhow::{Context, Result};
use media_dedupe_config::{Config, CredentialStore, ServerConfig};
use std::path::Path;

use crate::jellyfin::{AuthSession, ClientIdentity, JellyfinClient};
use crate::snapshot::SnapshotSource;
use crate::CatalogSource;

/// Identity for the configured server, using the device id the host stored
pub fn client_identity(server: &ServerConfig, credentials: &CredentialStore) -> Result<ClientIdentity> {
    let device_id = credentials
        .get_device_id()
        .ok_or_else(|| anyhow::anyhow!("No device id stored. Run 'keepbest login' first"))?;

    Ok(ClientIdentity::new(
        server.client_name.clone(),
        server.device_name.clone(),
        device_id.clone(),
    ))
}

/// Stored session, if both token and user id are present
pub fn stored_session(credentials: &CredentialStore) -> Option<AuthSession> {
    Some(AuthSession {
        access_token: credentials.get_access_token()?.clone(),
        user_id: credentials.get_user_id()?.clone(),
    })
}

/// Jellyfin client carrying the stored session, not yet verified
pub fn session_client(server: &ServerConfig, credentials: &CredentialStore) -> Result<JellyfinClient> {
    let identity = client_identity(server, credentials)?;
    let session = stored_session(credentials)
        .ok_or_else(|| anyhow::anyhow!("No stored session. Run 'keepbest login' first"))?;

    Ok(JellyfinClient::with_session(server.base_url(), identity, session)?)
}

/// Build an authenticated Jellyfin client from config and stored credentials
pub async fn create_server_source(
    config: &Config,
    credentials: &CredentialStore,
) -> Result<JellyfinClient> {
    config.validate()?;
    let server = config
        .server
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Server is not configured"))?;

    let mut client = session_client(server, credentials)?;
    client
        .authenticate()
        .await
        .with_context(|| format!("Failed to authenticate to {}", server.url))?;
    Ok(client)
}

/// The snapshot file when given, otherwise the configured server
pub async fn create_source(
    config: &Config,
    credentials: &CredentialStore,
    snapshot: Option<&Path>,
) -> Result<Box<dyn CatalogSource>> {
    if let Some(path) = snapshot {
        let source = SnapshotSource::open(path)
            .await
            .with_context(|| format!("Failed to open catalog snapshot {}", path.display()))?;
        return Ok(Box::new(source));
    }

    Ok(Box::new(create_server_source(config, credentials).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_with(device: Option<&str>, token: Option<&str>, user: Option<&str>) -> CredentialStore {
        let dir = tempdir().unwrap();
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        if let Some(device) = device {
            store.set_device_id(device.to_string());
        }
        if let Some(token) = token {
            store.set_access_token(token.to_string());
        }
        if let Some(user) = user {
            store.set_user_id(user.to_string());
        }
        store
    }

    #[test]
    fn test_client_identity_requires_device_id() {
        let server = ServerConfig::new("http://jellyfin.local", "admin");
        assert!(client_identity(&server, &store_with(None, None, None)).is_err());

        let identity = client_identity(&server, &store_with(Some("dev-9"), None, None)).unwrap();
        assert_eq!(identity.device_id, "dev-9");
        assert_eq!(identity.client_name, "keepbest");
    }

    #[test]
    fn test_stored_session_needs_token_and_user() {
        assert!(stored_session(&store_with(None, Some("t"), None)).is_none());
        assert!(stored_session(&store_with(None, None, Some("u"))).is_none());

        let session = stored_session(&store_with(None, Some("t"), Some("u"))).unwrap();
        assert_eq!(session.access_token, "t");
        assert_eq!(session.user_id, "u");
    }

    #[test]
    fn test_session_client_uses_base_url() {
        let server = ServerConfig::new("http://jellyfin.local:8096/", "admin");
        let client = session_client(&server, &store_with(Some("d"), Some("t"), Some("u"))).unwrap();
        assert_eq!(client.server_url(), "http://jellyfin.local:8096");
        assert_eq!(client.session().map(|s| s.user_id.as_str()), Some("u"));

        assert!(session_client(&server, &store_with(Some("d"), None, None)).is_err());
    }

    #[tokio::test]
    async fn test_create_source_prefers_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "[]").unwrap();

        let source = create_source(&Config::default(), &store_with(None, None, None), Some(&path))
            .await
            .unwrap();
        assert_eq!(source.source_name(), "Snapshot");
    }

    #[tokio::test]
    async fn test_create_server_source_requires_config() {
        let result = create_server_source(&Config::default(), &store_with(Some("d"), Some("t"), Some("u"))).await;
        assert!(result.is_err());
    }
}
