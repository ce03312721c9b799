use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const ACCESS_TOKEN: &str = "access_token";
const USER_ID: &str = "user_id";
const DEVICE_ID: &str = "device_id";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_all_keys(&self) -> Vec<String> {
        self.credentials.keys().cloned().collect()
    }

    pub fn get_access_token(&self) -> Option<&String> {
        self.get(ACCESS_TOKEN)
    }

    pub fn set_access_token(&mut self, token: String) {
        self.set(ACCESS_TOKEN.to_string(), token);
    }

    pub fn get_user_id(&self) -> Option<&String> {
        self.get(USER_ID)
    }

    pub fn set_user_id(&mut self, user_id: String) {
        self.set(USER_ID.to_string(), user_id);
    }

    pub fn get_device_id(&self) -> Option<&String> {
        self.get(DEVICE_ID)
    }

    pub fn set_device_id(&mut self, device_id: String) {
        self.set(DEVICE_ID.to_string(), device_id);
    }

    /// Drop the session but keep the device id, so the server keeps seeing
    /// the same device on the next login
    pub fn clear_session(&mut self) {
        self.remove(ACCESS_TOKEN);
        self.remove(USER_ID);
    }
}
