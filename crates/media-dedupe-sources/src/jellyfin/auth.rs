use serde::{Deserialize, Serialize};

/// How this client presents itself to the server
///
/// The device id is supplied by the caller. Generating it and keeping it
/// stable across runs is the host application's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub client_name: String,
    pub device_name: String,
    pub device_id: String,
    pub version: String,
}

impl ClientIdentity {
    pub fn new(
        client_name: impl Into<String>,
        device_name: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            device_name: device_name.into(),
            device_id: device_id.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Value of the `Authorization` header, with the token once logged in
    ///
    /// Values are percent-encoded so commas and quotes in device names
    /// cannot break the header format.
    pub fn authorization_header(&self, token: Option<&str>) -> String {
        let mut header = format!(
            "MediaBrowser Client=\"{}\", Device=\"{}\", DeviceId=\"{}\", Version=\"{}\"",
            urlencoding::encode(&self.client_name),
            urlencoding::encode(&self.device_name),
            urlencoding::encode(&self.device_id),
            urlencoding::encode(&self.version),
        );
        if let Some(token) = token {
            header.push_str(&format!(", Token=\"{}\"", urlencoding::encode(token)));
        }
        header
    }
}

/// An authenticated user session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user_id: String,
}
