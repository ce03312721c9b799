use thiserror::Error;

/// Errors raised while talking to a catalog source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context}: server returned HTTP {status}")]
    Status { status: u16, context: String },

    #[error("Authentication failed: the server rejected the credentials or token")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not authenticated. Run 'keepbest login' first")]
    NotAuthenticated,

    #[error("Malformed server response: {0}")]
    Malformed(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SourceError {
    /// Errors that a fresh login would fix
    pub fn is_auth_error(&self) -> bool {
        matches!(self, SourceError::Unauthorized | SourceError::NotAuthenticated)
    }
}
