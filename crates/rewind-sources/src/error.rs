use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// No usable session; raised before any request is sent
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("{context} was rejected with status {status} (check your login)")]
    Unauthorized { context: String, status: u16 },

    #[error("{context} failed with status {status}")]
    Status { context: String, status: u16 },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    pub fn from_status(context: impl Into<String>, status: reqwest::StatusCode) -> Self {
        let context = context.into();
        match status.as_u16() {
            401 | 403 => SourceError::Unauthorized { context, status: status.as_u16() },
            404 => SourceError::NotFound(context),
            code => SourceError::Status { context, status: code },
        }
    }

    pub fn decode(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SourceError::Decode {
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, SourceError::Unauthenticated(_) | SourceError::Unauthorized { .. })
    }
}
