use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("Method {0} is not allowed")]
    MethodNotAllowed(String),

    #[error("Server configuration error: {0}")]
    Configuration(String),

    #[error("Upstream API error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse upstream response: {0}")]
    InvalidResponse(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl RelayError {
    /// HTTP status reported to the caller for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::Validation(_) => 400,
            RelayError::MethodNotAllowed(_) => 405,
            RelayError::Configuration(_)
            | RelayError::Upstream { .. }
            | RelayError::InvalidResponse(_)
            | RelayError::Http(_)
            | RelayError::Unknown(_) => 500,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        RelayError::Http(error.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(error: serde_json::Error) -> Self {
        RelayError::InvalidResponse(error.to_string())
    }
}

impl From<anyhow::Error> for RelayError {
    fn from(error: anyhow::Error) -> Self {
        RelayError::Unknown(error.to_string())
    }
}
