use thiserror::Error;

/// Failures seen by the browser-side chat session
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    #[error("Please enter a prompt")]
    EmptyPrompt,

    #[error("Network error: {0}")]
    Network(String),

    /// Non-OK response; carries the relay's `error` message when it sent one
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Stream(String),

    #[error("Stream ended before completion")]
    Truncated,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),
}

impl ClientError {
    /// Build a status error from a response body, preferring its `error` field
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<crate::domain::models::ErrorBody>(body)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("Request failed with status {}", status));
        ClientError::Status { status, message }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
