//! Generative AI provider interface
//!
//! The relay only needs four things from a provider: ingest a file, report its
//! processing state, delete it, and stream text for a conversation.

pub mod gemini;
pub mod processing;

#[cfg(test)]
pub mod scripted;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::{FileState, Turn};

pub use gemini::GeminiProvider;
pub use processing::{PollPolicy, wait_until_active};

/// Errors raised by a provider adapter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("Provider request failed: {0}")]
    Network(String),

    /// Non-OK answer; `message` is the provider's own text
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("File processing timed out after {attempts} attempts")]
    ProcessingTimeout { attempts: u32 },

    #[error("File processing failed: {0}")]
    ProcessingFailed(String),
}

/// Provider-side view of an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFile {
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub display_name: String,
    /// Sent as a decimal string by the Gemini API
    #[serde(default)]
    pub size_bytes: Option<String>,
    #[serde(default)]
    pub state: FileState,
}

/// File bytes handed to the provider's ingestion API
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub display_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// One part of the live user turn
#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    Text(String),
    InlineData { mime_type: String, data: Vec<u8> },
    FileData { uri: String, mime_type: Option<String> },
}

/// Prior turns plus the new user turn
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub history: Vec<Turn>,
    pub parts: Vec<PromptPart>,
    pub temperature: f32,
}

/// Text deltas in arrival order. An `Err` item ends the stream.
pub type TextStream = BoxStream<'static, Result<String, ProviderError>>;

#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Model used for generation
    fn model(&self) -> &str;

    async fn upload_file(&self, upload: FileUpload) -> Result<ProviderFile, ProviderError>;

    async fn get_file(&self, name: &str) -> Result<ProviderFile, ProviderError>;

    async fn delete_file(&self, name: &str) -> Result<(), ProviderError>;

    /// Start generation. Errors before the first byte come back as `Err`;
    /// later failures arrive as an `Err` item on the stream.
    async fn stream_generate(&self, request: GenerationRequest) -> Result<TextStream, ProviderError>;
}
