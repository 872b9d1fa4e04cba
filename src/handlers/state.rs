//! Shared state of the relay handlers, passed via `Extension`

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::domain::models::MAX_UPLOAD_SIZE;
use crate::infrastructure::provider::{GeminiProvider, GenerativeProvider, PollPolicy, ProviderError};
use crate::infrastructure::storage::{FileStore, InMemoryFileStore};

#[derive(Clone)]
pub struct RelayState {
    pub provider: Arc<dyn GenerativeProvider>,
    pub files: Arc<dyn FileStore>,
    pub poll: PollPolicy,
    pub max_upload_bytes: usize,
}

impl RelayState {
    pub fn new(provider: Arc<dyn GenerativeProvider>, files: Arc<dyn FileStore>) -> Self {
        Self {
            provider,
            files,
            poll: PollPolicy::default(),
            max_upload_bytes: MAX_UPLOAD_SIZE,
        }
    }

    /// Gemini provider and an in-memory store, tuned from `config`
    pub fn from_config(config: &RelayConfig) -> Result<Self, ProviderError> {
        let provider = GeminiProvider::new(&config.api_key, &config.model, &config.base_url)?;
        tracing::info!("Relay using model {} at {}", config.model, config.base_url);

        Ok(Self::new(Arc::new(provider), Arc::new(InMemoryFileStore::new()))
            .with_poll_policy(config.poll_policy())
            .with_max_upload_bytes(config.max_upload_bytes))
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
