//! In-process provider with scripted answers, for tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;

use super::{
    FileUpload, GenerationRequest, GenerativeProvider, ProviderError, ProviderFile, TextStream,
};
use crate::domain::models::FileState;

pub struct ScriptedProvider {
    chunks: Vec<String>,
    start_error: Option<ProviderError>,
    stream_error: Option<String>,
    delete_error: Option<ProviderError>,
    upload_state: FileState,
    poll_states: Vec<FileState>,
    polls: AtomicUsize,
    uploads: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
    deleted: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            chunks: vec!["Hello".to_string(), ", world".to_string()],
            start_error: None,
            stream_error: None,
            delete_error: None,
            upload_state: FileState::Active,
            poll_states: Vec::new(),
            polls: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn file(name: &str, state: FileState) -> ProviderFile {
        ProviderFile {
            name: name.to_string(),
            uri: format!("https://generativelanguage.test/v1beta/{}", name),
            mime_type: "application/octet-stream".to_string(),
            display_name: name.to_string(),
            size_bytes: None,
            state,
        }
    }

    pub fn with_chunks(mut self, chunks: &[&str]) -> Self {
        self.chunks = chunks.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_start_error(mut self, error: ProviderError) -> Self {
        self.start_error = Some(error);
        self
    }

    pub fn with_stream_error(mut self, message: &str) -> Self {
        self.stream_error = Some(message.to_string());
        self
    }

    pub fn with_delete_error(mut self, error: ProviderError) -> Self {
        self.delete_error = Some(error);
        self
    }

    /// State reported right after upload; `Processing` triggers polling
    pub fn with_upload_state(mut self, state: FileState) -> Self {
        self.upload_state = state;
        self
    }

    /// States returned by successive status checks, the last one repeating
    pub fn with_poll_states(mut self, states: Vec<FileState>) -> Self {
        self.poll_states = states;
        self
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedProvider {
    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<ProviderFile, ProviderError> {
        let index = self.uploads.fetch_add(1, Ordering::SeqCst);
        let mut file = Self::file(&format!("files/file-{}", index), self.upload_state);
        file.mime_type = upload.mime_type;
        file.display_name = upload.display_name;
        file.size_bytes = Some(upload.bytes.len().to_string());
        Ok(file)
    }

    async fn get_file(&self, name: &str) -> Result<ProviderFile, ProviderError> {
        let index = self.polls.fetch_add(1, Ordering::SeqCst);
        let state = self
            .poll_states
            .get(index)
            .or(self.poll_states.last())
            .copied()
            .unwrap_or(FileState::Active);
        Ok(Self::file(name, state))
    }

    async fn delete_file(&self, name: &str) -> Result<(), ProviderError> {
        self.deleted.lock().unwrap().push(name.to_string());
        match &self.delete_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn stream_generate(&self, request: GenerationRequest) -> Result<TextStream, ProviderError> {
        self.requests.lock().unwrap().push(request);
        if let Some(error) = &self.start_error {
            return Err(error.clone());
        }

        let mut items: Vec<Result<String, ProviderError>> =
            self.chunks.iter().cloned().map(Ok).collect();
        if let Some(message) = &self.stream_error {
            items.push(Err(ProviderError::Network(message.clone())));
        }
        Ok(stream::iter(items).boxed())
    }
}
