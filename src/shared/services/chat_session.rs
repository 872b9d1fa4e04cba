//! Browser-side conversation state and the submit flow

use crate::domain::models::{
    GenerateRequest, MAX_UPLOAD_SIZE, PendingFile, StreamFrame, Turn, UploadedFile,
};
use crate::shared::errors::{ClientError, Result};
use crate::shared::utils::generate_session_id;

use super::transport::{ChatTransport, MultimodalRequest};

/// How a pending file reaches the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentMode {
    /// Upload through `/upload-file` first, then reference it by URI
    #[default]
    Upload,
    /// Send the bytes along with the prompt to `/generate-multimodal`
    Inline,
}

#[derive(Debug, PartialEq)]
enum StreamState {
    Open,
    Done,
    Failed(String),
}

pub struct ChatSession<T: ChatTransport> {
    transport: T,
    session_id: String,
    mode: AttachmentMode,
    history: Vec<Turn>,
    pending_file: Option<PendingFile>,
    uploaded_files: Vec<UploadedFile>,
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session_id: generate_session_id(),
            mode: AttachmentMode::default(),
            history: Vec::new(),
            pending_file: None,
            uploaded_files: Vec::new(),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn with_mode(mut self, mode: AttachmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn mode(&self) -> AttachmentMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AttachmentMode) {
        self.mode = mode;
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn pending_file(&self) -> Option<&PendingFile> {
        self.pending_file.as_ref()
    }

    pub fn uploaded_files(&self) -> &[UploadedFile] {
        &self.uploaded_files
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replace the pending file. Only one file can wait for the next submit.
    pub fn select_file(&mut self, file: PendingFile) -> Result<()> {
        if file.size() > MAX_UPLOAD_SIZE {
            return Err(ClientError::InvalidFile(format!(
                "{} is larger than {} MB",
                file.name,
                MAX_UPLOAD_SIZE / 1024 / 1024
            )));
        }
        self.pending_file = Some(file);
        Ok(())
    }

    pub fn remove_file(&mut self) -> Option<PendingFile> {
        self.pending_file.take()
    }

    /// Forget the conversation. The session id and uploaded files survive.
    pub fn clear(&mut self) {
        self.history.clear();
        self.pending_file = None;
    }

    /// Send one prompt and stream the reply.
    ///
    /// `on_text` receives the whole reply accumulated so far after every
    /// delta. On any failure the optimistic user turn is removed again, so the
    /// history is exactly as long as before the call.
    pub async fn submit(
        &mut self,
        prompt: &str,
        temperature: f32,
        on_text: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ClientError::EmptyPrompt);
        }

        let prior_len = self.history.len();
        self.history.push(Turn::user(prompt));
        let pending = self.pending_file.take();

        match self.exchange(prompt, temperature, pending, prior_len, on_text).await {
            Ok(reply) => {
                self.history.push(Turn::model(reply.clone()));
                Ok(reply)
            }
            Err(error) => {
                tracing::warn!("Rolling back turn after failure: {}", error);
                self.history.truncate(prior_len);
                Err(error)
            }
        }
    }

    async fn exchange(
        &mut self,
        prompt: &str,
        temperature: f32,
        pending: Option<PendingFile>,
        prior_len: usize,
        on_text: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let history = self.history[..prior_len].to_vec();
        let mut reply = String::new();
        let mut state = StreamState::Open;

        let mut on_frame = |frame: StreamFrame| {
            if state != StreamState::Open {
                return;
            }
            match frame {
                StreamFrame::Text(delta) => {
                    reply.push_str(&delta);
                    on_text(&reply);
                }
                StreamFrame::Error(message) => state = StreamState::Failed(message),
                StreamFrame::Done => state = StreamState::Done,
            }
        };

        match (pending, self.mode) {
            (Some(file), AttachmentMode::Inline) => {
                let request = MultimodalRequest {
                    prompt,
                    temperature,
                    history: &history,
                    file: &file,
                };
                self.transport.generate_multimodal(request, &mut on_frame).await?;
            }
            (pending, _) => {
                let mut file_uris = Vec::new();
                if let Some(file) = pending {
                    let uploaded = self.transport.upload_file(&self.session_id, &file).await?;
                    file_uris.push(uploaded.uri.clone());
                    self.uploaded_files.push(uploaded);
                }
                let request = GenerateRequest::new(prompt)
                    .with_temperature(temperature)
                    .with_history(history)
                    .with_file_uris(file_uris)
                    .with_session_id(self.session_id.clone());
                self.transport.generate(&request, &mut on_frame).await?;
            }
        }

        match state {
            StreamState::Done => Ok(reply),
            StreamState::Failed(message) => Err(ClientError::Stream(message)),
            StreamState::Open => Err(ClientError::Truncated),
        }
    }

    /// Files the relay holds for this session
    pub async fn list_files(&mut self) -> Result<Vec<UploadedFile>> {
        let files = self.transport.list_files(&self.session_id).await?;
        self.uploaded_files = files.clone();
        Ok(files)
    }

    pub async fn delete_file(&mut self, file_name: &str) -> Result<()> {
        self.transport.delete_file(&self.session_id, file_name).await?;
        self.uploaded_files.retain(|file| file.name != file_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Role;
    use chrono::Utc;
    use std::cell::RefCell;

    /// Scripted relay: replays `frames` or fails with `status`
    #[derive(Default)]
    struct MockTransport {
        pub frames: Vec<StreamFrame>,
        pub status: Option<u16>,
        pub generated: RefCell<Vec<GenerateRequest>>,
        pub multimodal: RefCell<Vec<String>>,
        pub uploads: RefCell<Vec<String>>,
    }

    impl MockTransport {
        fn replying(frames: Vec<StreamFrame>) -> Self {
            Self {
                frames,
                ..Default::default()
            }
        }

        fn replay(&self, on_frame: &mut dyn FnMut(StreamFrame)) -> Result<()> {
            if let Some(status) = self.status {
                return Err(ClientError::from_status(status, r#"{"error":"upstream failed"}"#));
            }
            self.frames.iter().cloned().for_each(on_frame);
            Ok(())
        }
    }

    impl ChatTransport for MockTransport {
        async fn upload_file(&self, _session_id: &str, file: &PendingFile) -> Result<UploadedFile> {
            self.uploads.borrow_mut().push(file.name.clone());
            Ok(UploadedFile {
                name: "files/abc".to_string(),
                uri: "https://files.test/files/abc".to_string(),
                mime_type: file.mime_type.clone(),
                display_name: file.name.clone(),
                size: file.size(),
                uploaded_at: Utc::now(),
            })
        }

        async fn generate(
            &self,
            request: &GenerateRequest,
            on_frame: &mut dyn FnMut(StreamFrame),
        ) -> Result<()> {
            self.generated.borrow_mut().push(request.clone());
            self.replay(on_frame)
        }

        async fn generate_multimodal(
            &self,
            request: MultimodalRequest<'_>,
            on_frame: &mut dyn FnMut(StreamFrame),
        ) -> Result<()> {
            self.multimodal.borrow_mut().push(request.file.name.clone());
            self.replay(on_frame)
        }

        async fn list_files(&self, _session_id: &str) -> Result<Vec<UploadedFile>> {
            Ok(Vec::new())
        }

        async fn delete_file(&self, _session_id: &str, _file_name: &str) -> Result<()> {
            Ok(())
        }
    }

    fn hello_frames() -> Vec<StreamFrame> {
        vec![
            StreamFrame::Text("Hel".into()),
            StreamFrame::Text("lo".into()),
            StreamFrame::Done,
        ]
    }

    #[tokio::test]
    async fn test_submit_streams_and_records_turns() {
        let mut session = ChatSession::new(MockTransport::replying(hello_frames()));
        let mut seen = Vec::new();
        let reply = session
            .submit("  hi  ", 0.5, &mut |text| seen.push(text.to_string()))
            .await
            .unwrap();

        assert_eq!(reply, "Hello");
        assert_eq!(seen, vec!["Hel".to_string(), "Hello".to_string()]);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0], Turn::user("hi"));
        assert_eq!(session.history()[1].role, Role::Model);

        let sent = session.transport().generated.borrow();
        assert!(sent[0].history.is_empty());
        assert_eq!(sent[0].session_id.as_deref(), Some(session.session_id()));
    }

    #[tokio::test]
    async fn test_history_excludes_current_turn() {
        let mut session = ChatSession::new(MockTransport::replying(hello_frames()));
        session.submit("one", 0.9, &mut |_| {}).await.unwrap();
        session.submit("two", 0.9, &mut |_| {}).await.unwrap();

        let sent = session.transport().generated.borrow();
        assert_eq!(sent[1].prompt, "two");
        assert_eq!(sent[1].history, vec![Turn::user("one"), Turn::model("Hello")]);
    }

    #[tokio::test]
    async fn test_non_ok_status_rolls_back() {
        let transport = MockTransport {
            status: Some(500),
            ..Default::default()
        };
        let mut session = ChatSession::new(transport);
        let error = session.submit("hi", 0.9, &mut |_| {}).await.unwrap_err();

        assert_eq!(error.to_string(), "upstream failed");
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_error_frame_rolls_back() {
        let frames = vec![
            StreamFrame::Text("partial".into()),
            StreamFrame::Error("quota".into()),
            StreamFrame::Done,
        ];
        let mut session = ChatSession::new(MockTransport::replying(frames));
        session.submit("first", 0.9, &mut |_| {}).await.unwrap_err();
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_missing_terminator_rolls_back() {
        let frames = vec![StreamFrame::Text("cut".into())];
        let mut session = ChatSession::new(MockTransport::replying(frames));
        let error = session.submit("hi", 0.9, &mut |_| {}).await.unwrap_err();
        assert_eq!(error, ClientError::Truncated);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_locally() {
        let mut session = ChatSession::new(MockTransport::replying(hello_frames()));
        let error = session.submit("   ", 0.9, &mut |_| {}).await.unwrap_err();
        assert_eq!(error, ClientError::EmptyPrompt);
        assert!(session.transport().generated.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_upload_mode_sends_file_uri() {
        let mut session =
            ChatSession::new(MockTransport::replying(hello_frames())).with_session_id("s1");
        session
            .select_file(PendingFile::new("cat.png", "image/png", vec![0; 16]))
            .unwrap();
        session.submit("describe", 0.9, &mut |_| {}).await.unwrap();

        assert!(session.pending_file().is_none());
        assert_eq!(session.uploaded_files().len(), 1);
        assert_eq!(session.transport().uploads.borrow().as_slice(), ["cat.png".to_string()]);
        let sent = session.transport().generated.borrow();
        assert_eq!(sent[0].file_uris, vec!["https://files.test/files/abc".to_string()]);
    }

    #[tokio::test]
    async fn test_inline_mode_uses_multimodal_route() {
        let mut session = ChatSession::new(MockTransport::replying(hello_frames()))
            .with_mode(AttachmentMode::Inline);
        session
            .select_file(PendingFile::new("notes.pdf", "", vec![1, 2, 3]))
            .unwrap();
        session.submit("summarize", 0.9, &mut |_| {}).await.unwrap();

        assert!(session.transport().uploads.borrow().is_empty());
        assert!(session.transport().generated.borrow().is_empty());
        assert_eq!(session.transport().multimodal.borrow().as_slice(), ["notes.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_file_forgets_record() {
        let mut session = ChatSession::new(MockTransport::replying(hello_frames()));
        session
            .select_file(PendingFile::new("a.txt", "", b"hello".to_vec()))
            .unwrap();
        session.submit("read", 0.9, &mut |_| {}).await.unwrap();
        assert_eq!(session.uploaded_files().len(), 1);

        session.delete_file("files/abc").await.unwrap();
        assert!(session.uploaded_files().is_empty());
    }

    #[test]
    fn test_select_file_rejects_oversized() {
        let mut session = ChatSession::new(MockTransport::default());
        let error = session
            .select_file(PendingFile::new("big.bin", "", vec![0; MAX_UPLOAD_SIZE + 1]))
            .unwrap_err();
        assert!(matches!(error, ClientError::InvalidFile(_)));
        assert!(session.pending_file().is_none());
    }

    #[test]
    fn test_clear_keeps_session_id() {
        let mut session = ChatSession::new(MockTransport::default()).with_session_id("keep");
        session
            .select_file(PendingFile::new("a.txt", "", vec![1]))
            .unwrap();
        session.clear();
        assert!(session.pending_file().is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.session_id(), "keep");
    }
}
