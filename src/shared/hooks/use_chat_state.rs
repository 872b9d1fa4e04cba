//! Chat page state: the session client plus the signals the view renders
//!
//! The [`ChatSession`] owns history and the pending file; signals mirror what
//! the components need to show. Only one submit runs at a time.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

use crate::domain::models::{DEFAULT_TEMPERATURE, PendingFile};
use crate::shared::hooks::use_toast::{ToastState, use_toast};
use crate::shared::services::{AttachmentMode, ChatSession, FetchTransport};
use crate::shared::state::{Attachment, Transcript};

#[derive(Clone)]
pub struct ChatState {
    pub session: Rc<RefCell<ChatSession<FetchTransport>>>,
    pub transcript: Signal<Transcript>,
    pub input: Signal<String>,
    pub temperature: Signal<f32>,
    pub mode: Signal<AttachmentMode>,
    pub pending: Signal<Option<Attachment>>,
    pub is_loading: Signal<bool>,
    pub toast: ToastState,
}

impl ChatState {
    /// Hold `file` for the next submit, replacing any earlier one
    pub fn select_file(&mut self, file: PendingFile) {
        let preview = Attachment::from_pending(&file);
        let name = file.name.clone();
        let Ok(mut session) = self.session.try_borrow_mut() else {
            self.toast.error("Please wait for the current reply");
            return;
        };
        match session.select_file(file) {
            Ok(()) => {
                self.pending.set(Some(preview));
                self.toast.info(format!("Attached {}", name));
            }
            Err(e) => self.toast.error(e.to_string()),
        }
    }

    pub fn remove_file(&mut self) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.remove_file();
            self.pending.set(None);
        }
    }

    pub fn set_mode(&mut self, mode: AttachmentMode) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.set_mode(mode);
            self.mode.set(mode);
        }
    }

    /// Forget history and the pending file; the session id survives
    pub fn clear(&mut self) {
        let Ok(mut session) = self.session.try_borrow_mut() else {
            self.toast.error("Please wait for the current reply");
            return;
        };
        session.clear();
        self.transcript.write().clear();
        self.pending.set(None);
        self.toast.info("Chat cleared");
    }

    /// Send the current input, streaming the reply into the transcript
    pub async fn submit(mut self) {
        if *self.is_loading.read() {
            return;
        }
        let prompt = self.input.read().trim().to_string();
        if prompt.is_empty() {
            self.toast.error("Please enter a prompt");
            return;
        }
        let Ok(mut session) = self.session.try_borrow_mut() else {
            self.toast.error("Please wait for the current reply");
            return;
        };

        let attachment = session.pending_file().map(Attachment::from_pending);
        let temperature = *self.temperature.read();
        let mut transcript = self.transcript;
        transcript.write().push_user(prompt.clone(), attachment);
        let reply_id = transcript.write().begin_stream();

        self.input.set(String::new());
        self.pending.set(None);
        self.is_loading.set(true);

        let result = session
            .submit(&prompt, temperature, &mut |text| {
                transcript.write().update_stream(reply_id, text);
            })
            .await;

        match result {
            Ok(_) => transcript.write().finish_stream(reply_id),
            Err(e) => {
                tracing::warn!("submit failed: {}", e);
                transcript.write().fail_stream(reply_id, &e.to_string());
                self.toast.error(e.to_string());
            }
        }
        self.is_loading.set(false);
    }

    /// Put the markdown of entry `id` on the clipboard
    pub async fn copy(mut self, id: usize) {
        let Some(text) = self.transcript.read().copy_text(id) else {
            return;
        };
        match write_clipboard(&text).await {
            Ok(()) => self.toast.info("Copied to clipboard"),
            Err(e) => self.toast.error(format!("Copy failed: {}", e)),
        }
    }
}

async fn write_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window")?;
    let promise = window.navigator().clipboard().write_text(text);
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| format!("{:?}", e))
}

/// Hook to manage the chat page
pub fn use_chat_state() -> ChatState {
    let session = use_hook(|| Rc::new(RefCell::new(ChatSession::new(FetchTransport::new()))));
    let transcript = use_signal(Transcript::new);
    let input = use_signal(String::new);
    let temperature = use_signal(|| DEFAULT_TEMPERATURE);
    let mode = use_signal(AttachmentMode::default);
    let pending = use_signal(|| None::<Attachment>);
    let is_loading = use_signal(|| false);
    let toast = use_toast();

    ChatState {
        session,
        transcript,
        input,
        temperature,
        mode,
        pending,
        is_loading,
        toast,
    }
}
