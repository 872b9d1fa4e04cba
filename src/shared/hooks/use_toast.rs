//! Transient notifications shown above the input

use dioxus::prelude::*;

/// How long a toast stays visible
pub const TOAST_DURATION_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "toast--info",
            ToastKind::Error => "toast--error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// Bumped on every show so a late timer never hides a newer toast
    pub id: u64,
    pub text: String,
    pub kind: ToastKind,
}

#[derive(Clone, Copy, PartialEq)]
pub struct ToastState {
    pub current: Signal<Option<Toast>>,
    next_id: Signal<u64>,
}

impl ToastState {
    pub fn info(&mut self, text: impl Into<String>) {
        self.show(text.into(), ToastKind::Info);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(text.into(), ToastKind::Error);
    }

    /// Hide the toast `id` if it is still the one on screen
    pub fn dismiss(&mut self, id: u64) {
        let is_current = self.current.read().as_ref().is_some_and(|toast| toast.id == id);
        if is_current {
            self.current.set(None);
        }
    }

    fn show(&mut self, text: String, kind: ToastKind) {
        let id = *self.next_id.read();
        self.next_id.set(id + 1);
        tracing::debug!(id, ?kind, "toast: {}", text);
        self.current.set(Some(Toast { id, text, kind }));
    }
}

pub fn use_toast() -> ToastState {
    let current = use_signal(|| None::<Toast>);
    let next_id = use_signal(|| 0u64);
    ToastState { current, next_id }
}
