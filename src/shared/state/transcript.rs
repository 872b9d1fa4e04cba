//! Transcript shown in the chat area
//!
//! Entries are display state only. The turn history sent to the model lives
//! in [`ChatSession`](crate::shared::services::ChatSession).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::domain::models::PendingFile;
use crate::shared::markdown::{self, Document};
use crate::shared::utils::format_file_size;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    User,
    Ai,
}

/// Preview attached to a user entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Image { name: String, data_url: String },
    Card { name: String, size: String, mime_type: String },
}

impl Attachment {
    pub fn from_pending(file: &PendingFile) -> Self {
        if file.is_image() {
            Attachment::Image {
                name: file.name.clone(),
                data_url: format!("data:{};base64,{}", file.mime_type, STANDARD.encode(&file.bytes)),
            }
        } else {
            Attachment::Card {
                name: file.name.clone(),
                size: format_file_size(file.size()),
                mime_type: file.mime_type.clone(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub id: usize,
    pub kind: EntryKind,
    pub text: String,
    /// Rendered markdown for AI entries, empty for user entries
    pub html: String,
    pub attachment: Option<Attachment>,
    pub streaming: bool,
}

impl TranscriptEntry {
    /// Clipboard text rebuilt from the rendered reply
    pub fn copy_text(&self) -> String {
        match self.kind {
            EntryKind::Ai => Document::parse(&self.text).to_markdown(),
            EntryKind::User => self.text.trim().to_string(),
        }
    }

    /// Streaming placeholder with no text yet
    pub fn is_waiting(&self) -> bool {
        self.streaming && self.text.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_id: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn push_user(&mut self, text: impl Into<String>, attachment: Option<Attachment>) -> usize {
        self.push(EntryKind::User, text.into(), attachment, false)
    }

    pub fn push_ai(&mut self, text: impl Into<String>) -> usize {
        self.push(EntryKind::Ai, text.into(), None, false)
    }

    /// Add the placeholder that receives streamed text
    pub fn begin_stream(&mut self) -> usize {
        self.push(EntryKind::Ai, String::new(), None, true)
    }

    /// Replace the placeholder text with the full accumulated reply and re-render it
    pub fn update_stream(&mut self, id: usize, full_text: &str) {
        if let Some(entry) = self.entry_mut(id) {
            entry.text = full_text.to_string();
            entry.html = markdown::render_markdown(full_text);
        }
    }

    pub fn finish_stream(&mut self, id: usize) {
        if let Some(entry) = self.entry_mut(id) {
            entry.streaming = false;
        }
    }

    /// Turn the placeholder into an error bubble carrying the raw message
    pub fn fail_stream(&mut self, id: usize, message: &str) {
        self.update_stream(id, &format!("Error: {}", message));
        self.finish_stream(id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn copy_text(&self, id: usize) -> Option<String> {
        self.get(id).map(TranscriptEntry::copy_text)
    }

    fn push(&mut self, kind: EntryKind, text: String, attachment: Option<Attachment>, streaming: bool) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let html = match kind {
            EntryKind::Ai => markdown::render_markdown(&text),
            EntryKind::User => String::new(),
        };
        self.entries.push(TranscriptEntry {
            id,
            kind,
            text,
            html,
            attachment,
            streaming,
        });
        id
    }

    fn entry_mut(&mut self, id: usize) -> Option<&mut TranscriptEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_rerenders_full_text() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi", None);
        let id = transcript.begin_stream();
        assert!(transcript.get(id).is_some_and(TranscriptEntry::is_waiting));

        transcript.update_stream(id, "**Hel");
        assert_eq!(transcript.get(id).map(|e| e.html.as_str()), Some("**Hel"));

        transcript.update_stream(id, "**Hello**");
        assert_eq!(
            transcript.get(id).map(|e| e.html.as_str()),
            Some("<strong>Hello</strong>")
        );

        transcript.finish_stream(id);
        let entry = transcript.get(id).cloned();
        assert_eq!(entry.map(|e| e.streaming), Some(false));
    }

    #[test]
    fn test_user_text_is_not_rendered() {
        let mut transcript = Transcript::new();
        let id = transcript.push_user("**raw**", None);
        let entry = transcript.get(id).cloned();
        assert_eq!(entry.as_ref().map(|e| e.html.as_str()), Some(""));
        assert_eq!(entry.map(|e| e.copy_text()), Some("**raw**".to_string()));
    }

    #[test]
    fn test_fail_stream_shows_error() {
        let mut transcript = Transcript::new();
        let id = transcript.begin_stream();
        transcript.fail_stream(id, "quota exceeded");
        let entry = transcript.get(id).cloned();
        assert_eq!(entry.as_ref().map(|e| e.text.as_str()), Some("Error: quota exceeded"));
        assert_eq!(entry.map(|e| e.streaming), Some(false));
    }

    #[test]
    fn test_copy_text_for_ai_entry() {
        let mut transcript = Transcript::new();
        let id = transcript.push_ai("# Title\n| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            transcript.copy_text(id),
            Some("Title\n\na\tb\n---\t---\n1\t2".to_string())
        );
        assert_eq!(transcript.copy_text(99), None);
    }

    #[test]
    fn test_clear_keeps_ids_unique() {
        let mut transcript = Transcript::new();
        let first = transcript.push_ai("a");
        transcript.clear();
        assert!(transcript.is_empty());
        let second = transcript.push_ai("b");
        assert_ne!(first, second);
    }

    #[test]
    fn test_attachment_preview_kinds() {
        let image = PendingFile::new("cat.png", "image/png", vec![1, 2, 3]);
        assert_eq!(
            Attachment::from_pending(&image),
            Attachment::Image {
                name: "cat.png".to_string(),
                data_url: "data:image/png;base64,AQID".to_string(),
            }
        );

        let doc = PendingFile::new("report.pdf", "", vec![0; 2048]);
        assert_eq!(
            Attachment::from_pending(&doc),
            Attachment::Card {
                name: "report.pdf".to_string(),
                size: "2.0 KB".to_string(),
                mime_type: "application/pdf".to_string(),
            }
        );
    }
}
