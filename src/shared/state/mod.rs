// Client-side view state

pub mod transcript;

pub use transcript::{Attachment, EntryKind, Transcript, TranscriptEntry};
