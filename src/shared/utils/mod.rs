// Utility functions
// Stream decoding, formatting, ids

pub mod format;
pub mod sse;

pub use format::{format_file_size, generate_session_id, pasted_image_name};
pub use sse::SseDecoder;
