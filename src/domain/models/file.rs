use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum attachment size accepted by the relay by default (20MB)
pub const MAX_UPLOAD_SIZE: usize = 20 * 1024 * 1024;

/// Mime type used when neither the browser nor the extension tells us more
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// File record kept per session after a successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Provider resource name (`files/abc123`)
    pub name: String,
    pub uri: String,
    pub mime_type: String,
    pub display_name: String,
    pub size: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// Processing state reported by the provider for an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    #[default]
    StateUnspecified,
    Processing,
    #[serde(alias = "READY")]
    Active,
    Failed,
}

impl FileState {
    pub fn is_ready(&self) -> bool {
        matches!(self, FileState::Active)
    }
}

/// Local file picked in the browser, waiting for the next submit
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_type.into();
        let mime_type = if mime_type.is_empty() {
            infer_mime_type(&name).to_string()
        } else {
            mime_type
        };
        Self {
            name,
            mime_type,
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Guess a mime type from the file extension
pub fn infer_mime_type(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploaded_file_uses_camel_case() {
        let file = UploadedFile {
            name: "files/abc".to_string(),
            uri: "https://example.test/files/abc".to_string(),
            mime_type: "image/png".to_string(),
            display_name: "cat.png".to_string(),
            size: 10,
            uploaded_at: Utc::now(),
        };
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(value["mimeType"], "image/png");
        assert_eq!(value["displayName"], "cat.png");
        assert!(value["uploadedAt"].is_string());
    }

    #[test]
    fn test_file_state_accepts_ready_alias() {
        let state: FileState = serde_json::from_str("\"READY\"").unwrap();
        assert!(state.is_ready());
        let state: FileState = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(state, FileState::Processing);
        assert!(!state.is_ready());
    }

    #[test]
    fn test_pending_file_infers_missing_mime() {
        let file = PendingFile::new("notes.PDF", "", vec![1, 2, 3]);
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size(), 3);
        assert!(!file.is_image());

        let file = PendingFile::new("photo.bin", "image/png", vec![]);
        assert!(file.is_image());
    }

    #[test]
    fn test_infer_mime_type_fallback() {
        assert_eq!(infer_mime_type("archive.xyz"), DEFAULT_MIME_TYPE);
        assert_eq!(infer_mime_type("no_extension"), DEFAULT_MIME_TYPE);
        assert_eq!(infer_mime_type("song.mp3"), "audio/mpeg");
    }
}
