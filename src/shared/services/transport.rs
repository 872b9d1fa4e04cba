use crate::domain::models::{GenerateRequest, PendingFile, StreamFrame, Turn, UploadedFile};
use crate::shared::errors::Result;

/// Relay routes
pub const GENERATE_PATH: &str = "/generate";
pub const GENERATE_MULTIMODAL_PATH: &str = "/generate-multimodal";
pub const UPLOAD_PATH: &str = "/upload-file";
pub const FILES_PATH: &str = "/files";

/// Fields of a `/generate-multimodal` form
#[derive(Debug, Clone)]
pub struct MultimodalRequest<'a> {
    pub prompt: &'a str,
    pub temperature: f32,
    pub history: &'a [Turn],
    pub file: &'a PendingFile,
}

/// HTTP access to the relay as seen by the chat session
///
/// Streaming calls hand every decoded frame to `on_frame`, including a final
/// frame flushed when the body ends. They return `Ok` once the body is fully
/// read; interpreting `Error` and `Done` frames is up to the caller.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    async fn upload_file(&self, session_id: &str, file: &PendingFile) -> Result<UploadedFile>;

    async fn generate(
        &self,
        request: &GenerateRequest,
        on_frame: &mut dyn FnMut(StreamFrame),
    ) -> Result<()>;

    async fn generate_multimodal(
        &self,
        request: MultimodalRequest<'_>,
        on_frame: &mut dyn FnMut(StreamFrame),
    ) -> Result<()>;

    async fn list_files(&self, session_id: &str) -> Result<Vec<UploadedFile>>;

    async fn delete_file(&self, session_id: &str, file_name: &str) -> Result<()>;
}

/// `/files/{session}/{name}` with both segments percent-encoded
pub fn file_path(session_id: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}",
        FILES_PATH,
        urlencoding::encode(session_id),
        urlencoding::encode(file_name)
    )
}

/// `/files/{session}`
pub fn session_files_path(session_id: &str) -> String {
    format!("{}/{}", FILES_PATH, urlencoding::encode(session_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_encodes_provider_names() {
        assert_eq!(file_path("s1", "files/abc"), "/files/s1/files%2Fabc");
        assert_eq!(session_files_path("s 1"), "/files/s%201");
    }
}
