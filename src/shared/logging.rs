//! Structured logging for the relay
//!
//! One helper per notable event so every log line for an operation carries
//! the same `operation` field and the same field names.

/// Operations traced by the relay
#[derive(Debug, Clone, Copy)]
pub enum LogOperation {
    Upload,
    ProcessingPoll,
    Generate,
    FileList,
    FileDelete,
}

impl LogOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogOperation::Upload => "upload",
            LogOperation::ProcessingPoll => "processing_poll",
            LogOperation::Generate => "generate",
            LogOperation::FileList => "file_list",
            LogOperation::FileDelete => "file_delete",
        }
    }
}

/// Log an upload accepted from the browser
pub fn log_upload_start(session_id: &str, file_name: &str, mime_type: &str, size: usize) {
    tracing::info!(
        operation = LogOperation::Upload.as_str(),
        session_id = session_id,
        file_name = file_name,
        mime_type = mime_type,
        size = size,
        "Forwarding upload to provider"
    );
}

/// Log an upload that reached the ready state
pub fn log_upload_success(session_id: &str, file_name: &str, uri: &str) {
    tracing::info!(
        operation = LogOperation::Upload.as_str(),
        session_id = session_id,
        file_name = file_name,
        uri = uri,
        "File ready"
    );
}

/// Log a failed upload
pub fn log_upload_error(session_id: &str, file_name: &str, error: &str) {
    tracing::error!(
        operation = LogOperation::Upload.as_str(),
        session_id = session_id,
        file_name = file_name,
        error = error,
        "Upload failed"
    );
}

/// Log one processing status check
pub fn log_processing_poll(file_name: &str, attempt: u32, state: &str) {
    tracing::debug!(
        operation = LogOperation::ProcessingPoll.as_str(),
        file_name = file_name,
        attempt = attempt,
        state = state,
        "Polled file state"
    );
}

/// Log a file that never left processing
pub fn log_processing_timeout(file_name: &str, attempts: u32) {
    tracing::warn!(
        operation = LogOperation::ProcessingPoll.as_str(),
        file_name = file_name,
        attempts = attempts,
        "File still processing after last attempt"
    );
}

/// Log the start of a generation request
pub fn log_generate_start(route: &str, history_len: usize, file_count: usize, temperature: f32) {
    tracing::info!(
        operation = LogOperation::Generate.as_str(),
        route = route,
        history_len = history_len,
        file_count = file_count,
        temperature = temperature as f64,
        "Starting generation"
    );
}

/// Log a finished generation stream
pub fn log_generate_complete(route: &str, chunks: usize, status: &str) {
    tracing::info!(
        operation = LogOperation::Generate.as_str(),
        route = route,
        chunks = chunks,
        status = status,
        "Generation stream closed"
    );
}

/// Log a provider failure during generation
pub fn log_generate_error(route: &str, error: &str) {
    tracing::error!(
        operation = LogOperation::Generate.as_str(),
        route = route,
        error = error,
        "Generation failed"
    );
}

/// Log a session file listing
pub fn log_file_list(session_id: &str, count: usize) {
    tracing::debug!(
        operation = LogOperation::FileList.as_str(),
        session_id = session_id,
        file_count = count,
        "Listed session files"
    );
}

/// Log a file removal, `status` is `removed`, `not_found` or `provider_error`
pub fn log_file_delete(session_id: &str, file_name: &str, status: &str) {
    tracing::info!(
        operation = LogOperation::FileDelete.as_str(),
        session_id = session_id,
        file_name = file_name,
        status = status,
        "Session file delete"
    );
}

/// Macro for creating structured log context
#[macro_export]
macro_rules! log_context {
    ($route:expr) => {
        tracing::info_span!("relay", route = $route)
    };
    ($route:expr, $session:expr) => {
        tracing::info_span!("relay", route = $route, session_id = $session)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_operation_as_str() {
        assert_eq!(LogOperation::Upload.as_str(), "upload");
        assert_eq!(LogOperation::ProcessingPoll.as_str(), "processing_poll");
        assert_eq!(LogOperation::Generate.as_str(), "generate");
        assert_eq!(LogOperation::FileList.as_str(), "file_list");
        assert_eq!(LogOperation::FileDelete.as_str(), "file_delete");
    }
}
