//! POST /upload-file
//!
//! Hands the file to the provider, waits until it is processed and records
//! it under the caller's session. Nothing is recorded when any step fails.

use axum::extract::Multipart;
use axum::{Extension, Json};
use chrono::Utc;
use tracing::Instrument;

use super::error::ApiError;
use super::form::read_form;
use super::state::RelayState;
use crate::domain::models::{UploadResponse, UploadedFile};
use crate::infrastructure::provider::{FileUpload, wait_until_active};
use crate::shared::logging::{log_upload_error, log_upload_start, log_upload_success};

pub async fn upload_file_handler(
    Extension(state): Extension<RelayState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut form = read_form(multipart, state.max_upload_bytes).await?;

    let Some(session_id) = form.text("sessionId").map(str::to_string) else {
        return Err(ApiError::BadRequest("sessionId required".to_string()));
    };
    let Some(file) = form.file.take() else {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    };

    log_upload_start(&session_id, &file.name, &file.mime_type, file.bytes.len());

    let size = file.bytes.len();
    let upload = FileUpload {
        display_name: file.name.clone(),
        mime_type: file.mime_type.clone(),
        bytes: file.bytes,
    };

    let ready = async {
        let uploaded = state.provider.upload_file(upload).await?;
        wait_until_active(state.provider.as_ref(), uploaded, state.poll).await
    }
    .instrument(crate::log_context!("/upload-file", session_id.as_str()))
    .await
    .map_err(|e| {
        log_upload_error(&session_id, &file.name, &e.to_string());
        ApiError::from(e)
    })?;

    let record = UploadedFile {
        name: ready.name,
        uri: ready.uri,
        mime_type: if ready.mime_type.is_empty() {
            file.mime_type
        } else {
            ready.mime_type
        },
        display_name: file.name,
        size,
        uploaded_at: Utc::now(),
    };

    log_upload_success(&session_id, &record.display_name, &record.uri);
    state.files.append(&session_id, record.clone()).await;

    Ok(Json(UploadResponse {
        success: true,
        file: record,
    }))
}
