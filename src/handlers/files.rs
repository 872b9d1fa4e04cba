//! Per-session file listing and removal

use axum::extract::Path;
use axum::{Extension, Json};

use super::error::ApiError;
use super::state::RelayState;
use crate::domain::models::{FilesResponse, SuccessResponse};
use crate::shared::logging::{log_file_delete, log_file_list};

/// GET /files/{session_id}
pub async fn list_files_handler(
    Extension(state): Extension<RelayState>,
    Path(session_id): Path<String>,
) -> Json<FilesResponse> {
    let files = state.files.list(&session_id).await;
    log_file_list(&session_id, files.len());
    Json(FilesResponse { files })
}

/// DELETE /files/{session_id}/{*file_name}
///
/// Provider names contain a slash (`files/abc`), hence the wildcard. The
/// local record goes first; a provider-side failure is only logged.
pub async fn delete_file_handler(
    Extension(state): Extension<RelayState>,
    Path((session_id, file_name)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Some(removed) = state.files.remove(&session_id, &file_name).await else {
        log_file_delete(&session_id, &file_name, "not_found");
        return Err(ApiError::NotFound("File not found".to_string()));
    };

    match state.provider.delete_file(&removed.name).await {
        Ok(()) => log_file_delete(&session_id, &removed.name, "deleted"),
        Err(e) => {
            tracing::warn!(file_name = %removed.name, error = %e, "Provider delete failed, local record removed");
            log_file_delete(&session_id, &removed.name, "provider_error");
        }
    }

    Ok(Json(SuccessResponse { success: true }))
}
