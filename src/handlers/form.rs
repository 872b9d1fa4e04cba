//! Multipart form reading shared by the upload and multimodal routes

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use super::error::ApiError;
use crate::domain::models::{DEFAULT_MIME_TYPE, infer_mime_type};

/// The `file` part of a form
#[derive(Debug, Clone)]
pub struct FormFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// A multipart body split into its single file and its text fields
#[derive(Debug, Default)]
pub struct FormFields {
    pub file: Option<FormFile>,
    text: HashMap<String, String>,
}

impl FormFields {
    /// Text field value, `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

fn multipart_error(error: MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("File too large".to_string())
    } else {
        ApiError::BadRequest(format!("Invalid form data: {}", error.body_text()))
    }
}

/// Browser-declared type, else one inferred from the file name
fn resolve_mime_type(declared: Option<&str>, file_name: &str) -> String {
    match declared {
        Some(mime) if !mime.is_empty() && mime != DEFAULT_MIME_TYPE => mime.to_string(),
        _ => infer_mime_type(file_name).to_string(),
    }
}

/// Read every part, rejecting files above `max_file_bytes`
pub async fn read_form(mut multipart: Multipart, max_file_bytes: usize) -> Result<FormFields, ApiError> {
    let mut fields = FormFields::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let mime_type = resolve_mime_type(field.content_type(), &file_name);
            let mut bytes = Vec::new();
            while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                if bytes.len() + chunk.len() > max_file_bytes {
                    return Err(ApiError::PayloadTooLarge(format!(
                        "File too large (max {} bytes)",
                        max_file_bytes
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }
            tracing::debug!(file_name = %file_name, mime_type = %mime_type, size = bytes.len(), "Form file received");
            fields.file = Some(FormFile {
                name: file_name,
                mime_type,
                bytes,
            });
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            fields.text.insert(name, value);
        }
    }

    Ok(fields)
}
