//! Browser [`ChatTransport`] over `fetch`
//!
//! JSON calls go through `gloo-net`. Streaming bodies are read chunk by chunk
//! from the response's `ReadableStream`.

use gloo_net::http::{Request, Response};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, ReadableStreamDefaultReader};

use crate::domain::models::{
    FilesResponse, GenerateRequest, PendingFile, StreamFrame, UploadResponse, UploadedFile,
};
use crate::shared::errors::{ClientError, Result};
use crate::shared::utils::SseDecoder;

use super::transport::{
    ChatTransport, GENERATE_MULTIMODAL_PATH, GENERATE_PATH, MultimodalRequest, UPLOAD_PATH,
    file_path, session_files_path,
};

/// Same-origin transport; paths are used as-is unless a base URL is set
#[derive(Debug, Clone, Default)]
pub struct FetchTransport {
    base_url: String,
}

impl FetchTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network(error: impl std::fmt::Display) -> ClientError {
    ClientError::Network(error.to_string())
}

fn js_error(error: JsValue) -> ClientError {
    ClientError::Network(format!("{:?}", error))
}

async fn ensure_ok(response: Response) -> Result<Response> {
    if response.ok() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_status(response.status(), &body))
}

fn file_blob(file: &PendingFile) -> Result<Blob> {
    let bytes = Uint8Array::from(file.bytes.as_slice());
    let parts = Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&file.mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)
}

fn form_with_file(file: &PendingFile) -> Result<FormData> {
    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("file", &file_blob(file)?, &file.name)
        .map_err(js_error)?;
    Ok(form)
}

async fn read_stream(response: Response, on_frame: &mut dyn FnMut(StreamFrame)) -> Result<()> {
    let body = response
        .body()
        .ok_or_else(|| ClientError::Stream("Response has no body".to_string()))?;
    let reader: ReadableStreamDefaultReader = body.get_reader().dyn_into().map_err(js_error)?;

    let mut decoder = SseDecoder::new();
    loop {
        let result = JsFuture::from(reader.read()).await.map_err(js_error)?;
        let done = js_sys::Reflect::get(&result, &JsValue::from_str("done"))
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(true);
        if done {
            break;
        }

        let chunk = js_sys::Reflect::get(&result, &JsValue::from_str("value"))
            .ok()
            .and_then(|value| value.dyn_into::<Uint8Array>().ok());
        if let Some(chunk) = chunk {
            decoder.feed(&chunk.to_vec()).into_iter().for_each(&mut *on_frame);
        }
    }

    if let Some(frame) = decoder.finish() {
        on_frame(frame);
    }
    Ok(())
}

impl ChatTransport for FetchTransport {
    async fn upload_file(&self, session_id: &str, file: &PendingFile) -> Result<UploadedFile> {
        let form = form_with_file(file)?;
        form.append_with_str("sessionId", session_id).map_err(js_error)?;

        let response = Request::post(&self.url(UPLOAD_PATH))
            .body(form)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let upload: UploadResponse = ensure_ok(response).await?.json().await.map_err(network)?;
        Ok(upload.file)
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
        on_frame: &mut dyn FnMut(StreamFrame),
    ) -> Result<()> {
        let response = Request::post(&self.url(GENERATE_PATH))
            .json(request)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_stream(ensure_ok(response).await?, on_frame).await
    }

    async fn generate_multimodal(
        &self,
        request: MultimodalRequest<'_>,
        on_frame: &mut dyn FnMut(StreamFrame),
    ) -> Result<()> {
        let form = form_with_file(request.file)?;
        form.append_with_str("prompt", request.prompt).map_err(js_error)?;
        form.append_with_str("temperature", &request.temperature.to_string())
            .map_err(js_error)?;
        form.append_with_str("history", &serde_json::to_string(request.history)?)
            .map_err(js_error)?;

        let response = Request::post(&self.url(GENERATE_MULTIMODAL_PATH))
            .body(form)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_stream(ensure_ok(response).await?, on_frame).await
    }

    async fn list_files(&self, session_id: &str) -> Result<Vec<UploadedFile>> {
        let response = Request::get(&self.url(&session_files_path(session_id)))
            .send()
            .await
            .map_err(network)?;
        let files: FilesResponse = ensure_ok(response).await?.json().await.map_err(network)?;
        Ok(files.files)
    }

    async fn delete_file(&self, session_id: &str, file_name: &str) -> Result<()> {
        let response = Request::delete(&self.url(&file_path(session_id, file_name)))
            .send()
            .await
            .map_err(network)?;
        ensure_ok(response).await?;
        Ok(())
    }
}
