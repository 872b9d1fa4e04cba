//! Native [`ChatTransport`] over `reqwest`, used by the e2e tests and by
//! tools that talk to a running relay

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};

use crate::domain::models::{
    FilesResponse, GenerateRequest, PendingFile, StreamFrame, UploadResponse, UploadedFile,
};
use crate::shared::errors::{ClientError, Result};
use crate::shared::utils::SseDecoder;

use super::transport::{
    ChatTransport, GENERATE_MULTIMODAL_PATH, GENERATE_PATH, MultimodalRequest, UPLOAD_PATH,
    file_path, session_files_path,
};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_stream(response: Response, on_frame: &mut dyn FnMut(StreamFrame)) -> Result<()> {
        let mut decoder = SseDecoder::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(network)?;
            decoder.feed(&chunk).into_iter().for_each(&mut *on_frame);
        }
        if let Some(frame) = decoder.finish() {
            on_frame(frame);
        }
        Ok(())
    }
}

fn network(error: reqwest::Error) -> ClientError {
    ClientError::Network(error.to_string())
}

/// Pass OK responses through, turn anything else into [`ClientError::Status`]
async fn ensure_ok(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_status(status.as_u16(), &body))
}

fn file_part(file: &PendingFile) -> Result<Part> {
    Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| ClientError::InvalidFile(e.to_string()))
}

impl ChatTransport for HttpTransport {
    async fn upload_file(&self, session_id: &str, file: &PendingFile) -> Result<UploadedFile> {
        let form = Form::new()
            .text("sessionId", session_id.to_string())
            .part("file", file_part(file)?);

        let response = self
            .client
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
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
        let response = self
            .client
            .post(self.url(GENERATE_PATH))
            .json(request)
            .send()
            .await
            .map_err(network)?;
        Self::read_stream(ensure_ok(response).await?, on_frame).await
    }

    async fn generate_multimodal(
        &self,
        request: MultimodalRequest<'_>,
        on_frame: &mut dyn FnMut(StreamFrame),
    ) -> Result<()> {
        let form = Form::new()
            .text("prompt", request.prompt.to_string())
            .text("temperature", request.temperature.to_string())
            .text("history", serde_json::to_string(request.history)?)
            .part("file", file_part(request.file)?);

        let response = self
            .client
            .post(self.url(GENERATE_MULTIMODAL_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        Self::read_stream(ensure_ok(response).await?, on_frame).await
    }

    async fn list_files(&self, session_id: &str) -> Result<Vec<UploadedFile>> {
        let response = self
            .client
            .get(self.url(&session_files_path(session_id)))
            .send()
            .await
            .map_err(network)?;
        let files: FilesResponse = ensure_ok(response).await?.json().await.map_err(network)?;
        Ok(files.files)
    }

    async fn delete_file(&self, session_id: &str, file_name: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&file_path(session_id, file_name)))
            .send()
            .await
            .map_err(network)?;
        ensure_ok(response).await?;
        Ok(())
    }
}
