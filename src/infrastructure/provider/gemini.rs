//! Google Gemini over its REST API
//!
//! Files go through the resumable upload protocol, generation through
//! `streamGenerateContent?alt=sse`.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::{
    FileUpload, GenerationRequest, GenerativeProvider, PromptPart, ProviderError, ProviderFile,
    TextStream,
};
use crate::domain::models::{Role, Turn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct FileEnvelope {
    file: ProviderFile,
}

impl GeminiProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        // No overall timeout: generation streams can run for minutes
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1beta/{}", self.base_url, path)
    }

    /// Gemini `contents`: prior turns then the live user turn
    fn build_contents(history: &[Turn], parts: &[PromptPart]) -> Vec<Value> {
        let mut contents: Vec<Value> = history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    Role::User => "user",
                    Role::Model => "model",
                };
                json!({ "role": role, "parts": [{ "text": turn.text }] })
            })
            .collect();

        let live: Vec<Value> = parts
            .iter()
            .map(|part| match part {
                PromptPart::Text(text) => json!({ "text": text }),
                PromptPart::InlineData { mime_type, data } => json!({
                    "inlineData": { "mimeType": mime_type, "data": STANDARD.encode(data) }
                }),
                PromptPart::FileData { uri, mime_type } => match mime_type {
                    Some(mime_type) => json!({ "fileData": { "fileUri": uri, "mimeType": mime_type } }),
                    None => json!({ "fileData": { "fileUri": uri } }),
                },
            })
            .collect();
        contents.push(json!({ "role": "user", "parts": live }));
        contents
    }
}

fn network(error: reqwest::Error) -> ProviderError {
    ProviderError::Network(error.to_string())
}

/// Pull the human readable message out of a Gemini error body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value["error"]["message"].as_str().map(str::to_string)
}

async fn ensure_ok(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| format!("Gemini API error {}: {}", status.as_u16(), body.trim()));
    tracing::error!("Gemini error {}: {}", status.as_u16(), message);
    Err(ProviderError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Text parts of one `streamGenerateContent` event, or the error it carries
fn parse_event(data: &str) -> Result<Vec<String>, ProviderError> {
    let value: Value =
        serde_json::from_str(data).map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    if let Some(message) = value["error"]["message"].as_str() {
        return Err(ProviderError::Api {
            status: value["error"]["code"].as_u64().unwrap_or(500) as u16,
            message: message.to_string(),
        });
    }

    let mut texts = Vec::new();
    if let Some(candidates) = value["candidates"].as_array() {
        for candidate in candidates {
            let Some(parts) = candidate["content"]["parts"].as_array() else {
                if let Some(reason) = candidate["finishReason"].as_str() {
                    if reason != "STOP" {
                        return Err(ProviderError::Api {
                            status: 500,
                            message: format!("Response blocked ({})", reason),
                        });
                    }
                }
                continue;
            };
            for part in parts {
                // Thought summaries are not part of the reply
                if part["thought"].as_bool().unwrap_or(false) {
                    continue;
                }
                if let Some(text) = part["text"].as_str() {
                    if !text.is_empty() {
                        texts.push(text.to_string());
                    }
                }
            }
        }
    }
    Ok(texts)
}

/// Take every complete line out of `buffer` and return the `data:` payloads.
/// A trailing partial line stays buffered, so a UTF-8 sequence split across
/// network chunks is only decoded once whole.
fn drain_data_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut payloads = Vec::new();
    while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
        let raw: Vec<u8> = buffer.drain(..=newline).collect();
        let line = String::from_utf8_lossy(&raw[..newline]);
        if let Some(data) = line.trim().strip_prefix("data:") {
            payloads.push(data.trim().to_string());
        }
    }
    payloads
}

/// Forward the provider's SSE body as text deltas until it ends or the
/// receiver goes away
async fn pump_events(response: Response, tx: mpsc::Sender<Result<String, ProviderError>>) {
    let mut body = response.bytes_stream();
    let mut buffer = Vec::new();

    while let Some(chunk) = body.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tx
                    .send(Err(ProviderError::Network(format!("Stream read error: {}", e))))
                    .await;
                return;
            }
        };
        buffer.extend_from_slice(&bytes);

        for data in drain_data_lines(&mut buffer) {
            match parse_event(&data) {
                Ok(texts) => {
                    for text in texts {
                        if tx.send(Ok(text)).await.is_err() {
                            return;
                        }
                    }
                }
                Err(error) => {
                    let _ = tx.send(Err(error)).await;
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<ProviderFile, ProviderError> {
        let start_url = format!("{}/upload/v1beta/files?key={}", self.base_url, self.api_key);
        let start = self
            .client
            .post(&start_url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", upload.bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", upload.mime_type.as_str())
            .json(&json!({ "file": { "display_name": upload.display_name } }))
            .send()
            .await
            .map_err(network)?;
        let start = ensure_ok(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ProviderError::InvalidResponse("missing upload URL".to_string()))?;

        let finished = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(upload.bytes)
            .send()
            .await
            .map_err(network)?;
        let envelope: FileEnvelope = ensure_ok(finished).await?.json().await.map_err(network)?;
        Ok(envelope.file)
    }

    async fn get_file(&self, name: &str) -> Result<ProviderFile, ProviderError> {
        let url = format!("{}?key={}", self.api_url(name), self.api_key);
        let response = self.client.get(&url).send().await.map_err(network)?;
        ensure_ok(response).await?.json().await.map_err(network)
    }

    async fn delete_file(&self, name: &str) -> Result<(), ProviderError> {
        let url = format!("{}?key={}", self.api_url(name), self.api_key);
        let response = self.client.delete(&url).send().await.map_err(network)?;
        ensure_ok(response).await?;
        Ok(())
    }

    async fn stream_generate(&self, request: GenerationRequest) -> Result<TextStream, ProviderError> {
        let url = format!(
            "{}?alt=sse&key={}",
            self.api_url(&format!("models/{}:streamGenerateContent", self.model)),
            self.api_key
        );
        let body = json!({
            "contents": Self::build_contents(&request.history, &request.parts),
            "generationConfig": { "temperature": request.temperature },
        });

        tracing::info!("Gemini request model={}", self.model);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(network)?;
        let response = ensure_ok(response).await?;

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(pump_events(response, tx));
        Ok(ReceiverStream::new(rx).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_multibyte_character_survives() {
        let event = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"h\u{e9}llo\"}]}}]}\n\n";
        let bytes = event.as_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;

        let mut buffer = Vec::new();
        buffer.extend_from_slice(&bytes[..split]);
        assert!(drain_data_lines(&mut buffer).is_empty());

        buffer.extend_from_slice(&bytes[split..]);
        let payloads = drain_data_lines(&mut buffer);
        assert_eq!(payloads.len(), 1);
        assert_eq!(parse_event(&payloads[0]).unwrap(), vec!["h\u{e9}llo".to_string()]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_drain_data_lines_skips_other_fields_and_crlf() {
        let mut buffer = b": keepalive\r\nevent: message\r\ndata: {}\r\n\r\ndata: {\"a\"".to_vec();
        assert_eq!(drain_data_lines(&mut buffer), vec!["{}".to_string()]);
        assert_eq!(buffer, b"data: {\"a\"".to_vec());
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let result = GeminiProvider::new("  ", "gemini-2.5-flash", DEFAULT_BASE_URL);
        assert!(matches!(result, Err(ProviderError::MissingApiKey)));
    }

    #[test]
    fn test_build_contents_puts_history_first() {
        let history = vec![Turn::user("hi"), Turn::model("hello")];
        let parts = vec![
            PromptPart::Text("describe".to_string()),
            PromptPart::InlineData {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            },
            PromptPart::FileData {
                uri: "https://files/abc".to_string(),
                mime_type: Some("application/pdf".to_string()),
            },
        ];
        let contents = GeminiProvider::build_contents(&history, &parts);

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "hello");
        assert_eq!(contents[2]["parts"][0]["text"], "describe");
        assert_eq!(contents[2]["parts"][1]["inlineData"]["data"], "AQID");
        assert_eq!(contents[2]["parts"][2]["fileData"]["mimeType"], "application/pdf");
    }

    #[test]
    fn test_parse_event_collects_text_parts() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hel"},{"text":"lo"}],"role":"model"}}]}"#;
        assert_eq!(parse_event(data).unwrap(), vec!["Hel".to_string(), "lo".to_string()]);
    }

    #[test]
    fn test_parse_event_skips_thoughts() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"thinking","thought":true},{"text":"answer"}]}}]}"#;
        assert_eq!(parse_event(data).unwrap(), vec!["answer".to_string()]);
    }

    #[test]
    fn test_parse_event_surfaces_errors() {
        let data = r#"{"error":{"code":429,"message":"Resource has been exhausted"}}"#;
        assert_eq!(
            parse_event(data).unwrap_err(),
            ProviderError::Api {
                status: 429,
                message: "Resource has been exhausted".to_string()
            }
        );

        let blocked = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert!(parse_event(blocked).is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error":{"message":"API key not valid"}}"#),
            Some("API key not valid".to_string())
        );
        assert_eq!(error_message("not json"), None);
    }
}
