//! Streaming generation routes.
//!
//! Both routes answer with `text/event-stream`; every event is
//! `data: {"text": ...}`, `data: {"error": ...}` or `data: [DONE]`, and
//! `[DONE]` always comes last. Failures before the first byte are plain JSON
//! errors instead.

use std::convert::Infallible;

use axum::Extension;
use axum::extract::Multipart;
use axum::extract::rejection::JsonRejection;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::error::ApiError;
use super::form::read_form;
use super::state::RelayState;
use crate::domain::models::{
    DEFAULT_TEMPERATURE, GenerateRequest, StreamFrame, Turn, parse_temperature,
};
use crate::infrastructure::provider::{GenerationRequest, PromptPart, TextStream};
use crate::shared::logging::{log_generate_complete, log_generate_error, log_generate_start};

const GENERATE_ROUTE: &str = "/generate";
const MULTIMODAL_ROUTE: &str = "/generate-multimodal";

/// POST /generate
///
/// Text prompt plus optional URIs of files uploaded earlier. With a
/// `sessionId`, URIs found in that session's store carry their mime type.
pub async fn generate_handler(
    Extension(state): Extension<RelayState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("Prompt required".to_string()));
    }

    log_generate_start(
        GENERATE_ROUTE,
        request.history.len(),
        request.file_uris.len(),
        request.temperature,
    );

    let mut parts = vec![PromptPart::Text(request.prompt)];
    for uri in request.file_uris {
        let mime_type = match &request.session_id {
            Some(session_id) => state
                .files
                .find_by_uri(session_id, &uri)
                .await
                .map(|file| file.mime_type),
            None => None,
        };
        parts.push(PromptPart::FileData { uri, mime_type });
    }

    let generation = GenerationRequest {
        history: request.history,
        parts,
        temperature: request.temperature,
    };
    let stream = start(&state, GENERATE_ROUTE, generation).await?;
    Ok(relay_stream(GENERATE_ROUTE, stream))
}

/// POST /generate-multimodal
///
/// Form fields `prompt`, `file`, optional `temperature` and `history` (JSON
/// array of turns). The file travels inline, nothing is stored.
pub async fn generate_multimodal_handler(
    Extension(state): Extension<RelayState>,
    multipart: Multipart,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let mut form = read_form(multipart, state.max_upload_bytes).await?;

    let prompt = form.text("prompt").map(str::to_string);
    let (Some(prompt), Some(file)) = (prompt, form.file.take()) else {
        return Err(ApiError::BadRequest("Prompt and file required".to_string()));
    };
    let temperature = form
        .text("temperature")
        .map(parse_temperature)
        .unwrap_or(DEFAULT_TEMPERATURE);
    let history: Vec<Turn> = match form.text("history") {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| ApiError::BadRequest(format!("Invalid history: {}", e)))?,
        None => Vec::new(),
    };

    log_generate_start(MULTIMODAL_ROUTE, history.len(), 1, temperature);

    let generation = GenerationRequest {
        history,
        parts: vec![
            PromptPart::Text(prompt),
            PromptPart::InlineData {
                mime_type: file.mime_type,
                data: file.bytes,
            },
        ],
        temperature,
    };
    let stream = start(&state, MULTIMODAL_ROUTE, generation).await?;
    Ok(relay_stream(MULTIMODAL_ROUTE, stream))
}

async fn start(
    state: &RelayState,
    route: &'static str,
    generation: GenerationRequest,
) -> Result<TextStream, ApiError> {
    state.provider.stream_generate(generation).await.map_err(|e| {
        log_generate_error(route, &e.to_string());
        ApiError::from(e)
    })
}

/// Re-frame provider deltas as relay events, always ending with `[DONE]`
fn relay_stream(
    route: &'static str,
    mut upstream: TextStream,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<StreamFrame>(32);

    tokio::spawn(async move {
        let mut chunks = 0;
        let mut status = "done";

        while let Some(item) = upstream.next().await {
            match item {
                Ok(text) => {
                    chunks += 1;
                    if tx.send(StreamFrame::Text(text)).await.is_err() {
                        tracing::debug!(route, "Client disconnected");
                        log_generate_complete(route, chunks, "disconnected");
                        return;
                    }
                }
                Err(e) => {
                    log_generate_error(route, &e.to_string());
                    status = "error";
                    let _ = tx.send(StreamFrame::Error(e.to_string())).await;
                    break;
                }
            }
        }

        let _ = tx.send(StreamFrame::Done).await;
        log_generate_complete(route, chunks, status);
    });

    let events = ReceiverStream::new(rx).map(|frame| Ok(Event::default().data(frame.to_data())));
    Sse::new(events).keep_alive(KeepAlive::default())
}
