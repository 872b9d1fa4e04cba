use serde::{Deserialize, Deserializer, Serialize};

use super::file::UploadedFile;
use super::message::Turn;

/// Temperature used when the caller omits it or sends garbage
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

/// Model used when nothing else is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// SSE payload that ends every generation stream
pub const DONE_MARKER: &str = "[DONE]";

/// Body of `POST /generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_temperature", deserialize_with = "deserialize_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub history: Vec<Turn>,
    #[serde(default)]
    pub file_uris: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            history: Vec::new(),
            file_uris: Vec::new(),
            session_id: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_file_uris(mut self, file_uris: Vec<String>) -> Self {
        self.file_uris = file_uris;
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

pub fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// Parse a temperature the way a form field or loose JSON would carry it.
///
/// Leading numeric prefixes are accepted (`"0.7abc"` → 0.7); anything without
/// one falls back to [`DEFAULT_TEMPERATURE`].
pub fn parse_temperature(raw: &str) -> f32 {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .take_while(|(i, c)| {
            c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))
        })
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    // Shrink until the prefix parses, e.g. "1.2.3" -> "1.2"
    let mut candidate = &trimmed[..end];
    while !candidate.is_empty() {
        if let Ok(value) = candidate.parse::<f32>() {
            if value.is_finite() {
                return value;
            }
            break;
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    DEFAULT_TEMPERATURE
}

fn deserialize_temperature<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().map(|v| v as f32).unwrap_or(DEFAULT_TEMPERATURE),
        serde_json::Value::String(s) => parse_temperature(&s),
        _ => DEFAULT_TEMPERATURE,
    })
}

/// One decoded frame of a generation stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    /// Text delta produced by the model
    Text(String),
    /// Upstream failure after the stream had started
    Error(String),
    /// Terminator
    Done,
}

#[derive(Serialize, Deserialize)]
struct TextPayload {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct ErrorPayload {
    error: String,
}

impl StreamFrame {
    /// Payload placed after `data: ` on the wire
    pub fn to_data(&self) -> String {
        match self {
            StreamFrame::Text(text) => serde_json::to_string(&TextPayload { text: text.clone() })
                .unwrap_or_else(|_| r#"{"text":""}"#.to_string()),
            StreamFrame::Error(error) => serde_json::to_string(&ErrorPayload { error: error.clone() })
                .unwrap_or_else(|_| r#"{"error":"unknown error"}"#.to_string()),
            StreamFrame::Done => DONE_MARKER.to_string(),
        }
    }

    /// Decode a `data:` payload; unknown payloads yield `None`
    pub fn from_data(data: &str) -> Option<Self> {
        let data = data.trim();
        if data == DONE_MARKER {
            return Some(StreamFrame::Done);
        }
        if let Ok(payload) = serde_json::from_str::<TextPayload>(data) {
            return Some(StreamFrame::Text(payload.text));
        }
        serde_json::from_str::<ErrorPayload>(data)
            .ok()
            .map(|payload| StreamFrame::Error(payload.error))
    }
}

/// Response of `POST /upload-file`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub file: UploadedFile,
}

/// Response of `GET /files/{sessionId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesResponse {
    pub files: Vec<UploadedFile>,
}

/// Response of `DELETE /files/{sessionId}/{fileName}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error body shared by every route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_defaults() {
        let request: GenerateRequest = serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap();
        assert_eq!(request.prompt, "hi");
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert!(request.history.is_empty());
        assert!(request.file_uris.is_empty());
        assert_eq!(request.session_id, None);
    }

    #[test]
    fn test_generate_request_accepts_string_temperature() {
        let request: GenerateRequest =
            serde_json::from_str(r#"{"prompt":"hi","temperature":"0.4","sessionId":"s1","fileUris":["u"]}"#)
                .unwrap();
        assert!((request.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(request.session_id.as_deref(), Some("s1"));
        assert_eq!(request.file_uris, vec!["u".to_string()]);
    }

    #[test]
    fn test_parse_temperature() {
        assert!((parse_temperature("1.5") - 1.5).abs() < f32::EPSILON);
        assert!((parse_temperature(" 0.7abc") - 0.7).abs() < f32::EPSILON);
        assert!((parse_temperature("1.2.3") - 1.2).abs() < f32::EPSILON);
        assert_eq!(parse_temperature("warm"), DEFAULT_TEMPERATURE);
        assert_eq!(parse_temperature(""), DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_stream_frame_wire_payloads() {
        assert_eq!(StreamFrame::Text("a\"b".into()).to_data(), r#"{"text":"a\"b"}"#);
        assert_eq!(StreamFrame::Error("boom".into()).to_data(), r#"{"error":"boom"}"#);
        assert_eq!(StreamFrame::Done.to_data(), "[DONE]");
    }

    #[test]
    fn test_stream_frame_decoding() {
        assert_eq!(StreamFrame::from_data(" [DONE] "), Some(StreamFrame::Done));
        assert_eq!(
            StreamFrame::from_data(r#"{"text":"hello"}"#),
            Some(StreamFrame::Text("hello".into()))
        );
        assert_eq!(
            StreamFrame::from_data(r#"{"error":"quota"}"#),
            Some(StreamFrame::Error("quota".into()))
        );
        assert_eq!(StreamFrame::from_data("not json"), None);
    }
}
