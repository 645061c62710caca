//! Request Validator — turns a raw `/chat` body into a `ChatRequest`.
//!
//! Only `message` is validated here. `model` and `mode` are carried as-is and resolved
//! downstream with lenient fallbacks (see `backend` and `profile`); values of the wrong JSON
//! type are never rejected, they just fail to match anything and fall back.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MODE: &str = "general";
const MISSING_MESSAGE: &str = "No message provided.";

/// A validated chat request. `message` is guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub model: String,
    pub mode: String,
    /// Opaque identifiers selected in the UI. Accepted but not interpreted by routing.
    pub document_ids: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChatRequest {
    message: Option<String>,
    model: Option<Value>,
    mode: Option<Value>,
    document_ids: Option<Value>,
}

/// A non-string `model` keeps its JSON text, which matches no known model and so resolves
/// to the fallback model.
fn model_name(value: Option<Value>) -> String {
    match value {
        None => DEFAULT_MODEL.to_string(),
        Some(Value::String(name)) => name,
        Some(other) => other.to_string(),
    }
}

fn mode_name(value: Option<Value>) -> String {
    match value {
        Some(Value::String(mode)) => mode,
        _ => DEFAULT_MODE.to_string(),
    }
}

fn document_ids(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(ids)) => ids,
        _ => Vec::new(),
    }
}

impl ChatRequest {
    /// Parses and validates a raw request body. An empty body is treated as `{}`.
    pub fn parse(body: &[u8]) -> Result<Self, AppError> {
        let raw: RawChatRequest = if body.iter().all(u8::is_ascii_whitespace) {
            RawChatRequest::default()
        } else {
            serde_json::from_slice(body)
                .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?
        };

        let message = raw
            .message
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::Validation(MISSING_MESSAGE.to_string()))?;

        Ok(ChatRequest {
            message,
            model: model_name(raw.model),
            mode: mode_name(raw.mode),
            document_ids: document_ids(raw.document_ids),
        })
    }
}
