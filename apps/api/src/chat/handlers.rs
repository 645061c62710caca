//! Axum route handler for the chat proxy.

use axum::{
    extract::{rejection::BytesRejection, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::chat::request::ChatRequest;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// POST /chat
///
/// The body is parsed by hand so malformed JSON gets the same JSON error envelope as a
/// missing message. Validation failures return before any backend is contacted.
pub async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let request = ChatRequest::parse(&body?)?;

    let span = info_span!("chat", request_id = %Uuid::new_v4());
    let reply = state.chat.reply(&request).instrument(span).await?;

    Ok(Json(ChatResponse {
        response: reply.text,
    }))
}
