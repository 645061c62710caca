//! LLM Client — the single point of entry for the chat-completions API.
//!
//! Covers the two calls the direct-completion path makes: moderation and chat completion.
//! Every call is a single attempt; failures surface to the caller as `UpstreamError`.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::chat::payload::CompletionPayload;
use crate::chat::service::{CompletionBackend, ModerationVerdict};
use crate::errors::UpstreamError;

pub mod prompts;

const MODERATION_SERVICE: &str = "Moderation API";
const COMPLETION_SERVICE: &str = "Completion API";

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationResult {
    flagged: bool,
    #[serde(default)]
    categories: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Wraps the moderation and chat-completions endpoints behind one API key.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(client: Client, base_url: &Url, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn post_json(
        &self,
        service: &'static str,
        path: &str,
        body: &(impl serde::Serialize + Sync),
    ) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(service, e))?;

        let response = ensure_success(service, response).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::from_reqwest(service, e))
    }
}

/// Passes successful responses through; otherwise reads the body and reports status + message.
async fn ensure_success(
    service: &'static str,
    response: Response,
) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    // Prefer the API's own error message when the body is the standard error envelope
    let body = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(UpstreamError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict, UpstreamError> {
        let value = self
            .post_json(MODERATION_SERVICE, "moderations", &json!({ "input": input }))
            .await?;

        let response: ModerationResponse = serde_json::from_value(value)
            .map_err(|e| UpstreamError::malformed(MODERATION_SERVICE, e.to_string()))?;
        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::malformed(MODERATION_SERVICE, "empty results"))?;

        let categories = result
            .categories
            .into_iter()
            .filter(|(_, flagged)| flagged.as_bool() == Some(true))
            .map(|(name, _)| name)
            .collect();

        Ok(ModerationVerdict {
            flagged: result.flagged,
            categories,
        })
    }

    async fn complete(&self, payload: &CompletionPayload<'_>) -> Result<Value, UpstreamError> {
        let response = self
            .post_json(COMPLETION_SERVICE, "chat/completions", payload)
            .await?;

        if let Some(usage) = response.get("usage") {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage["prompt_tokens"], usage["completion_tokens"]
            );
        }
        Ok(response)
    }
}
