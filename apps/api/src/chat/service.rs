//! Chat routing — runs a validated `ChatRequest` through the selected backend.
//!
//! Flow: select backend →
//!   hosted agent: agent call → agent normalizer
//!   direct completion: moderation → prompt profile → payload → completion → completion normalizer
//!
//! Both backends sit behind traits carried as `Arc<dyn …>`, so tests can swap in doubles.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::chat::backend::BackendTarget;
use crate::chat::normalize::{agent_reply, completion_reply, NormalizedReply};
use crate::chat::payload::CompletionPayload;
use crate::chat::profile::PromptProfile;
use crate::chat::request::ChatRequest;
use crate::errors::UpstreamError;
use crate::llm_client::prompts::MODERATION_REFUSAL;

/// Outcome of a moderation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModerationVerdict {
    pub flagged: bool,
    /// Names of the categories the classifier flagged.
    pub categories: Vec<String>,
}

/// The direct-completion API: moderation plus chat completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict, UpstreamError>;

    /// Returns the raw response document; normalization happens in the service.
    async fn complete(&self, payload: &CompletionPayload<'_>) -> Result<Value, UpstreamError>;
}

/// The hosted agent. Implementations handle their own authentication.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn respond(&self, message: &str) -> Result<Value, UpstreamError>;
}

#[derive(Clone)]
pub struct ChatService {
    completion: Arc<dyn CompletionBackend>,
    agent: Arc<dyn AgentBackend>,
}

impl ChatService {
    pub fn new(completion: Arc<dyn CompletionBackend>, agent: Arc<dyn AgentBackend>) -> Self {
        Self { completion, agent }
    }

    pub async fn reply(&self, request: &ChatRequest) -> Result<NormalizedReply, UpstreamError> {
        let target = BackendTarget::select(&request.model);
        info!(
            backend = target.label(),
            requested_model = %request.model,
            documents = request.document_ids.len(),
            "Routing chat request"
        );

        match target {
            BackendTarget::HostedAgent => {
                let response = self.agent.respond(&request.message).await?;
                Ok(agent_reply(&response))
            }
            BackendTarget::DirectCompletion { model } => {
                self.direct_completion(model, request).await
            }
        }
    }

    async fn direct_completion(
        &self,
        model: &'static str,
        request: &ChatRequest,
    ) -> Result<NormalizedReply, UpstreamError> {
        // Fail closed: a moderation error aborts the request before any generation.
        let verdict = self.completion.moderate(&request.message).await?;
        if verdict.flagged {
            warn!(categories = ?verdict.categories, "Message flagged by moderation");
            return Ok(NormalizedReply::new(MODERATION_REFUSAL));
        }

        let profile = PromptProfile::for_message(&request.mode, &request.message);
        let payload = CompletionPayload::build(model, &profile, &request.message);
        info!(
            model,
            max_tokens = profile.max_tokens,
            temperature = profile.temperature,
            "Calling completion API"
        );

        let response = self.completion.complete(&payload).await?;
        completion_reply(&response)
    }
}
