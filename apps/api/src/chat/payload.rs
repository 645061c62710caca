//! Payload Adapter — builds the chat-completions request body for a normalized model.

use serde::Serialize;

use crate::chat::profile::PromptProfile;

/// Model-name prefixes whose API rejects `max_tokens` and expects `max_completion_tokens`.
const COMPLETION_TOKEN_PREFIXES: [&str; 2] = ["gpt-4o", "gpt-4.1"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenLimit {
    #[serde(rename = "max_completion_tokens")]
    MaxCompletionTokens(u32),
    #[serde(rename = "max_tokens")]
    MaxTokens(u32),
}

impl TokenLimit {
    /// Chooses the parameter name by prefix of the normalized model name.
    pub fn for_model(model: &str, limit: u32) -> Self {
        if COMPLETION_TOKEN_PREFIXES
            .iter()
            .any(|prefix| model.starts_with(prefix))
        {
            TokenLimit::MaxCompletionTokens(limit)
        } else {
            TokenLimit::MaxTokens(limit)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionPayload<'a> {
    pub model: &'static str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f64,
    #[serde(flatten)]
    pub token_limit: TokenLimit,
}

impl<'a> CompletionPayload<'a> {
    pub fn build(model: &'static str, profile: &PromptProfile, message: &'a str) -> Self {
        CompletionPayload {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: profile.system_message,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: profile.temperature,
            token_limit: TokenLimit::for_model(model, profile.max_tokens),
        }
    }
}
