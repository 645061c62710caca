//! Response Normalizer — reduces backend responses to a single reply string.
//!
//! Hosted-agent responses come in several shapes, so extraction is an ordered list of
//! attempts over the loosely-typed JSON document; the first one that yields text wins.

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::UpstreamError;
use crate::llm_client::prompts::EMPTY_REPLY_FALLBACK;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReply {
    pub text: String,
}

impl NormalizedReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

type Extraction = fn(&Value) -> Option<String>;

const AGENT_EXTRACTIONS: [(&str, Extraction); 3] = [
    ("output_text", top_level_output_text),
    ("output", assistant_output_message),
    ("choices", first_choice_content),
];

/// Direct completion: `choices[0].message.content`, trimmed. A missing path is an upstream fault.
pub fn completion_reply(response: &Value) -> Result<NormalizedReply, UpstreamError> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|content| NormalizedReply::new(content.trim()))
        .ok_or_else(|| {
            UpstreamError::malformed(
                "Completion API",
                "missing choices[0].message.content",
            )
        })
}

/// Hosted agent: never fails; unknown shapes degrade to a fixed apology.
pub fn agent_reply(response: &Value) -> NormalizedReply {
    AGENT_EXTRACTIONS
        .iter()
        .find_map(|(shape, extract)| {
            let text = extract(response)?;
            debug!("Hosted agent reply extracted from '{shape}'");
            Some(NormalizedReply::new(text))
        })
        .unwrap_or_else(|| {
            warn!("Could not extract a reply from the hosted agent response: {response}");
            NormalizedReply::new(EMPTY_REPLY_FALLBACK)
        })
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn top_level_output_text(response: &Value) -> Option<String> {
    response.get("output_text").and_then(non_empty_str)
}

fn assistant_output_message(response: &Value) -> Option<String> {
    response
        .get("output")?
        .as_array()?
        .iter()
        .filter(|item| {
            item.get("type").and_then(Value::as_str) == Some("message")
                && item.get("role").and_then(Value::as_str) == Some("assistant")
        })
        .find_map(|item| match item.get("content") {
            None | Some(Value::Null) => None,
            Some(Value::Array(parts)) => parts
                .iter()
                .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
                .find_map(|part| part.get("text").and_then(non_empty_str)),
            Some(text @ Value::String(_)) => non_empty_str(text),
            Some(other) => Some(other.to_string()),
        })
}

fn first_choice_content(response: &Value) -> Option<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(non_empty_str)
}
