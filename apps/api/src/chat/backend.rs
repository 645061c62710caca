//! Backend Selector — resolves the request's `model` string into a `BackendTarget` once,
//! at the edge of the chat pipeline.

/// The sole dispatch key for the hosted agent. Exact, case-sensitive match.
pub const HOSTED_AGENT_MODEL: &str = "PersonalAssistant";

/// Models accepted by the direct-completion backend.
pub const SUPPORTED_MODELS: [&str; 6] = [
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-5",
    "gpt-4.1-mini",
    "gpt-3.5-turbo",
    "gpt-4.1",
];

/// Substituted for any model name outside `SUPPORTED_MODELS`. Unsupported names never error.
pub const FALLBACK_MODEL: &str = "gpt-5";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendTarget {
    HostedAgent,
    DirectCompletion { model: &'static str },
}

impl BackendTarget {
    pub fn select(model: &str) -> Self {
        if model == HOSTED_AGENT_MODEL {
            BackendTarget::HostedAgent
        } else {
            BackendTarget::DirectCompletion {
                model: normalize_model(model),
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BackendTarget::HostedAgent => "hosted_agent",
            BackendTarget::DirectCompletion { .. } => "direct_completion",
        }
    }
}

/// Maps a requested model name onto the supported set.
///
/// | requested                  | resolved      |
/// |----------------------------|---------------|
/// | any of `SUPPORTED_MODELS`  | itself        |
/// | anything else              | `gpt-5`       |
pub fn normalize_model(requested: &str) -> &'static str {
    SUPPORTED_MODELS
        .iter()
        .copied()
        .find(|m| *m == requested)
        .unwrap_or(FALLBACK_MODEL)
}
