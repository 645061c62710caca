//! Prompt Builder — picks the system prompt and generation parameters from
//! `(mode, is_doc_query)`.

use crate::llm_client::prompts::{
    CODE_DOCUMENT_SYSTEM, CODE_SYSTEM, GENERAL_DOCUMENT_SYSTEM, GENERAL_SYSTEM,
};

/// Marker injected by the UI ahead of uploaded-document excerpts.
pub const DOCUMENT_CONTEXT_MARKER: &str = "Context from uploaded documents:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    General,
    Code,
}

impl Mode {
    /// `"code"` selects `Code`; every other value, including unknown ones, is `General`.
    pub fn from_request(mode: &str) -> Self {
        if mode == "code" {
            Mode::Code
        } else {
            Mode::General
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptProfile {
    pub system_message: &'static str,
    pub max_tokens: u32,
    pub temperature: f64,
}

pub fn is_doc_query(message: &str) -> bool {
    message.contains(DOCUMENT_CONTEXT_MARKER)
}

impl PromptProfile {
    pub fn select(mode: Mode, is_doc_query: bool) -> Self {
        match (mode, is_doc_query) {
            (Mode::General, false) => PromptProfile {
                system_message: GENERAL_SYSTEM,
                max_tokens: 700,
                temperature: 0.3,
            },
            (Mode::Code, false) => PromptProfile {
                system_message: CODE_SYSTEM,
                max_tokens: 700,
                temperature: 0.3,
            },
            (Mode::General, true) => PromptProfile {
                system_message: GENERAL_DOCUMENT_SYSTEM,
                max_tokens: 2000,
                temperature: 0.5,
            },
            (Mode::Code, true) => PromptProfile {
                system_message: CODE_DOCUMENT_SYSTEM,
                max_tokens: 2000,
                temperature: 0.35,
            },
        }
    }

    /// Convenience for the pipeline: derives both inputs from the raw request fields.
    pub fn for_message(mode: &str, message: &str) -> Self {
        Self::select(Mode::from_request(mode), is_doc_query(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table() {
        let cases = [
            (Mode::General, false, GENERAL_SYSTEM, 700, 0.3),
            (Mode::Code, false, CODE_SYSTEM, 700, 0.3),
            (Mode::General, true, GENERAL_DOCUMENT_SYSTEM, 2000, 0.5),
            (Mode::Code, true, CODE_DOCUMENT_SYSTEM, 2000, 0.35),
        ];
        for (mode, doc, system, max_tokens, temperature) in cases {
            let profile = PromptProfile::select(mode, doc);
            assert_eq!(profile.system_message, system, "{mode:?}/{doc}");
            assert_eq!(profile.max_tokens, max_tokens, "{mode:?}/{doc}");
            assert_eq!(profile.temperature, temperature, "{mode:?}/{doc}");
        }
    }

    #[test]
    fn test_unknown_mode_defaults_to_general() {
        assert_eq!(Mode::from_request("creative"), Mode::General);
        assert_eq!(Mode::from_request("Code"), Mode::General);
        assert_eq!(Mode::from_request(""), Mode::General);
        assert_eq!(Mode::from_request("code"), Mode::Code);
    }

    #[test]
    fn test_doc_query_marker_is_substring_match() {
        assert!(is_doc_query(
            "Context from uploaded documents:\n--- resume.pdf ---\nRust, Go\n\nSummarize"
        ));
        assert!(is_doc_query("prefix Context from uploaded documents: suffix"));
        assert!(!is_doc_query("context from uploaded documents:"));
        assert!(!is_doc_query("Summarize my resume"));
    }

    #[test]
    fn test_code_request_without_documents() {
        let profile = PromptProfile::for_message("code", "Write a function to reverse a string");
        assert_eq!(profile.max_tokens, 700);
        assert_eq!(profile.temperature, 0.3);
        assert_eq!(profile.system_message, CODE_SYSTEM);
    }

    #[test]
    fn test_general_document_request() {
        let profile =
            PromptProfile::for_message("general", "Context from uploaded documents: ...\nSummarize");
        assert_eq!(profile.max_tokens, 2000);
        assert_eq!(profile.temperature, 0.5);
        assert_eq!(profile.system_message, GENERAL_DOCUMENT_SYSTEM);
    }
}
