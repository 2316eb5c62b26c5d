//! Events that can occur in a conversation

use crate::llm::{LlmErrorKind, LlmResponse};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserMessage { text: String },

    // LLM events
    LlmResponse { response: LlmResponse },
    LlmError {
        message: String,
        error_kind: LlmErrorKind,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserMessage { .. } => "user_message",
            Event::LlmResponse { .. } => "llm_response",
            Event::LlmError { .. } => "llm_error",
        }
    }
}

impl From<Result<LlmResponse, crate::llm::LlmError>> for Event {
    fn from(outcome: Result<LlmResponse, crate::llm::LlmError>) -> Self {
        match outcome {
            Ok(response) => Event::LlmResponse { response },
            Err(e) => Event::LlmError {
                message: e.message,
                error_kind: e.kind,
            },
        }
    }
}
