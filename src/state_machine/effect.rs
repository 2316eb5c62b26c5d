//! Effects produced by state transitions

use crate::llm::LlmErrorKind;
use crate::session::Sender;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the conversation log
    AppendMessage { sender: Sender, text: String },

    /// Issue a generation request
    RequestLlm { prompt: String },

    /// Record a failed generation call for diagnostics
    ReportError {
        message: String,
        error_kind: LlmErrorKind,
    },
}

impl Effect {
    pub fn user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}
