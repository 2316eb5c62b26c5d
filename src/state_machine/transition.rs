//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! new state and effects; applying the effects is left to the caller.

use super::{ConvContext, ConvState, Effect, Event};
use crate::llm::LlmResponse;
use crate::prompt::build_prompt;
use thiserror::Error;

/// Shown when the service answered but no strategy found usable text
pub const FALLBACK_REPLY: &str = "⚠️ Sorry, I couldn’t generate a reply.";

/// Shown when the generation call failed
pub const FAILURE_REPLY: &str = "⚠️ Sorry, something went wrong.";

/// Reply extraction strategies, tried in order
const REPLY_EXTRACTORS: &[fn(&LlmResponse) -> Option<String>] = &[
    LlmResponse::text,
    LlmResponse::first_part_text,
];

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("Still waiting for the previous reply")]
    AwaitingReply,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Idle + UserMessage -> Sending. The user message is appended before
        // the request effect so the log follows causal order.
        (ConvState::Idle, Event::UserMessage { text }) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyInput);
            }
            let prompt = build_prompt(context.mood, &text);
            Ok(TransitionResult::new(ConvState::Sending {
                prompt: prompt.clone(),
            })
            .with_effect(Effect::user_message(text))
            .with_effect(Effect::RequestLlm { prompt }))
        }

        // One request at a time; no queueing
        (ConvState::Sending { .. }, Event::UserMessage { .. }) => {
            Err(TransitionError::AwaitingReply)
        }

        (ConvState::Sending { .. }, Event::LlmResponse { response }) => {
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::bot_message(extract_reply(&response))))
        }

        (ConvState::Sending { .. }, Event::LlmError { message, error_kind }) => {
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::ReportError {
                    message,
                    error_kind,
                })
                .with_effect(Effect::bot_message(FAILURE_REPLY)))
        }

        (ConvState::Idle, event) => Err(TransitionError::InvalidTransition(format!(
            "{} while idle",
            event.name()
        ))),
    }
}

/// First non-empty text any extraction strategy yields, else the fallback
pub fn extract_reply(response: &LlmResponse) -> String {
    REPLY_EXTRACTORS
        .iter()
        .find_map(|extract| extract(response))
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}
