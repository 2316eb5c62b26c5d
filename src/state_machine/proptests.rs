//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::llm::{Candidate, LlmErrorKind, LlmResponse, Usage};
use crate::session::Sender;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_mood() -> impl Strategy<Value = Mood> {
    prop_oneof![
        Just(Mood::Calm),
        Just(Mood::Happy),
        Just(Mood::Motivated),
        Just(Mood::Reflective),
    ]
}

fn arb_error_kind() -> impl Strategy<Value = LlmErrorKind> {
    prop_oneof![
        Just(LlmErrorKind::Network),
        Just(LlmErrorKind::RateLimit),
        Just(LlmErrorKind::ServerError),
        Just(LlmErrorKind::Auth),
        Just(LlmErrorKind::InvalidRequest),
        Just(LlmErrorKind::Unknown),
    ]
}

fn arb_finish_reason() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("STOP".to_string())),
        Just(Some("MAX_TOKENS".to_string())),
        Just(Some("SAFETY".to_string())),
    ]
}

/// Responses of any shape, including empty and blocked ones
fn arb_response() -> impl Strategy<Value = LlmResponse> {
    let candidate = (
        proptest::collection::vec("[a-zA-Z *]{0,20}", 0..3),
        arb_finish_reason(),
    )
        .prop_map(|(parts, finish_reason)| Candidate {
            parts,
            finish_reason,
        });
    proptest::collection::vec(candidate, 0..3).prop_map(|candidates| LlmResponse {
        candidates,
        usage: Usage::default(),
    })
}

fn arb_settle_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_response().prop_map(|response| Event::LlmResponse { response }),
        ("[a-zA-Z ]{1,30}", arb_error_kind()).prop_map(|(message, error_kind)| Event::LlmError {
            message,
            error_kind
        }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z ]{0,30}".prop_map(|text| Event::UserMessage { text }),
        arb_settle_event(),
    ]
}

fn sending() -> ConvState {
    ConvState::Sending {
        prompt: "Respond in a calm and supportive tone.".to_string(),
    }
}

fn appended(effects: &[Effect], sender: Sender) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::AppendMessage { sender: s, .. } if *s == sender))
        .count()
}

fn requests(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::RequestLlm { .. }))
        .count()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_idle_accepts_non_blank_messages(
        text in "[a-zA-Z ]{0,10}[a-zA-Z][a-zA-Z ]{0,10}",
        mood in arb_mood()
    ) {
        let result = transition(
            &ConvState::Idle,
            &ConvContext::new(mood),
            Event::UserMessage { text: text.clone() },
        ).unwrap();

        prop_assert!(result.new_state.is_sending());
        prop_assert_eq!(appended(&result.effects, Sender::User), 1);
        prop_assert_eq!(appended(&result.effects, Sender::Bot), 0);
        prop_assert_eq!(requests(&result.effects), 1);
        prop_assert_eq!(&result.effects[0], &Effect::user_message(text.clone()));

        match &result.effects[1] {
            Effect::RequestLlm { prompt } => {
                prop_assert!(prompt.contains(mood.as_str()));
                let expected_suffix = format!("User says: {text}");
                prop_assert!(prompt.ends_with(&expected_suffix));
            }
            other => prop_assert!(false, "Expected RequestLlm, got {:?}", other),
        }
    }

    #[test]
    fn prop_blank_messages_rejected(text in "[ \t\n]{0,10}", mood in arb_mood()) {
        let result = transition(
            &ConvState::Idle,
            &ConvContext::new(mood),
            Event::UserMessage { text },
        );
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyInput);
    }

    #[test]
    fn prop_sending_rejects_messages(text in "[a-zA-Z ]{0,30}") {
        let result = transition(
            &sending(),
            &ConvContext::default(),
            Event::UserMessage { text },
        );
        prop_assert_eq!(result.unwrap_err(), TransitionError::AwaitingReply);
    }

    /// Every settled request appends exactly one non-empty bot message
    #[test]
    fn prop_settle_appends_one_bot_message(event in arb_settle_event()) {
        let result = transition(&sending(), &ConvContext::default(), event).unwrap();

        prop_assert_eq!(&result.new_state, &ConvState::Idle);
        prop_assert_eq!(appended(&result.effects, Sender::Bot), 1);
        prop_assert_eq!(appended(&result.effects, Sender::User), 0);
        prop_assert_eq!(requests(&result.effects), 0);

        for effect in &result.effects {
            if let Effect::AppendMessage { text, .. } = effect {
                prop_assert!(!text.trim().is_empty());
            }
        }
    }

    #[test]
    fn prop_idle_ignores_settle_events(event in arb_settle_event()) {
        let result = transition(&ConvState::Idle, &ConvContext::default(), event);
        prop_assert!(matches!(result, Err(TransitionError::InvalidTransition(_))));
    }

    /// Applying effects over any event sequence keeps the log consistent:
    /// user and bot messages alternate, and at most one request is open.
    #[test]
    fn prop_log_alternates(
        events in proptest::collection::vec(arb_event(), 0..30),
        mood in arb_mood()
    ) {
        let ctx = ConvContext::new(mood);
        let mut state = ConvState::Idle;
        let mut log: Vec<Sender> = Vec::new();

        for event in events {
            let Ok(result) = transition(&state, &ctx, event) else {
                continue;
            };
            prop_assert!(requests(&result.effects) <= 1);
            for effect in &result.effects {
                if let Effect::AppendMessage { sender, .. } = effect {
                    log.push(*sender);
                }
            }
            state = result.new_state;
        }

        for (i, sender) in log.iter().enumerate() {
            let expected = if i % 2 == 0 { Sender::User } else { Sender::Bot };
            prop_assert_eq!(*sender, expected);
        }
        prop_assert_eq!(state.is_sending(), log.len() % 2 == 1);
    }
}
