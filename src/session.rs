//! The in-memory session aggregate
//!
//! One `Session` lives for the whole process. It owns the conversation log,
//! the journal, the mood, the shared draft input and the active tab, and
//! routes every conversation change through the pure state machine.

mod journal;
mod message;

pub use journal::{Journal, JournalError};
pub use message::{JournalEntry, Message, Sender};

use crate::llm::{LlmError, LlmResponse};
use crate::state_machine::{transition, ConvContext, ConvState, Effect, Event, Mood, TransitionError};
use crate::store::{JournalStore, KeyValueStore};
use thiserror::Error;

pub const WELCOME_MESSAGE: &str = "👋 Welcome, I am **SAATHI-AI**. How are you feeling today?";

/// Top-level view the input box acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chat,
    Journal,
    Toolkit,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Chat, Tab::Journal, Tab::Toolkit];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Chat => "Chat 💬",
            Tab::Journal => "Journal 📖",
            Tab::Toolkit => "Toolkit 🛠️",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Chat => 0,
            Tab::Journal => 1,
            Tab::Toolkit => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A generation request the caller must issue and later settle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub prompt: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Conversation(#[from] TransitionError),
    #[error(transparent)]
    Journal(#[from] JournalError),
}

impl SessionError {
    /// Blank input is ignored rather than reported
    pub fn is_empty_input(&self) -> bool {
        matches!(
            self,
            SessionError::Conversation(TransitionError::EmptyInput)
                | SessionError::Journal(JournalError::EmptyInput)
        )
    }
}

pub struct Session<S> {
    messages: Vec<Message>,
    journal: Journal<S>,
    context: ConvContext,
    state: ConvState,
    draft: String,
    tab: Tab,
}

impl<S: KeyValueStore> Session<S> {
    /// Create the session: welcome message plus the saved journal
    pub fn new(store: S) -> Self {
        Self {
            messages: vec![Message::new(Sender::Bot, WELCOME_MESSAGE)],
            journal: Journal::load(JournalStore::new(store)),
            context: ConvContext::default(),
            state: ConvState::Idle,
            draft: String::new(),
            tab: Tab::default(),
        }
    }

    // ==================== Accessors ====================

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn journal_entries(&self) -> &[JournalEntry] {
        self.journal.entries()
    }

    pub fn mood(&self) -> Mood {
        self.context.mood
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[allow(dead_code)] // Used in tests
    pub fn state(&self) -> &ConvState {
        &self.state
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.state.is_sending()
    }

    // ==================== View state ====================

    /// Takes effect on the next send only
    pub fn set_mood(&mut self, mood: Mood) {
        if mood != self.context.mood {
            tracing::debug!(
                from = %self.context.mood,
                to = %mood,
                theme = %mood.theme_class(),
                "Mood changed"
            );
        }
        self.context.mood = mood;
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    // ==================== Conversation ====================

    /// Apply an event through the state machine.
    ///
    /// Returns the request to issue when the transition asks for one.
    pub fn handle_event(&mut self, event: Event) -> Result<Option<PendingReply>, TransitionError> {
        let event_name = event.name();
        let result = transition(&self.state, &self.context, event)?;
        tracing::debug!(
            event = event_name,
            from = self.state.name(),
            to = result.new_state.name(),
            "Conversation transition"
        );
        self.state = result.new_state;

        let mut pending = None;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { sender, text } => {
                    self.messages.push(Message::new(sender, text));
                }
                Effect::RequestLlm { prompt } => {
                    pending = Some(PendingReply { prompt });
                }
                Effect::ReportError {
                    message,
                    error_kind,
                } => {
                    tracing::error!(error = %message, kind = %error_kind, "Reply generation failed");
                }
            }
        }
        Ok(pending)
    }

    /// Append the user's message and enter `Sending`
    pub fn begin_send(&mut self, text: &str) -> Result<PendingReply, TransitionError> {
        self.handle_event(Event::UserMessage {
            text: text.to_string(),
        })?
        .ok_or_else(|| TransitionError::InvalidTransition("no request issued".to_string()))
    }

    /// Record the outcome of the request issued by [`Session::begin_send`]
    #[allow(dead_code)] // Used in tests
    pub fn settle(&mut self, outcome: Result<LlmResponse, LlmError>) -> Result<(), TransitionError> {
        self.handle_event(Event::from(outcome)).map(|_| ())
    }

    // ==================== Journal ====================

    pub fn save_entry(&mut self, text: &str) -> Result<(), JournalError> {
        self.journal.save_entry(text).map(|_| ())
    }

    // ==================== Input box ====================

    /// Commit the draft to the active tab: send on chat, save otherwise.
    ///
    /// The draft is cleared once the action commits and kept when it is
    /// rejected.
    pub fn submit_draft(&mut self) -> Result<Option<PendingReply>, SessionError> {
        let text = self.draft.clone();
        let pending = match self.tab {
            Tab::Chat => Some(self.begin_send(&text)?),
            Tab::Journal | Tab::Toolkit => {
                self.save_entry(&text)?;
                None
            }
        };
        self.draft.clear();
        Ok(pending)
    }
}
