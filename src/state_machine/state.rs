//! Conversation state types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Mood
// ============================================================================

/// Tone setting; drives the UI theme and the next outgoing prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Calm,
    Happy,
    Motivated,
    Reflective,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Calm, Mood::Happy, Mood::Motivated, Mood::Reflective];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Happy => "happy",
            Mood::Motivated => "motivated",
            Mood::Reflective => "reflective",
        }
    }

    /// Display label for the mood picker
    pub fn label(self) -> &'static str {
        match self {
            Mood::Calm => "Calm",
            Mood::Happy => "Happy",
            Mood::Motivated => "Motivated",
            Mood::Reflective => "Reflective",
        }
    }

    /// Quick-pick icon
    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Calm => "😌",
            Mood::Happy => "😃",
            Mood::Motivated => "💪",
            Mood::Reflective => "🤔",
        }
    }

    /// Theme selector, e.g. `mood-calm`
    pub fn theme_class(self) -> String {
        format!("mood-{}", self.as_str())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown mood: {0}")]
pub struct ParseMoodError(pub String);

impl FromStr for Mood {
    type Err = ParseMoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMoodError(s.to_string()))
    }
}

// ============================================================================
// Conversation State
// ============================================================================

/// Conversation state for one send cycle: `Idle -> Sending -> Idle`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Ready for user input, no pending request
    #[default]
    Idle,

    /// Generation request in flight
    Sending {
        /// The prompt that was issued
        prompt: String,
    },
}

impl ConvState {
    pub fn is_sending(&self) -> bool {
        matches!(self, ConvState::Sending { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::Sending { .. } => "sending",
        }
    }
}

/// Settings the transition reads but never changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvContext {
    pub mood: Mood,
}

impl ConvContext {
    #[allow(dead_code)] // Used in tests
    pub fn new(mood: Mood) -> Self {
        Self { mood }
    }
}
