//! Conversation and journal records

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// A chat message; immutable once appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    /// May contain Markdown
    pub text: String,
    /// Local wall-clock time, `HH:MM`
    pub time: String,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            time: local_time(),
        }
    }
}

/// A saved journal entry; immutable once appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub text: String,
    pub time: String,
}

impl JournalEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            time: local_time(),
        }
    }
}

/// Current local time as hour:minute
pub fn local_time() -> String {
    Local::now().format("%H:%M").to_string()
}
