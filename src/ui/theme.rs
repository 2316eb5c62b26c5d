//! Mood-driven color themes

use crate::state_machine::Mood;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub user: Color,
    pub bot: Color,
}

impl Theme {
    pub fn for_mood(mood: Mood) -> Self {
        match mood {
            Mood::Calm => Self {
                accent: Color::Cyan,
                user: Color::LightCyan,
                bot: Color::White,
            },
            Mood::Happy => Self {
                accent: Color::Yellow,
                user: Color::LightYellow,
                bot: Color::White,
            },
            Mood::Motivated => Self {
                accent: Color::LightRed,
                user: Color::LightRed,
                bot: Color::White,
            },
            Mood::Reflective => Self {
                accent: Color::Magenta,
                user: Color::LightMagenta,
                bot: Color::Gray,
            },
        }
    }
}
