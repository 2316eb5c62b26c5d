//! Prompt construction for companion replies
//!
//! Every outgoing prompt is the tone instruction for the current mood
//! followed by the user's text, verbatim.

use crate::state_machine::Mood;

/// Asks the model to emphasize the important parts of its reply
const EMPHASIS_INSTRUCTION: &str = "Always highlight important parts using **bold text**.";

/// Build the prompt sent to the generation service
pub fn build_prompt(mood: Mood, user_text: &str) -> String {
    format!(
        "Respond in a {mood} and supportive tone.\n{EMPHASIS_INSTRUCTION}\nUser says: {user_text}"
    )
}
