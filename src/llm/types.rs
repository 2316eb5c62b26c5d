//! Common types for LLM interactions

/// Finish reasons for which the generated text must not be shown as-is
pub(crate) const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

/// LLM response, normalized from the provider wire format
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmResponse {
    pub candidates: Vec<Candidate>,
    pub usage: Usage,
}

/// One generated candidate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    /// Text parts in order; non-text parts are dropped during normalization
    pub parts: Vec<String>,
    pub finish_reason: Option<String>,
}

impl Candidate {
    pub fn is_blocked(&self) -> bool {
        self.finish_reason
            .as_deref()
            .is_some_and(|reason| BLOCKED_FINISH_REASONS.contains(&reason))
    }
}

impl LlmResponse {
    /// Response with a single candidate holding one text part
    #[allow(dead_code)] // Used in tests
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                parts: vec![text.into()],
                finish_reason: Some("STOP".to_string()),
            }],
            usage: Usage::default(),
        }
    }

    /// All candidates, or `None` when the first one was blocked.
    ///
    /// A blocked first candidate makes the whole response unusable; later
    /// candidates are not shown in its place.
    fn usable_candidates(&self) -> Option<&[Candidate]> {
        let first = self.candidates.first()?;
        if first.is_blocked() {
            None
        } else {
            Some(&self.candidates)
        }
    }

    /// Primary accessor: all text parts of the first candidate, joined.
    ///
    /// Returns `None` when there is no candidate, when the candidate was
    /// stopped for a blocked reason, or when the joined text is blank.
    pub fn text(&self) -> Option<String> {
        let candidate = self.usable_candidates()?.first()?;
        let text = candidate.parts.concat();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Secondary accessor: the first non-blank part of any unblocked
    /// candidate
    pub fn first_part_text(&self) -> Option<String> {
        self.usable_candidates()?
            .iter()
            .filter(|candidate| !candidate.is_blocked())
            .flat_map(|candidate| candidate.parts.iter())
            .find(|text| !text.trim().is_empty())
            .cloned()
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
