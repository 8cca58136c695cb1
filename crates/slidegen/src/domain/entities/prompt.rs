//! PromptText - Validated user prompt

use serde::Serialize;

use crate::domain::errors::ValidationError;

/// Minimum trimmed length accepted for submission
pub const MIN_PROMPT_CHARS: usize = 10;

/// A trimmed prompt that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PromptText(String);

impl PromptText {
    /// Validate raw input against the default minimum length
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::parse_with_min(raw, MIN_PROMPT_CHARS)
    }

    /// Validate raw input; length is counted in chars after trimming
    pub fn parse_with_min(raw: &str, min_chars: usize) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }
        if trimmed.chars().count() < min_chars {
            return Err(ValidationError::TooShort { min_chars });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Live character count label for raw (untrimmed) input
pub fn char_count_label(text: &str) -> String {
    format!("{} characters", text.chars().count())
}
