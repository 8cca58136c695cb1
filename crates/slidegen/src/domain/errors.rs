//! Domain Errors
//!
//! Error taxonomy for a single form submission. Every variant maps to
//! exactly one user-visible message via [`FormError::user_message`].

use thiserror::Error;

/// Shown when the server fails without a usable message
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate presentation";

/// Prompt rejected before any request is made
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a prompt for your presentation")]
    Empty,

    #[error("Please provide a more detailed prompt (at least {min_chars} characters)")]
    TooShort { min_chars: usize },
}

/// Submission errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Non-2xx response; `message` is the server's `error` field or the generic fallback
    #[error("Application error ({status}): {message}")]
    Application { status: u16, message: String },

    /// Non-2xx response whose body was not valid JSON
    #[error("Unparsable error body ({status}): {reason}")]
    Parse { status: u16, reason: String },

    #[error("Transport error reaching {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("Download error: {0}")]
    Download(String),
}

impl FormError {
    /// Build an application error, substituting the generic message for a missing or empty one
    pub fn application(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        Self::Application { status, message }
    }

    pub fn transport<E: ToString>(endpoint: impl Into<String>, err: E) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            reason: err.to_string(),
        }
    }

    /// The text displayed in the error region
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(v) => v.to_string(),
            Self::Application { message, .. } => message.clone(),
            Self::Parse { .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            Self::Transport { endpoint, .. } => format!(
                "Cannot connect to server. Please make sure the backend is running at {}.",
                endpoint
            ),
            Self::Download(reason) => format!("Failed to save presentation: {}", reason),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
