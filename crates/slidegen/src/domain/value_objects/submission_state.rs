//! SubmissionState - Lifecycle of one form submission, and its rendering

use serde::Serialize;

pub const SUBMIT_LABEL: &str = "Generate Presentation";
pub const SUBMIT_LABEL_LOADING: &str = "Generating...";

/// Exactly one of these is active at a time.
///
/// `Idle -> Loading -> {Success, Error} -> Idle`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Submit button appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: &'static str,
}

/// What the view should show for a given state.
///
/// The three regions are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    pub status_visible: bool,
    pub success_visible: bool,
    pub error_visible: bool,
    pub error_message: Option<String>,
    pub submit: SubmitControl,
}

impl StatusDisplay {
    pub fn render(state: &SubmissionState) -> Self {
        let submit = SubmitControl {
            enabled: !state.is_loading(),
            label: if state.is_loading() {
                SUBMIT_LABEL_LOADING
            } else {
                SUBMIT_LABEL
            },
        };

        Self {
            status_visible: matches!(state, SubmissionState::Loading),
            success_visible: matches!(state, SubmissionState::Success),
            error_visible: matches!(state, SubmissionState::Error(_)),
            error_message: state.error_message().map(str::to_string),
            submit,
        }
    }

    pub fn visible_regions(&self) -> usize {
        [self.status_visible, self.success_visible, self.error_visible]
            .iter()
            .filter(|v| **v)
            .count()
    }
}
