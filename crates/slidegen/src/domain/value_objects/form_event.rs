//! FormEvent - User actions delivered by a bound view

use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Prompt text changed (full current text)
    InputChanged(String),
    /// Submit pressed with the current prompt text
    Submit(String),
    /// Reset pressed
    Clear,
    /// View closed; ends the event loop
    Close,
}

/// Channel end handed to the view on bind
pub type EventSender = mpsc::UnboundedSender<FormEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<FormEvent>;
