//! Form View Port
//!
//! The UI collaborator the controller reads from and writes to.
//! A browser page, a terminal, or a test double.

use crate::domain::value_objects::{EventSender, StatusDisplay};

pub trait FormView: Send + Sync {
    /// Register the controller's event channel. The view pushes
    /// `FormEvent`s into it for input, submit, reset and close.
    fn bind(&self, events: EventSender);

    /// Show the status/success/error regions and submit control
    fn render(&self, display: &StatusDisplay);

    fn set_char_count(&self, label: &str);

    /// Natural height of the current prompt content
    fn content_height(&self) -> u32;

    fn set_input_height(&self, height: Option<u32>);

    fn set_prompt(&self, text: &str);

    fn focus_prompt(&self);

    /// Transient visual feedback after a reset. Non-functional.
    fn pulse_prompt(&self) {}

    /// A submit arrived while a generation was in flight and was ignored
    fn show_busy(&self) {}

    /// Ask whether to start over after a successful generation
    fn confirm_new_submission(&self) -> bool {
        false
    }
}
