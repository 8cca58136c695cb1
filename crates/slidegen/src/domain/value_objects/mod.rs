//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod form_event;
mod submission_state;

pub use form_event::*;
pub use submission_state::*;
