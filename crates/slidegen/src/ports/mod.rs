//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the controller
//! interacts with its UI and with external services.
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod services;
pub mod view;

// Re-exports
pub use services::*;
pub use view::*;
