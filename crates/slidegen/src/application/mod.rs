//! Application Layer
//!
//! The form controller and its configuration.

mod config;
mod controller;

pub use config::*;
pub use controller::*;
