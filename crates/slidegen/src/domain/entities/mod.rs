//! Domain Entities
//!
//! Transient, single-submission models:
//! - PromptText: validated user prompt
//! - GeneratedArtifact: binary payload + file name
//! - DownloadedFile: receipt of a saved artifact
//! - HealthStatus: backend health check body

mod artifact;
mod health;
mod prompt;

pub use artifact::*;
pub use health::*;
pub use prompt::*;
