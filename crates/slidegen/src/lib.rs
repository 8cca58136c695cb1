//! Slidegen Form Library
//!
//! Prompt-to-presentation form controller: validates a prompt, posts it to
//! a generation endpoint and downloads the returned `.pptx` artifact.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure types and logic
//!   - `entities/`: PromptText, GeneratedArtifact, DownloadedFile, HealthStatus
//!   - `value_objects/`: SubmissionState, StatusDisplay, FormEvent
//!   - `errors/`: FormError taxonomy
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `view`: UI binding (FormView)
//!   - `services/`: GenerationService, ArtifactDownloader
//!
//! - **Application** (`application/`): FormController and configuration
//!
//! # Usage
//!
//! ```rust,ignore
//! use slidegen::{ControllerConfig, FormController};
//!
//! let controller = Arc::new(FormController::new(view, client, downloader, ControllerConfig::default()));
//! let events = controller.init().await;
//! controller.run(events).await;
//! ```

pub mod application;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use application::{
    ControllerConfig, EndpointConfig, FormController, SubmitOutcome, DEFAULT_BASE_URL,
};
pub use domain::{
    artifact_file_name, char_count_label, DownloadedFile, EventReceiver, EventSender, FormError,
    FormEvent, GeneratedArtifact, HealthStatus, PromptText, StatusDisplay, SubmissionState,
    SubmitControl, ValidationError, GENERIC_FAILURE_MESSAGE, MIN_PROMPT_CHARS,
};
pub use ports::{ArtifactDownloader, FormView, GenerationService};
