//! Generation Service Port
//!
//! Abstract interface for the remote generation endpoint.

use async_trait::async_trait;

use crate::domain::entities::{HealthStatus, PromptText};
use crate::domain::errors::FormError;

/// Service interface for prompt-to-presentation generation
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// POST the prompt and return the raw artifact bytes on 2xx.
    ///
    /// Non-2xx maps to `Application` or `Parse`, connectivity
    /// failures to `Transport`.
    async fn generate(&self, prompt: &PromptText) -> Result<Vec<u8>, FormError>;

    /// Best-effort connectivity check
    async fn health(&self) -> Result<HealthStatus, FormError>;

    /// Base address shown in connectivity messages
    fn endpoint(&self) -> &str;
}
