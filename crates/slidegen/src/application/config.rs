//! Controller and endpoint configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::entities::MIN_PROMPT_CHARS;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5009";

/// Tunables for [`FormController`](super::FormController)
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Minimum trimmed prompt length
    pub min_prompt_chars: usize,
    /// How long `Success` stays up before reverting to `Idle`
    pub success_display: Duration,
    /// Cap for the auto-sized input area
    pub max_input_height: u32,
    /// Run the health check during `init`
    pub check_health_on_init: bool,
    /// Ask the view whether to reset after a successful generation
    pub offer_reset_after_success: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_prompt_chars: MIN_PROMPT_CHARS,
            success_display: Duration::from_secs(5),
            max_input_height: 400,
            check_health_on_init: true,
            offer_reset_after_success: false,
        }
    }
}

impl ControllerConfig {
    pub fn with_success_display(mut self, delay: Duration) -> Self {
        self.success_display = delay;
        self
    }

    pub fn with_max_input_height(mut self, height: u32) -> Self {
        self.max_input_height = height;
        self
    }

    pub fn with_health_check(mut self, enable: bool) -> Self {
        self.check_health_on_init = enable;
        self
    }

    pub fn with_reset_offer(mut self, enable: bool) -> Self {
        self.offer_reset_after_success = enable;
        self
    }
}

/// Where the generation backend lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
    #[serde(default = "default_generate_path")]
    pub generate_path: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

fn default_generate_path() -> String {
    "/generate".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            generate_path: default_generate_path(),
            health_path: default_health_path(),
        }
    }

    pub fn generate_url(&self) -> String {
        join_url(&self.base_url, &self.generate_path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
