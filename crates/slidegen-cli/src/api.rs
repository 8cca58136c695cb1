//! Slidegen API Client
//!
//! reqwest implementation of the `GenerationService` port.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use slidegen::{EndpointConfig, FormError, GenerationService, HealthStatus, PromptText};

/// API Client for the generation backend
pub struct SlidegenClient {
    client: Client,
    endpoint: EndpointConfig,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<Value>,
}

impl ErrorResponse {
    /// The `error` field as display text, if it is truthy.
    ///
    /// Strings are kept verbatim (whitespace included); `null`, `false`,
    /// `0` and `""` count as absent.
    fn message(self) -> Option<String> {
        match self.error? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) => Some(s),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }
}

impl SlidegenClient {
    /// Create a new API client
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> FormError {
        FormError::transport(&self.endpoint.base_url, err)
    }
}

/// Map a non-2xx body to `Application` (JSON) or `Parse` (anything else)
fn error_from_body(status: u16, body: &[u8]) -> FormError {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(resp) => FormError::application(status, resp.message()),
        Err(e) => FormError::Parse {
            status,
            reason: e.to_string(),
        },
    }
}

#[async_trait]
impl GenerationService for SlidegenClient {
    async fn generate(&self, prompt: &PromptText) -> Result<Vec<u8>, FormError> {
        let url = self.endpoint.generate_url();
        debug!("POST {}", url);

        let resp = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                prompt: prompt.as_str(),
            })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
            return Err(error_from_body(status.as_u16(), &body));
        }

        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(bytes.to_vec())
    }

    async fn health(&self) -> Result<HealthStatus, FormError> {
        let url = self.endpoint.health_url();
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FormError::application(
                status.as_u16(),
                Some(format!("Health check failed ({})", status)),
            ));
        }

        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&body).map_err(|e| FormError::Parse {
            status: status.as_u16(),
            reason: e.to_string(),
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint.base_url
    }
}
