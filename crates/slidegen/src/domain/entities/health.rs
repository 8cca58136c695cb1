//! HealthStatus - Response of the backend health check

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_deref(), Some("healthy") | Some("ok"))
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.status, &self.message) {
            (Some(status), Some(message)) => write!(f, "{} - {}", status, message),
            (Some(status), None) => write!(f, "{}", status),
            (None, Some(message)) => write!(f, "{}", message),
            (None, None) => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_backend_health_body() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "message": "Slide Generator API is running"}"#,
        )
        .unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.to_string(), "healthy - Slide Generator API is running");
    }

    #[test]
    fn test_missing_fields_decode() {
        let health: HealthStatus = serde_json::from_str("{}").unwrap();
        assert!(!health.is_healthy());
        assert_eq!(health.to_string(), "unknown");
    }
}
