//! Trait definitions for text generators.

use async_trait::async_trait;

/// Errors returned by a text generator or the retry wrapper around it.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("API error ({}): {message}", .status.as_deref().unwrap_or("no status"))]
    Api {
        status: Option<String>,
        message: String,
    },

    #[error("Empty response from API")]
    EmptyResponse,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Max retries reached after {attempts} rate-limited attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GenerateError {
    /// Build an API error from a status and message.
    pub fn api(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status: Some(status.into()),
            message: message.into(),
        }
    }

    /// Check whether this is a rate-limit error.
    ///
    /// An API error counts as rate limiting when its status or message
    /// mentions `429`.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api { status, message } => {
                message.contains("429") || status.as_deref().is_some_and(|s| s.contains("429"))
            }
            _ => false,
        }
    }
}

/// Something that turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generator identifier used in log lines (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Send one prompt and return the generated text.
    ///
    /// The text may be empty; callers decide how to treat that.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_rate_limits() {
        assert!(GenerateError::api("429 RESOURCE_EXHAUSTED", "quota").is_rate_limited());
        assert!(GenerateError::Api {
            status: None,
            message: "HTTP 429: slow down".to_string(),
        }
        .is_rate_limited());

        assert!(!GenerateError::api("500 INTERNAL", "boom").is_rate_limited());
        assert!(!GenerateError::Transport("429".to_string()).is_rate_limited());
        assert!(!GenerateError::EmptyResponse.is_rate_limited());
    }

    #[test]
    fn formats_api_errors() {
        let err = GenerateError::api("404 NOT_FOUND", "model missing");
        assert_eq!(err.to_string(), "API error (404 NOT_FOUND): model missing");

        let err = GenerateError::Api {
            status: None,
            message: "odd".to_string(),
        };
        assert_eq!(err.to_string(), "API error (no status): odd");
    }
}
