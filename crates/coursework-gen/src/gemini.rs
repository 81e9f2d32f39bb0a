//! Google Gemini text generation client.
//!
//! Calls the `generateContent` REST endpoint with a single user prompt and
//! returns the text of the first candidate.

use std::env;
use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::traits::{GenerateError, TextGenerator};

/// Default model to use
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Gemini API
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Checked when [`API_KEY_ENV`] is unset or blank
const FALLBACK_API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

/// Gemini API client.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiClient {
    /// Create a client with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Create a client from the API key stored in `var`.
    ///
    /// When `var` is the default [`API_KEY_ENV`], `GOOGLE_API_KEY` is tried
    /// as well.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Config`] if no key is set.
    pub fn from_env(var: &str) -> Result<Self, GenerateError> {
        resolve_api_key(var, |name| env::var(name).ok())
            .map(Self::new)
            .ok_or_else(|| GenerateError::Config(format!("{var} environment variable not set")))
    }

    /// Set the model name (without the `models/` prefix).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model used for requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Look up the API key in `var`, skipping blank values, then in the
/// fallback variable when `var` is the default one.
fn resolve_api_key(var: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let non_blank = |name: &str| lookup(name).filter(|k| !k.trim().is_empty());

    non_blank(var).or_else(|| {
        (var == API_KEY_ENV)
            .then(|| non_blank(FALLBACK_API_KEY_ENV))
            .flatten()
    })
}

/// Map a non-success response to an API error, keeping Gemini's status name.
fn map_api_error(status: StatusCode, body: &str) -> GenerateError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => {
            let code = error.code.unwrap_or(status.as_u16());
            let name = error
                .status
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            GenerateError::api(
                format!("{code} {name}").trim_end(),
                error.message.unwrap_or_default(),
            )
        }
        Err(_) => GenerateError::api(status.to_string(), body.trim()),
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerateError::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(map_api_error(status, &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            GenerateError::Transport(format!("Failed to parse Gemini response: {e}"))
        })?;

        debug!("Received Gemini response");
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/models/gemini-2.5-flash:generateContent";

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn blank_key_falls_back_to_google_key() {
        let vars = [(API_KEY_ENV, "  "), (FALLBACK_API_KEY_ENV, "google-key")];

        let key = resolve_api_key(API_KEY_ENV, lookup(&vars));

        assert_eq!(key.as_deref(), Some("google-key"));
    }

    #[test]
    fn prefers_primary_key() {
        let vars = [(API_KEY_ENV, "gemini-key"), (FALLBACK_API_KEY_ENV, "google-key")];

        assert_eq!(
            resolve_api_key(API_KEY_ENV, lookup(&vars)).as_deref(),
            Some("gemini-key")
        );
    }

    #[test]
    fn custom_variable_has_no_fallback() {
        let vars = [("COURSE_KEY", ""), (FALLBACK_API_KEY_ENV, "google-key")];

        assert_eq!(resolve_api_key("COURSE_KEY", lookup(&vars)), None);
    }

    #[tokio::test]
    async fn returns_candidate_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(query_param("key", "test-key"))
            .and(body_json(json!({
                "contents": [{ "parts": [{ "text": "Solve it" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "```python\n" }, { "text": "print(1)\n```" }]
                    },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key").with_base_url(server.uri());

        let text = client.generate("Solve it").await.unwrap();

        assert_eq!(text, "```python\nprint(1)\n```");
    }

    #[tokio::test]
    async fn maps_rate_limit_responses() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "code": 429,
                    "message": "Resource has been exhausted (e.g. check quota).",
                    "status": "RESOURCE_EXHAUSTED"
                }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("k").with_base_url(server.uri());

        let err = client.generate("x").await.unwrap_err();

        assert!(err.is_rate_limited());
        match err {
            GenerateError::Api { status, message } => {
                assert_eq!(status.as_deref(), Some("429 RESOURCE_EXHAUSTED"));
                assert!(message.starts_with("Resource has been exhausted"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn maps_plain_server_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
            .mount(&server)
            .await;

        let client = GeminiClient::new("k").with_base_url(server.uri());

        let err = client.generate("x").await.unwrap_err();

        assert!(!err.is_rate_limited());
        assert_eq!(
            err.to_string(),
            "API error (500 Internal Server Error): upstream failure"
        );
    }

    #[tokio::test]
    async fn uses_configured_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new("k")
            .with_model("gemini-1.5-pro")
            .with_base_url(format!("{}/", server.uri()));

        let text = client.generate("x").await.unwrap();

        assert_eq!(text, "");
        assert_eq!(client.model(), "gemini-1.5-pro");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = GeminiClient::new("super-secret");

        let debug = format!("{client:?}");

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("gemini-2.5-flash"));
    }
}
