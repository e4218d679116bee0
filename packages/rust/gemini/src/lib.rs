//! Gemini `generateContent` client for CaseScout.
//!
//! One client instance is constructed at startup and injected into every
//! stage that consults the model. A missing API key yields an explicit
//! *unavailable* client rather than an error or a nullable handle: callers
//! check [`GeminiClient::is_available`] to pick their degraded path, and
//! any `generate` call on an unavailable client fails with the recorded
//! reason.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use casescout_shared::{CaseScoutError, GeminiConfig, Result};

/// User agent sent with API requests.
const USER_AGENT: &str = concat!("CaseScout/", env!("CARGO_PKG_VERSION"));

/// Max response-body characters echoed into an error message.
const ERROR_SNIPPET_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Wire types (generateContent request/response)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Whether the client can issue requests.
#[derive(Clone)]
enum Mode {
    /// Key present; requests go out.
    Ready { api_key: String },
    /// No usable key; every call fails with this reason.
    Unavailable { reason: String },
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    timeout: Duration,
    mode: Mode,
}

impl GeminiClient {
    /// Build a client from config, reading the API key from the configured
    /// environment variable. Never fails: a missing or empty key produces
    /// an unavailable client.
    pub fn from_config(config: &GeminiConfig) -> Self {
        let mode = match std::env::var(&config.api_key_env) {
            Ok(key) if !key.is_empty() => Mode::Ready { api_key: key },
            _ => Mode::Unavailable {
                reason: format!("{} environment variable is not set", config.api_key_env),
            },
        };
        Self::build(config, mode)
    }

    /// Build a client with an explicit API key (embedding callers, tests).
    pub fn with_api_key(config: &GeminiConfig, api_key: impl Into<String>) -> Self {
        Self::build(
            config,
            Mode::Ready {
                api_key: api_key.into(),
            },
        )
    }

    /// Build a client that refuses every call with the given reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::build(
            &GeminiConfig::default(),
            Mode::Unavailable {
                reason: reason.into(),
            },
        )
    }

    fn build(config: &GeminiConfig, mode: Mode) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            mode,
        }
    }

    /// Whether `generate` has any chance of succeeding.
    pub fn is_available(&self) -> bool {
        matches!(self.mode, Mode::Ready { .. })
    }

    /// Why the client is unavailable, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.mode {
            Mode::Unavailable { reason } => Some(reason),
            Mode::Ready { .. } => None,
        }
    }

    /// Model identifier this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the reply text.
    ///
    /// Fails on an unavailable client, transport errors, non-2xx status,
    /// or a reply with no text in its first candidate.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = match &self.mode {
            Mode::Ready { api_key } => api_key,
            Mode::Unavailable { reason } => {
                return Err(CaseScoutError::Model(format!("client unavailable: {reason}")));
            }
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending generate request");

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| CaseScoutError::Model(format!("client build: {e}")))?;

        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CaseScoutError::Model(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let snippet: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(ERROR_SNIPPET_LEN)
                .collect();
            return Err(CaseScoutError::Model(format!("HTTP {status}: {snippet}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CaseScoutError::Model(format!("response decode: {e}")))?;

        extract_text(&parsed)
    }
}

impl std::fmt::Debug for GeminiClient {
    // Manual impl so the API key never lands in logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("available", &self.is_available())
            .finish()
    }
}

/// Pull the first candidate's text out of a decoded response.
fn extract_text(response: &GenerateResponse) -> Result<String> {
    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(CaseScoutError::Model("response contained no text".into()));
    }
    Ok(text)
}
