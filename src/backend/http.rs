//! HTTP implementation of the `Backend` contract.
//!
//! Thin `reqwest` wrapper. Each call carries its own timeout, after which it
//! is abandoned and reported as `Unavailable`. Response interpretation lives
//! in pure functions (`extract_token`, `rejection_message`) for testability.

use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::Backend;
use super::types::{BackendError, Brief, GenerationResult, HistoryEntry, parse_history};
use crate::config::BackendTimeouts;

/// Token field names accepted in a login response, in precedence order.
pub const TOKEN_FIELDS: [&str; 3] = ["token", "access_token", "detail"];

/// Raw bodies quoted in error messages are cut to this many characters.
pub const ERROR_BODY_LIMIT: usize = 200;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    timeouts: BackendTimeouts,
}

impl HttpBackend {
    /// Build a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: BackendTimeouts) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeouts.health())
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), timeouts })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and return `(status, content-type, body)`.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String, String), BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        debug!(status, content_type = %content_type, bytes = body.len(), "backend response");
        Ok((status, content_type, body))
    }
}

fn with_bearer(request: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
    match token {
        Some(token) if !token.is_empty() => request.bearer_auth(token),
        _ => request,
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn health(&self) -> bool {
        let request = self
            .http
            .get(self.url("/health"))
            .timeout(self.timeouts.health());
        match self.send(request).await {
            Ok((200, _, _)) => true,
            Ok((status, _, _)) => {
                warn!(status, base_url = %self.base_url, "backend health check not ready");
                false
            }
            Err(e) => {
                warn!(error = %e, base_url = %self.base_url, "backend health check failed");
                false
            }
        }
    }

    async fn signup(&self, email: &str, password: &str) -> Result<(), BackendError> {
        let request = self
            .http
            .post(self.url("/signup"))
            .json(&json!({ "email": email, "password": password }))
            .timeout(self.timeouts.request());
        let (status, content_type, body) = self.send(request).await?;
        match status {
            200 | 201 => Ok(()),
            _ => Err(BackendError::Rejected { status, message: rejection_message(&content_type, &body) }),
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, BackendError> {
        let request = self
            .http
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .timeout(self.timeouts.request());
        let (status, content_type, body) = self.send(request).await?;
        if status != 200 {
            return Err(BackendError::Rejected { status, message: rejection_message(&content_type, &body) });
        }
        let value: Value = serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))?;
        extract_token(&value).ok_or(BackendError::MissingToken)
    }

    async fn generate(&self, token: Option<&str>, brief: &Brief) -> Result<GenerationResult, BackendError> {
        let request = self
            .http
            .post(self.url("/generate"))
            .json(brief)
            .timeout(self.timeouts.generate());
        let (status, content_type, body) = self.send(with_bearer(request, token)).await?;
        if !(200..300).contains(&status) {
            return Err(BackendError::Rejected { status, message: rejection_message(&content_type, &body) });
        }
        let value: Value = serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))?;
        GenerationResult::from_value(value)
    }

    async fn history(&self, token: Option<&str>) -> Result<Vec<HistoryEntry>, BackendError> {
        let request = self
            .http
            .get(self.url("/history"))
            .timeout(self.timeouts.request());
        let (status, content_type, body) = self.send(with_bearer(request, token)).await?;
        if !(200..300).contains(&status) {
            return Err(BackendError::Rejected { status, message: rejection_message(&content_type, &body) });
        }
        parse_history(&body)
    }
}

// =============================================================================
// RESPONSE INTERPRETATION
// =============================================================================

/// Pick the bearer token out of a login response.
///
/// The service has shipped the token under several names; the first
/// non-empty string among `TOKEN_FIELDS` wins.
#[must_use]
pub fn extract_token(value: &Value) -> Option<String> {
    TOKEN_FIELDS.iter().find_map(|field| {
        value
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

/// Human-readable reason for a rejected request.
///
/// Uses the conventional `detail` field when the body is structured, and
/// falls back to the raw body cut to `ERROR_BODY_LIMIT` characters.
#[must_use]
pub fn rejection_message(content_type: &str, body: &str) -> String {
    if content_type.starts_with("application/") {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            match value.get("detail") {
                Some(Value::String(detail)) => return detail.clone(),
                Some(Value::Null) | None => {}
                Some(other) => return other.to_string(),
            }
        }
    }
    truncate_chars(body, ERROR_BODY_LIMIT)
}

/// First `limit` characters of `text`, never splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_owned(),
        None => text.to_owned(),
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
