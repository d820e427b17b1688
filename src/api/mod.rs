//! HTTP client for the pipeline API.
//!
//! Every tool invocation turns into exactly one authenticated request
//! against the backend: the internal service key is attached to all
//! requests, and the session's user identity (when known) rides along
//! in a second header.  Responses come back as opaque JSON; failures
//! map onto [`ApiError`] without retries.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::session::SessionHandle;

/// Header carrying the static service-to-service secret.
pub const INTERNAL_KEY_HEADER: &str = "X-Internal-Key";

/// Header carrying the acting user's identifier.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Total deadline for one backend request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection-establishment deadline.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced to the tool caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing tool arguments.  Raised before any backend
    /// request is made.
    #[error("{0}")]
    Validation(String),

    /// Network-level failure reaching the backend (connect, DNS,
    /// deadline exceeded).
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The backend's 2xx response body is not valid JSON.
    #[error("backend returned invalid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Stable machine-readable label for each error class.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Transport(_) => "transport",
            ApiError::Upstream { .. } => "upstream",
            ApiError::Serialization(_) => "serialization",
        }
    }
}

/// One backend request, assembled by a tool before the call is made.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// When set, recorded as the session's identity before sending.
    pub user_id: Option<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            user_id: None,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Client for the pipeline API.
///
/// Holds one configured [`reqwest::Client`] shared by every invocation;
/// paths are resolved against the base URL given at construction.
pub struct ApiClient {
    http: Client,
    base_url: String,
    internal_key: String,
}

impl ApiClient {
    /// Create a client with the standard request deadline.
    pub fn new(base_url: impl Into<String>, internal_key: impl Into<String>) -> Self {
        Self::with_timeout(base_url, internal_key, REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit deadline (useful for tests).
    pub fn with_timeout(
        base_url: impl Into<String>,
        internal_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::builder()
                .timeout(timeout)
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            internal_key: internal_key.into(),
        }
    }

    /// Perform one authenticated request and decode the JSON response.
    ///
    /// If the request carries a user id, the session identity is
    /// overwritten with it *before* the request is sent, so this and
    /// every later call on the same session authenticate as that user.
    /// Nothing is retried; each invocation maps to exactly one request.
    pub async fn call(&self, session: &SessionHandle, req: ApiRequest) -> Result<Value, ApiError> {
        if let Some(ref user_id) = req.user_id {
            session.record_user(user_id);
        }

        let url = format!("{}{}", self.base_url, req.path);
        let mut builder = self
            .http
            .request(req.method.clone(), &url)
            .header(INTERNAL_KEY_HEADER, &self.internal_key);

        if let Some(user_id) = session.user() {
            builder = builder.header(USER_ID_HEADER, user_id);
        }
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }

        debug!(method = %req.method, path = %req.path, "pipeline API request");

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Extract a human-readable message from an error response body.
///
/// The backend reports failures as `{"error": "..."}`; anything else is
/// passed through as raw text.
fn upstream_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = value.get("error").and_then(Value::as_str) {
            return msg.to_string();
        }
    }
    body.trim().to_string()
}
