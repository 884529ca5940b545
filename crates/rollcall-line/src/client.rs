//! HTTP client for the LINE Messaging API.
//!
//! Two delivery modes: push (to a known recipient ID, used for parent
//! notifications) and reply (against a one-time reply token from a
//! webhook event). Both are single-attempt; callers treat failures as
//! best-effort and log them.

use std::time::Duration;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::error::{LineError, Result};

const PUSH_PATH: &str = "/v2/bot/message/push";
const REPLY_PATH: &str = "/v2/bot/message/reply";

/// Configuration for the LINE client.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// API base URL; overridden in tests.
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self { base_url: "https://api.line.me".to_string(), timeout: Duration::from_secs(10) }
    }
}

/// A text message in the Messaging API wire format.
#[derive(Debug, Clone, Serialize)]
pub struct TextMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl TextMessage {
    /// Creates a text message.
    pub fn new(text: impl Into<String>) -> Self {
        Self { kind: "text", text: text.into() }
    }

    /// The message text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Client for push and reply message delivery.
///
/// Constructed once at startup and shared across requests. A missing
/// channel token is a valid degraded state: `can_send` reports it and
/// every send fails with `LineError::MissingCredentials` so callers can
/// log and move on. The Debug form masks the token.
#[derive(Clone)]
pub struct LineClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    channel_token: Option<String>,
}

impl std::fmt::Debug for LineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("channel_token", &self.channel_token.as_deref().map(|_| "***"))
            .finish()
    }
}

impl LineClient {
    /// Creates a client with the given channel access token, if any.
    ///
    /// # Errors
    ///
    /// Returns `LineError::Network` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: LineConfig, channel_token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LineError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            channel_token: channel_token.filter(|token| !token.is_empty()),
        })
    }

    /// Whether a channel access token is configured.
    pub fn can_send(&self) -> bool {
        self.channel_token.is_some()
    }

    /// Pushes messages to a known recipient ID.
    #[instrument(skip(self, messages), fields(message_count = messages.len()))]
    pub async fn push(&self, to: &str, messages: &[TextMessage]) -> Result<()> {
        self.send(PUSH_PATH, json!({ "to": to, "messages": messages })).await
    }

    /// Replies to a webhook event via its one-time reply token.
    #[instrument(skip(self, reply_token, messages), fields(message_count = messages.len()))]
    pub async fn reply(&self, reply_token: &str, messages: &[TextMessage]) -> Result<()> {
        self.send(REPLY_PATH, json!({ "replyToken": reply_token, "messages": messages })).await
    }

    async fn send(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let token = self.channel_token.as_deref().ok_or(LineError::MissingCredentials)?;

        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LineError::api(status.as_u16(), body));
        }

        debug!(path, "message delivered");
        Ok(())
    }

    /// Categorizes a transport-level request failure.
    fn request_error(&self, error: reqwest::Error) -> LineError {
        if error.is_timeout() {
            return LineError::timeout(self.timeout.as_secs());
        }
        if error.is_connect() {
            return LineError::network(format!("connection failed: {error}"));
        }
        LineError::network(error.to_string())
    }
}
