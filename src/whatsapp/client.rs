//! HTTP client for the advanced messaging `/messages` endpoint.
//!
//! One [`MessageSender`] is built at startup and reused for every send. The
//! `api-version` and `Content-Type` headers are client defaults; the bearer
//! token is attached to each request individually.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::{debug, warn};
use url::Url;

use super::payload::{ChannelAddress, InteractiveContent, ListSection, MessageEnvelope, ReplyButton};
use super::SendError;
use crate::credentials::{AccessKey, Credentials};

/// Path every message is posted to, relative to the endpoint.
pub const MESSAGES_PATH: &str = "/messages";

/// API version sent when none is configured.
pub const DEFAULT_API_VERSION: &str = "2023-05-01";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Name of the API version header.
const API_VERSION_HEADER: &str = "api-version";

/// Everything needed to build a [`MessageSender`].
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Endpoint and access key.
    pub credentials: Credentials,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Value of the `api-version` header.
    pub api_version: String,
}

impl SenderConfig {
    /// Config with the default timeout and API version.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_version: DEFAULT_API_VERSION.to_owned(),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Status and raw body of a `/messages` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, unparsed.
    pub body: String,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends WhatsApp messages over a single configured HTTP client.
pub struct MessageSender {
    client: reqwest::Client,
    messages_url: Url,
    access_key: AccessKey,
    timeout: Duration,
}

impl MessageSender {
    /// Build the HTTP client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidHeader`] for an unusable API version,
    /// [`SendError::InvalidUrl`] if the endpoint cannot be a base URL, and
    /// [`SendError::Client`] if the TLS backend fails to initialise.
    pub fn new(config: SenderConfig) -> Result<Self, SendError> {
        let mut headers = HeaderMap::new();
        headers.insert(API_VERSION_HEADER, HeaderValue::from_str(&config.api_version)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(SendError::Client)?;

        let messages_url = config.credentials.endpoint.join(MESSAGES_PATH)?;
        debug!(url = %messages_url, timeout_secs = config.timeout.as_secs(), "message sender configured");

        Ok(Self {
            client,
            messages_url,
            access_key: config.credentials.access_key,
            timeout: config.timeout,
        })
    }

    /// URL every message is posted to.
    pub fn messages_url(&self) -> &Url {
        &self.messages_url
    }

    /// Send `text` verbatim as a plain text message.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Timeout`] or [`SendError::Transport`] when the
    /// request fails. Non-2xx statuses are returned as `Ok`.
    pub async fn send_text(
        &self,
        from: &ChannelAddress,
        to: &ChannelAddress,
        text: &str,
    ) -> Result<ApiResponse, SendError> {
        let envelope = MessageEnvelope::new(from, to, text);
        self.post(&envelope, "text").await
    }

    /// Send a message with quick-reply buttons.
    ///
    /// # Errors
    ///
    /// Same as [`MessageSender::send_text`], plus [`SendError::Encode`].
    pub async fn send_button_message(
        &self,
        from: &ChannelAddress,
        to: &ChannelAddress,
        header: &str,
        body: &str,
        buttons: &[ReplyButton],
    ) -> Result<ApiResponse, SendError> {
        let content = InteractiveContent::button(header, body, buttons);
        let envelope = MessageEnvelope::new(from, to, content.encode()?);
        self.post(&envelope, "button").await
    }

    /// Send a single-select list message.
    ///
    /// # Errors
    ///
    /// Same as [`MessageSender::send_text`], plus [`SendError::Encode`].
    pub async fn send_list_message(
        &self,
        from: &ChannelAddress,
        to: &ChannelAddress,
        header: &str,
        body: &str,
        button_label: &str,
        sections: &[ListSection],
    ) -> Result<ApiResponse, SendError> {
        let content = InteractiveContent::list(header, body, button_label, sections);
        let envelope = MessageEnvelope::new(from, to, content.encode()?);
        self.post(&envelope, "list").await
    }

    async fn post(
        &self,
        envelope: &MessageEnvelope,
        kind: &'static str,
    ) -> Result<ApiResponse, SendError> {
        let resp = self
            .client
            .post(self.messages_url.clone())
            .bearer_auth(self.access_key.expose())
            .json(envelope)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.classify(e))?;
        let response = ApiResponse { status, body };

        if response.is_success() {
            debug!(kind, status, "message accepted");
        } else {
            warn!(kind, status, "messages endpoint returned non-success status");
        }
        Ok(response)
    }

    fn classify(&self, err: reqwest::Error) -> SendError {
        if err.is_builder() {
            SendError::Request(err)
        } else if err.is_timeout() {
            warn!(timeout_secs = self.timeout.as_secs(), "message request timed out");
            SendError::Timeout(self.timeout)
        } else {
            SendError::Transport(err)
        }
    }
}
