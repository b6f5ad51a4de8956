//! WhatsApp sending through the Azure Communication Services messages API.
//!
//! [`client::MessageSender`] owns the HTTP client and performs the sends;
//! [`payload`] holds the request body types.

use std::time::Duration;

pub mod client;
pub mod payload;

pub use client::{ApiResponse, MessageSender, SenderConfig};
pub use payload::{ChannelAddress, InteractiveContent, ListRow, ListSection, ReplyButton};

/// Errors from sending a message.
///
/// A non-2xx status is not an error; it is returned in [`ApiResponse`].
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Connection, DNS or protocol failure.
    #[error("HTTP request failed")]
    Transport(#[source] reqwest::Error),

    /// The request could not be built, e.g. the access key is not a valid
    /// header value.
    #[error("failed to build request")]
    Request(#[source] reqwest::Error),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// A configured header value is not a valid HTTP header.
    #[error("invalid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The messages URL could not be derived from the endpoint.
    #[error("invalid messages URL")]
    InvalidUrl(#[from] url::ParseError),

    /// The interactive payload could not be serialized.
    #[error("failed to encode message")]
    Encode(#[from] serde_json::Error),
}

impl SendError {
    /// Whether the failure happened on the wire (timeout or transport).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }
}
