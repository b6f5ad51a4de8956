//! Connection-string parsing for Azure Communication Services.
//!
//! A connection string has the form `endpoint=<url>;accesskey=<key>`. It is
//! parsed once at startup into [`Credentials`]; the access key is kept in an
//! [`AccessKey`] whose `Debug` output is redacted.

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use url::Url;

/// Key of the endpoint segment.
const ENDPOINT_KEY: &str = "endpoint";

/// Key of the access-key segment.
const ACCESS_KEY_KEY: &str = "accesskey";

/// Errors from parsing a connection string.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The string does not contain at least two `;`-separated segments.
    #[error("connection string must contain `endpoint=...;accesskey=...`")]
    MissingSeparator,

    /// A segment is not a `key=value` pair.
    #[error("malformed connection string segment: {0}")]
    MalformedSegment(String),

    /// No non-empty `endpoint` value was found.
    #[error("connection string is missing `endpoint`")]
    MissingEndpoint,

    /// No non-empty `accesskey` value was found.
    #[error("connection string is missing `accesskey`")]
    MissingAccessKey,

    /// The endpoint is not an absolute URL.
    #[error("invalid endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        /// The rejected endpoint value.
        endpoint: String,
        /// Underlying URL parse error.
        source: url::ParseError,
    },
}

/// Access key used for bearer authorization.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKey(String);

impl AccessKey {
    /// Wrap a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key. Only the request builder should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessKey([REDACTED])")
    }
}

/// Endpoint and access key parsed from a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Resource endpoint, e.g. `https://my-resource.communication.azure.com/`.
    pub endpoint: Url,
    /// Key sent as `Authorization: Bearer <key>`.
    pub access_key: AccessKey,
}

impl Credentials {
    /// Parse `endpoint=<url>;accesskey=<key>`.
    ///
    /// Keys are matched case-sensitively. Empty segments (for example a
    /// trailing `;`) and surrounding whitespace are ignored, as are unknown
    /// keys.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when fewer than two segments are
    /// present, a segment has no `=`, either value is missing or empty, or
    /// the endpoint is not an absolute URL.
    pub fn parse(connection_string: &str) -> Result<Self, ConfigurationError> {
        let segments: Vec<&str> = connection_string
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.len() < 2 {
            return Err(ConfigurationError::MissingSeparator);
        }

        let mut endpoint = None;
        let mut access_key = None;
        for segment in segments {
            let Some((key, value)) = segment.split_once('=') else {
                return Err(ConfigurationError::MalformedSegment(segment.to_owned()));
            };
            match key.trim() {
                ENDPOINT_KEY => endpoint = Some(value.trim()),
                ACCESS_KEY_KEY => access_key = Some(value.trim()),
                other => debug!(key = other, "ignoring unknown connection string key"),
            }
        }

        let endpoint = endpoint
            .filter(|v| !v.is_empty())
            .ok_or(ConfigurationError::MissingEndpoint)?;
        let access_key = access_key
            .filter(|v| !v.is_empty())
            .ok_or(ConfigurationError::MissingAccessKey)?;

        let endpoint = Url::parse(endpoint).map_err(|source| ConfigurationError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            source,
        })?;

        Ok(Self {
            endpoint,
            access_key: AccessKey::new(access_key),
        })
    }
}

impl FromStr for Credentials {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
