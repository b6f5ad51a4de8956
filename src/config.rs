//! Configuration loading.
//!
//! Loads from `--config <path>`, `$ACS_CONFIG_PATH`, or `./acs-messages.toml`.
//! Environment variables override file values; file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::credentials::Credentials;
use crate::whatsapp::client::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS};
use crate::whatsapp::{ChannelAddress, SenderConfig};

/// Config file used when neither `--config` nor `$ACS_CONFIG_PATH` is set.
pub const DEFAULT_CONFIG_FILE: &str = "acs-messages.toml";

/// Placeholder connection string, replaced by real configuration.
const PLACEHOLDER_CONNECTION_STRING: &str =
    "endpoint=https://your-resource.communication.azure.com/;accesskey=your-access-key";

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `endpoint=<url>;accesskey=<key>`.
    pub connection_string: String,
    /// Sender and recipient addresses.
    pub whatsapp: WhatsAppConfig,
    /// HTTP client settings.
    pub http: HttpConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connection_string: PLACEHOLDER_CONNECTION_STRING.to_owned(),
            whatsapp: WhatsAppConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("connection_string", &"[REDACTED]")
            .field("whatsapp", &self.whatsapp)
            .field("http", &self.http)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// A missing `./acs-messages.toml` falls back to defaults; a path given
    /// with `--config` or `$ACS_CONFIG_PATH` must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file is missing, or if the file exists but
    /// cannot be read or parsed.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_path, |key| std::env::var(key).ok())
    }

    /// [`AppConfig::load`] with a custom env resolver.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::load`].
    pub fn load_with(
        explicit_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let named = explicit_path.is_some() || env("ACS_CONFIG_PATH").is_some();
        let path = Self::config_path_with(explicit_path, &env);
        let mut config = if named {
            Self::load_required(&path)?
        } else {
            Self::load_from_file(&path)?
        };
        config.apply_overrides(&env);
        Ok(config)
    }

    /// Load from a TOML file only, no env overrides. A missing file yields
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_file(path, &contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "failed to read config file {}: {e}",
                path.display()
            )),
        }
    }

    /// Load from a TOML file that must exist, no env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or malformed.
    pub fn load_required(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse_file(path, &contents)
    }

    fn parse_file(path: &Path, contents: &str) -> Result<Self> {
        tracing::info!(path = %path.display(), "loading config from file");
        Self::from_toml(contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Resolve the config path using a custom env resolver.
    ///
    /// An explicit path wins, then `$ACS_CONFIG_PATH`, then
    /// [`DEFAULT_CONFIG_FILE`] in the working directory.
    pub fn config_path_with(
        explicit_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> PathBuf {
        if let Some(p) = explicit_path {
            return p.to_path_buf();
        }
        if let Some(p) = env("ACS_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Apply environment variable overrides.
    ///
    /// Takes a resolver function so tests need not touch the process env.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("ACS_CONNECTION_STRING") {
            self.connection_string = v;
        }
        if let Some(v) = env("ACS_WHATSAPP_FROM") {
            self.whatsapp.from = v;
        }
        if let Some(v) = env("ACS_WHATSAPP_TO") {
            self.whatsapp.to = v;
        }
        if let Some(v) = env("ACS_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.http.timeout_secs = n,
                Err(_) => tracing::warn!(
                    var = "ACS_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("ACS_API_VERSION") {
            self.http.api_version = v;
        }
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has wrongly typed keys.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Parse the connection string and build the sender settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is malformed.
    pub fn sender_config(&self) -> Result<SenderConfig> {
        let credentials =
            Credentials::parse(&self.connection_string).context("invalid connection string")?;
        let mut sender = SenderConfig::new(credentials)
            .with_timeout(Duration::from_secs(self.http.timeout_secs));
        sender.api_version = self.http.api_version.clone();
        Ok(sender)
    }

    /// Sender address.
    pub fn from_address(&self) -> ChannelAddress {
        ChannelAddress::new(self.whatsapp.from.clone())
    }

    /// Recipient address.
    pub fn to_address(&self) -> ChannelAddress {
        ChannelAddress::new(self.whatsapp.to.clone())
    }
}

// ── WhatsApp config ─────────────────────────────────────────────

/// Sender and recipient (`[whatsapp]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Registered sender, `whatsapp:+<number>`.
    pub from: String,
    /// Recipient, `whatsapp:+<number>`.
    pub to: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            from: "whatsapp:+1234567890".to_owned(),
            to: "whatsapp:+0987654321".to_owned(),
        }
    }
}

// ── HTTP config ─────────────────────────────────────────────────

/// HTTP client settings (`[http]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// `api-version` header value.
    pub api_version: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_version: DEFAULT_API_VERSION.to_owned(),
        }
    }
}
