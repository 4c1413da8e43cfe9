//! Configuration types
//!
//! This module defines the configuration structures shared by the library and
//! the `rrsetctl` binary. Every timing constant of the convergence poller lives
//! here rather than in the polling loop.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RrsetConfig {
    /// DNS API client configuration
    pub client: ClientConfig,

    /// Convergence poller timing
    #[serde(default)]
    pub convergence: ConvergenceConfig,
}

impl RrsetConfig {
    /// Create a configuration for the given API endpoint with default timing
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: ClientConfig::new(api_url),
            convergence: ConvergenceConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.client.validate()?;
        self.convergence.validate()?;
        Ok(())
    }
}

/// DNS API client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API (e.g. "https://vinyldns.example.com")
    pub api_url: String,

    /// Bearer token sent with every request, if the endpoint requires one
    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-request HTTP timeout (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl ClientConfig {
    /// Create a client configuration without credentials
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: None,
            http_timeout_secs: default_http_timeout_secs(),
        }
    }

    /// Set the bearer token
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Per-request HTTP timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Validate the client configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_url.is_empty() {
            return Err(crate::Error::config("API URL cannot be empty"));
        }
        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "API URL must use http or https, got {}",
                self.api_url
            )));
        }
        if self.api_token.as_deref() == Some("") {
            return Err(crate::Error::config("API token cannot be empty when set"));
        }
        if self.http_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }
        Ok(())
    }
}

// The token is never printed.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<REDACTED>"))
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

/// Convergence poller timing
///
/// The poller sleeps `delay_ms` before its first lookup, then spaces lookups
/// at least `min_interval_secs` apart. While waiting it wakes every
/// `poll_interval_ms` to check the `timeout_secs` deadline, so a timeout is
/// noticed within one poll interval of expiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// Settle delay before the first lookup (in milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Minimum spacing between lookups (in seconds)
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: u64,

    /// Maximum total wait (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Granularity of deadline checks while waiting (in milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl ConvergenceConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.min_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate the timing configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Convergence timeout must be > 0"));
        }
        if self.poll_interval_ms == 0 {
            return Err(crate::Error::config("Convergence poll interval must be > 0"));
        }
        Ok(())
    }
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            min_interval_secs: default_min_interval_secs(),
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_delay_ms() -> u64 {
    500
}

fn default_min_interval_secs() -> u64 {
    15
}

fn default_timeout_secs() -> u64 {
    30 * 60
}

fn default_poll_interval_ms() -> u64 {
    500
}
