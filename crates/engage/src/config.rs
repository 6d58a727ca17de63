//! Client configuration.

use crate::transport::Transport;
use crate::Error;
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.engage.so";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("engage-rust:", env!("CARGO_PKG_VERSION"));

/// Engage client configuration.
#[derive(Clone)]
pub struct Config {
    pub(crate) key: String,
    pub(crate) secret: String,
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
}

impl Config {
    /// Get the API key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the base URL request paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for Engage client.
pub struct EngageBuilder {
    key: String,
    secret: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl EngageBuilder {
    /// Create a new builder with the given key and secret.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            base_url: None,
            timeout: None,
            transport: None,
        }
    }

    /// Set the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout used by the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom transport instead of the reqwest-backed default.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Validate and split into configuration and optional custom transport.
    pub(crate) fn into_parts(self) -> Result<(Config, Option<Arc<dyn Transport>>), Error> {
        let config = Self::validate(
            self.key,
            self.secret,
            self.base_url.as_deref(),
            self.timeout,
        )?;
        Ok((config, self.transport))
    }

    fn validate(
        key: String,
        secret: String,
        base_url: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Config, Error> {
        if key.is_empty() || secret.is_empty() {
            return Err(Error::MissingCredentials);
        }

        let raw = base_url.unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw)
            .map_err(|e| Error::Config(format!("invalid base_url {raw:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("base_url {raw:?} cannot be a base")));
        }

        Ok(Config {
            key,
            secret,
            base_url,
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

impl fmt::Debug for EngageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngageBuilder")
            .field("key", &self.key)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("custom_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}
