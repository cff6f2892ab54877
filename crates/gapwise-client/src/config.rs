//! Client configuration.

use url::Url;
use zeroize::Zeroizing;

/// Default service location for local development.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the persistence service.
///
/// `Debug` redacts the token.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Bearer token, if the service requires one.
    pub api_token: Option<Zeroizing<String>>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration for `base_url` with no token and the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Zeroizing::new(token.into()));
        self
    }

    /// Load configuration from environment variables.
    ///
    /// - `GAPWISE_API_URL` (default: `http://127.0.0.1:8080`)
    /// - `GAPWISE_API_TOKEN` (optional)
    /// - `GAPWISE_TIMEOUT_SECS` (default: 30)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the URL or timeout is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("GAPWISE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = match std::env::var("GAPWISE_TIMEOUT_SECS") {
            Ok(s) => s
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(s.clone()))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            base_url: parse_url("GAPWISE_API_URL", &raw)?,
            api_token: std::env::var("GAPWISE_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty())
                .map(Zeroizing::new),
            timeout_secs,
        })
    }
}

fn parse_url(source: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(source.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid GAPWISE_TIMEOUT_SECS value: {0:?}")]
    InvalidTimeout(String),
    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig::new("http://localhost:9000")
            .unwrap()
            .with_token("secret-token-value");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn invalid_url_rejected() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ConfigError::InvalidUrl(..))
        ));
    }

    #[test]
    fn new_uses_default_timeout() {
        let config = ClientConfig::new("http://localhost:9000").unwrap();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.api_token.is_none());
    }
}
