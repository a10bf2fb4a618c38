//! Client configuration.

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://0.0.0.0:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the request pipeline, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the remote API; all endpoint paths are relative to it.
    pub base_url: String,
    /// Per-request timeout applied by the underlying HTTP client.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        // Endpoint paths start with '/', so the root must not end with one.
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve configuration from the environment.
    ///
    /// `PHARMADESK_API_URL` sets the base URL and
    /// `PHARMADESK_HTTP_TIMEOUT_SECS` the request timeout; both fall back to
    /// defaults when unset or unparsable.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PHARMADESK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = std::env::var("PHARMADESK_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self::new(base_url).with_timeout(timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ClientConfig::new("http://localhost:8000///");
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        let config = ClientConfig::new("http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
