//! Client configuration
//!
//! Resolved once at startup from environment variables with baked-in
//! defaults. Never re-read per call.

use std::time::Duration;

/// Default inference server address (local network)
const DEFAULT_API_BASE_URL: &str = "http://192.168.1.100:8000";

/// Default request timeout in milliseconds
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Upload request timeout in milliseconds
///
/// File uploads carry the full image payload and wait for server-side
/// inference, so they get a longer bound than plain JSON calls.
const DEFAULT_UPLOAD_TIMEOUT_MS: u64 = 90_000;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Inference API base URL (no trailing slash)
    pub api_base_url: String,
    /// Default request timeout
    pub timeout: Duration,
    /// Extended timeout for file-upload detection
    pub upload_timeout: Duration,
}

impl ClientConfig {
    /// Build a config from explicit values
    ///
    /// Trailing slashes on the base URL are trimmed here so endpoint
    /// joining never produces a doubled `/`.
    pub fn new(api_base_url: impl Into<String>, timeout: Duration, upload_timeout: Duration) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self {
            api_base_url,
            timeout,
            upload_timeout,
        }
    }

    /// Resolve configuration from the environment
    pub fn from_env() -> Self {
        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let timeout_ms = std::env::var("TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let upload_timeout_ms = std::env::var("UPLOAD_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_MS);

        Self::new(
            api_base_url,
            Duration::from_millis(timeout_ms),
            Duration::from_millis(upload_timeout_ms),
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_API_BASE_URL,
            Duration::from_millis(DEFAULT_TIMEOUT_MS),
            Duration::from_millis(DEFAULT_UPLOAD_TIMEOUT_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://192.168.1.100:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.upload_timeout > config.timeout);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new(
            "http://10.0.0.5:8000/",
            Duration::from_secs(30),
            Duration::from_secs(90),
        );
        assert_eq!(config.api_base_url, "http://10.0.0.5:8000");
    }

    #[test]
    fn test_multiple_trailing_slashes_trimmed() {
        let config = ClientConfig::new(
            "http://10.0.0.5:8000//",
            Duration::from_secs(30),
            Duration::from_secs(90),
        );
        assert_eq!(config.api_base_url, "http://10.0.0.5:8000");
    }
}
