use std::time::Duration;

/// Configuration for the validation client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the validation service, with trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Interval between status polls while validation is confirmed running
    pub poll_interval_ms: u64,
    /// How long transient indicators (upload result, rejected drop) stay visible
    pub feedback_delay_ms: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            timeout_seconds: 30,
            poll_interval_ms: 1000,
            feedback_delay_ms: 1500,
            user_agent: format!("validate-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given service base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.feedback_delay(), Duration::from_millis(1500));
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_new_appends_trailing_slash() {
        let config = ClientConfig::new("http://example.com/mvt");
        assert_eq!(config.base_url, "http://example.com/mvt/");

        let config = ClientConfig::new("http://example.com/mvt/");
        assert_eq!(config.base_url, "http://example.com/mvt/");
    }

    #[test]
    fn test_endpoint_resolution() {
        let config = ClientConfig::new("http://example.com");
        assert_eq!(config.endpoint("status"), "http://example.com/status");
        assert_eq!(
            config.endpoint("messagetypes"),
            "http://example.com/messagetypes"
        );
    }
}
