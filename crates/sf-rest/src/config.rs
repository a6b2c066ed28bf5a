//! Configuration for the authenticated REST client.

use restforce_client::RetryConfig;

/// Default Salesforce REST API version.
pub const DEFAULT_API_VERSION: &str = "v62.0";

/// Default number of attempts per request, the first try included.
pub const DEFAULT_MAX_RETRY_REQUESTS: u32 = 3;

/// Settings fixed at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct RestforceConfig {
    /// API version segment used verbatim in relative URLs, e.g. `"v62.0"`.
    pub api_version: String,

    /// Upper bound on sends per request. Must be at least 1.
    pub max_retry_requests: u32,

    /// Identity URL of the authenticated user, used by `user_info`.
    pub resource_owner_url: String,

    /// Delay between a 401 and the token refresh.
    pub retry: RetryConfig,
}

impl Default for RestforceConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            max_retry_requests: DEFAULT_MAX_RETRY_REQUESTS,
            resource_owner_url: String::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl RestforceConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the maximum number of attempts.
    pub fn with_max_retry_requests(mut self, max: u32) -> Self {
        self.max_retry_requests = max;
        self
    }

    /// Set the resource owner URL.
    pub fn with_resource_owner_url(mut self, url: impl Into<String>) -> Self {
        self.resource_owner_url = url.into();
        self
    }

    /// Set the backoff configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = RestforceConfig::default();
        assert_eq!(config.api_version, "v62.0");
        assert_eq!(config.max_retry_requests, 3);
        assert!(config.resource_owner_url.is_empty());
        assert_eq!(config.retry.base_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_builder_methods() {
        let config = RestforceConfig::new()
            .with_api_version("v37.0")
            .with_max_retry_requests(5)
            .with_resource_owner_url("https://login.salesforce.com/id/00D/005")
            .with_retry(RetryConfig::default().with_base_delay(Duration::ZERO));

        assert_eq!(config.api_version, "v37.0");
        assert_eq!(config.max_retry_requests, 5);
        assert_eq!(config.resource_owner_url, "https://login.salesforce.com/id/00D/005");
        assert_eq!(config.retry.base_delay, Duration::ZERO);
    }
}
