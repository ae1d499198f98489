//! Backend adapter configuration
//!
//! Credentials and endpoints are explicit values handed to the adapter
//! constructor. Nothing below the binary entry point reads the process
//! environment.

/// Default base URL for the GitHub REST API.
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Connection settings for a hosting backend adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Base URL of the forge's API.
    pub base_url: String,
    /// Opaque authentication token. The core never inspects its shape;
    /// anonymous access is allowed (and rate-limited by the forge).
    pub token: Option<String>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(GITHUB_API_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_github_without_a_token() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, GITHUB_API_BASE_URL);
        assert_eq!(config.token, None);
    }

    #[test]
    fn with_token_sets_the_token() {
        let config = BackendConfig::new("http://localhost:8080")
            .with_token(Some("secret".to_string()));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.token.as_deref(), Some("secret"));
    }
}
