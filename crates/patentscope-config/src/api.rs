//! PatentsView search API configuration

use serde::{Deserialize, Serialize};

/// PatentsView search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the patent search endpoint
    pub base_url: String,

    /// API key sent in the X-Api-Key header
    ///
    /// Absent key short-circuits the fetcher to an empty result set
    /// (logged as a warning, not an error). Supplied via the configuration
    /// file or the PATENTSCOPE_API_KEY environment variable.
    pub api_key: Option<String>,

    /// Maximum records per page enforced by the API
    pub page_size_limit: usize,

    /// Fixed pause before every request, in milliseconds
    pub request_delay_ms: u64,

    /// Per-attempt request timeout in seconds
    pub request_timeout_secs: u64,

    /// Number of attempts for transient transport failures
    pub retry_attempts: usize,

    /// Delay between retry attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://search.patentsview.org/api/v1/patent/".to_string(),
            api_key: None,
            page_size_limit: 1000,
            request_delay_ms: 1400,
            request_timeout_secs: 30,
            retry_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl ApiConfig {
    /// Returns the configured key, treating a blank string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_absent() {
        let mut config = ApiConfig::default();
        assert_eq!(config.api_key(), None);

        config.api_key = Some("   ".to_string());
        assert_eq!(config.api_key(), None);

        config.api_key = Some("secret".to_string());
        assert_eq!(config.api_key(), Some("secret"));
    }
}
