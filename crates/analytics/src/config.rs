use std::path::PathBuf;

/// Default GA4 Data API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://analyticsdata.googleapis.com/v1beta";

/// Default per-request timeout; a full 50,000-row page can be slow.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the GA4 Data API.
///
/// Built once at startup and handed to [`crate::AnalyticsDataApi`].
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Path to the service-account JSON key.
    pub credentials_file: PathBuf,
    /// Numeric GA4 property id (without the `properties/` prefix).
    pub property_id: String,
    /// API base URL, overridable for tests and proxies.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl AnalyticsConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Required | Default                                       |
    /// |-----------------------------|----------|-----------------------------------------------|
    /// | `GA4_PROPERTY_ID`           | **yes**  | --                                            |
    /// | `GA4_CREDENTIALS_FILE`      | no       | `service_account.json`                        |
    /// | `GA4_API_BASE_URL`          | no       | `https://analyticsdata.googleapis.com/v1beta` |
    /// | `GA4_REQUEST_TIMEOUT_SECS`  | no       | `120`                                         |
    ///
    /// # Panics
    ///
    /// Panics if `GA4_PROPERTY_ID` is missing or empty, or if the timeout is
    /// not a valid `u64`.
    pub fn from_env() -> Self {
        let property_id = std::env::var("GA4_PROPERTY_ID")
            .expect("GA4_PROPERTY_ID must be set in the environment");
        let property_id = property_id
            .trim()
            .trim_start_matches("properties/")
            .to_string();
        assert!(!property_id.is_empty(), "GA4_PROPERTY_ID must not be empty");

        let credentials_file = std::env::var("GA4_CREDENTIALS_FILE")
            .unwrap_or_else(|_| "service_account.json".into())
            .into();

        let api_base_url = std::env::var("GA4_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs: u64 = std::env::var("GA4_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GA4_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            credentials_file,
            property_id,
            api_base_url,
            request_timeout_secs,
        }
    }
}
