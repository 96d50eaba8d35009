use std::path::PathBuf;

/// Errors from talking to the GA4 Data API or writing the export.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// The service-account key file could not be read.
    #[error("Failed to read credentials file {}: {source}", path.display())]
    CredentialsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key file was read but is not a usable service-account key.
    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The OAuth token endpoint refused the assertion.
    #[error("Token exchange failed ({status}): {body}")]
    Token { status: u16, body: String },

    /// The Data API returned a non-2xx status code.
    #[error("Analytics API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// A filter could not be expressed in the API's filter model.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
