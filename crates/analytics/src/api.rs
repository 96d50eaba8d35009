//! REST client for the GA4 Data API `runReport` method.
//!
//! Wraps `POST {base}/properties/{id}:runReport` using [`reqwest`], with a
//! bearer token from the service account's [`TokenProvider`].

use std::time::Duration;

use async_trait::async_trait;
use ga4_core::report::{ReportPage, ReportRequest};

use crate::config::AnalyticsConfig;
use crate::credentials::{ServiceAccountKey, TokenProvider};
use crate::error::AnalyticsError;
use crate::source::ReportSource;
use crate::wire::{RunReportBody, RunReportResponse};

/// HTTP client for one GA4 property.
pub struct AnalyticsDataApi {
    client: reqwest::Client,
    api_url: String,
    property_id: String,
    tokens: TokenProvider,
}

impl AnalyticsDataApi {
    /// Build a client from configuration, reading the service-account key.
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        let key = ServiceAccountKey::from_file(&config.credentials_file)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(
            client,
            config.api_base_url.clone(),
            config.property_id.clone(),
            key,
        ))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: String,
        property_id: String,
        key: ServiceAccountKey,
    ) -> Self {
        let tokens = TokenProvider::new(client.clone(), key);
        tracing::info!(
            property_id = %property_id,
            client_email = %tokens.client_email(),
            "Analytics Data API client ready"
        );
        Self {
            client,
            api_url,
            property_id,
            tokens,
        }
    }

    fn run_report_url(&self) -> String {
        format!("{}/properties/{}:runReport", self.api_url, self.property_id)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or turn the status and
    /// body into an [`AnalyticsError::ApiError`].
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AnalyticsError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AnalyticsError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ReportSource for AnalyticsDataApi {
    fn property_id(&self) -> &str {
        &self.property_id
    }

    async fn run_report(&self, request: &ReportRequest<'_>) -> Result<ReportPage, AnalyticsError> {
        let body = RunReportBody::from_request(request)?;
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(self.run_report_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: RunReportResponse = response.json().await?;
        tracing::debug!(
            offset = request.offset,
            row_count = parsed.row_count,
            "runReport answered"
        );
        Ok(parsed.into())
    }
}
