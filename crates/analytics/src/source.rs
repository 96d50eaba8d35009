use async_trait::async_trait;
use ga4_core::report::{ReportPage, ReportRequest};

use crate::error::AnalyticsError;

/// Something that answers paged report requests for one property.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// The property every request from this source targets.
    fn property_id(&self) -> &str;

    /// Fetch one page of a report.
    async fn run_report(&self, request: &ReportRequest<'_>) -> Result<ReportPage, AnalyticsError>;
}
