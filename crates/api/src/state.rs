use std::sync::Arc;

use ga4_analytics::ReportSource;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Where report pages come from: the GA4 Data API in production.
    pub report_source: Arc<dyn ReportSource>,
}
