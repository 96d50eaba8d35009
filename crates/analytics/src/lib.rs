//! GA4 Data API client and paginated CSV exporter.
//!
//! - [`AnalyticsDataApi`]: `runReport` over HTTPS, authenticated with a
//!   service-account key.
//! - [`ReportSource`]: the seam the exporter pages through.
//! - [`export`]: offset pagination streaming rows into a CSV sink.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod export;
pub mod source;
mod wire;

pub use api::AnalyticsDataApi;
pub use config::AnalyticsConfig;
pub use error::AnalyticsError;
pub use export::{export_report, export_to_file, ExportSummary};
pub use source::ReportSource;
