//! Pure domain logic for the GA4 report exporter and importer.
//!
//! Nothing in this crate touches the network, the filesystem or the
//! database. It provides:
//!
//! - [`filter`]: the form filter vocabulary and the expression tree builder.
//! - [`report`]: report queries, paged requests, pages and export naming.
//! - [`schema`]: the destination table descriptor shared by DDL, INSERT and
//!   CSV projection.
//! - [`value`]: typed cell values parsed from CSV text.

pub mod error;
pub mod filter;
pub mod report;
pub mod schema;
pub mod value;
