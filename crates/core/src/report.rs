//! Report queries, paged requests and the pages returned for them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::filter::FilterExpression;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Rows requested per page. A page shorter than this ends the export.
pub const PAGE_SIZE: u64 = 50_000;

/// Maximum number of filter rows offered on the export form.
pub const MAX_FILTER_ROWS: usize = 10;

/// Date format used on the wire, in file names and on the form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const EXPORT_FILE_PREFIX: &str = "export_";
const EXPORT_FILE_SUFFIX: &str = ".csv";

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Inclusive date range of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting an end date before the start date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::Validation(format!(
                "End date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Everything the user chose for one export, independent of paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub date_range: DateRange,
    pub filter: Option<FilterExpression>,
}

impl ReportQuery {
    /// Build a query; at least one dimension and one metric are required.
    pub fn new(
        dimensions: Vec<String>,
        metrics: Vec<String>,
        date_range: DateRange,
        filter: Option<FilterExpression>,
    ) -> Result<Self, CoreError> {
        if dimensions.is_empty() {
            return Err(CoreError::Validation(
                "At least one dimension is required".to_string(),
            ));
        }
        if metrics.is_empty() {
            return Err(CoreError::Validation(
                "At least one metric is required".to_string(),
            ));
        }
        Ok(Self {
            dimensions,
            metrics,
            date_range,
            filter,
        })
    }

    /// The request for the page starting at `offset`.
    pub fn page<'a>(&'a self, property_id: &'a str, offset: u64, limit: u64) -> ReportRequest<'a> {
        ReportRequest {
            property_id,
            query: self,
            limit,
            offset,
        }
    }
}

/// One paged report request against a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest<'a> {
    pub property_id: &'a str,
    pub query: &'a ReportQuery,
    pub limit: u64,
    pub offset: u64,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// A single result row as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub dimension_values: Vec<String>,
    pub metric_values: Vec<String>,
}

impl ReportRow {
    /// Dimension values followed by metric values, as written to the CSV.
    pub fn export_fields(&self) -> impl Iterator<Item = &str> {
        self.dimension_values
            .iter()
            .chain(self.metric_values.iter())
            .map(String::as_str)
    }
}

/// One page of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPage {
    pub dimension_headers: Vec<String>,
    pub metric_headers: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl ReportPage {
    /// Dimension header names followed by metric header names.
    pub fn header(&self) -> impl Iterator<Item = &str> {
        self.dimension_headers
            .iter()
            .chain(self.metric_headers.iter())
            .map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Split a comma-separated list of API field names, trimming each name and
/// dropping empty entries.
pub fn parse_field_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a form date (`YYYY-MM-DD`).
pub fn parse_form_date(field: &str, input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        CoreError::Validation(format!("{field} must be a date in YYYY-MM-DD form"))
    })
}

/// File name for an export covering `range`: `export_<start>_to_<end>.csv`.
pub fn export_file_name(range: &DateRange) -> String {
    format!(
        "{EXPORT_FILE_PREFIX}{}_to_{}{EXPORT_FILE_SUFFIX}",
        range.start_str(),
        range.end_str()
    )
}

/// Whether `name` is a file name produced by [`export_file_name`].
///
/// Used to refuse serving anything else from the export directory.
pub fn is_export_file_name(name: &str) -> bool {
    let Some(inner) = name
        .strip_prefix(EXPORT_FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(EXPORT_FILE_SUFFIX))
    else {
        return false;
    };
    let Some((start, end)) = inner.split_once("_to_") else {
        return false;
    };
    NaiveDate::parse_from_str(start, DATE_FORMAT).is_ok()
        && NaiveDate::parse_from_str(end, DATE_FORMAT).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
