//! Offset pagination of a report into a CSV sink.
//!
//! Pages of [`PAGE_SIZE`] rows are requested one after another starting at
//! offset 0. The header comes from the first page's returned headers. A page
//! shorter than [`PAGE_SIZE`] ends the export, so a report whose row count is
//! an exact multiple of the page size costs one extra, empty request.

use std::io::Write;
use std::path::Path;

use ga4_core::report::{ReportQuery, PAGE_SIZE};
use serde::Serialize;

use crate::error::AnalyticsError;
use crate::source::ReportSource;

/// What an export wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Number of `runReport` calls made.
    pub pages: u32,
    /// Data rows written (header excluded).
    pub rows: u64,
    pub header_written: bool,
}

/// Stream every row of `query` from `source` into `sink` as CSV.
///
/// The sink is flushed after every page, so an error part-way through leaves
/// the pages already received in place.
pub async fn export_report<S, W>(
    source: &S,
    query: &ReportQuery,
    sink: W,
) -> Result<ExportSummary, AnalyticsError>
where
    S: ReportSource + ?Sized,
    W: Write,
{
    let mut writer = csv::Writer::from_writer(sink);
    let mut summary = ExportSummary::default();
    let mut offset = 0;

    loop {
        let request = query.page(source.property_id(), offset, PAGE_SIZE);
        let page = source.run_report(&request).await?;
        summary.pages += 1;

        if !summary.header_written {
            writer.write_record(page.header())?;
            summary.header_written = true;
        }
        for row in &page.rows {
            writer.write_record(row.export_fields())?;
        }
        writer.flush()?;

        let page_rows = page.row_count() as u64;
        summary.rows += page_rows;
        tracing::info!(offset, page_rows, total_rows = summary.rows, "Fetched report page");

        if page_rows < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
    }

    Ok(summary)
}

/// Export `query` into `path`.
///
/// Each run writes to its own temporary file next to `path`, created before
/// the first request, and renames it over `path` when it finishes. Two runs
/// for the same path therefore never share a file; the last one to finish
/// wins. The rename also happens when the export fails, so a first-request
/// failure leaves an empty file and a later failure leaves the pages already
/// received; callers must treat an empty file as a failed export.
pub async fn export_to_file<S>(
    source: &S,
    query: &ReportQuery,
    path: &Path,
) -> Result<ExportSummary, AnalyticsError>
where
    S: ReportSource + ?Sized,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let part = tempfile::Builder::new()
        .prefix(".export-")
        .suffix(".part")
        .tempfile_in(dir)?;
    tracing::info!(
        path = %path.display(),
        part = %part.path().display(),
        dimensions = ?query.dimensions,
        metrics = ?query.metrics,
        start = %query.date_range.start,
        end = %query.date_range.end,
        filtered = query.filter.is_some(),
        "Starting report export"
    );

    let result = export_report(source, query, part.as_file()).await;
    part.persist(path).map_err(|e| e.error)?;

    match result {
        Ok(summary) => {
            tracing::info!(
                path = %path.display(),
                pages = summary.pages,
                rows = summary.rows,
                "Report export complete"
            );
            Ok(summary)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Report export aborted");
            Err(e)
        }
    }
}
