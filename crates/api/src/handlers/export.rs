//! Handlers for the export form.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use ga4_analytics::export_to_file;
use ga4_core::filter::SkippedFilter;
use ga4_core::report::{export_file_name, MAX_FILTER_ROWS};
use serde::Deserialize;

use crate::error::AppError;
use crate::form::ExportForm;
use crate::state::AppState;
use crate::views;

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FormParams {
    /// Number of filter rows to show; clamped to `0..=10`.
    pub filters: Option<i64>,
}

/// Render a blank export form.
pub async fn show_form(Query(params): Query<FormParams>) -> Html<String> {
    let rows = params.filters.unwrap_or(0).clamp(0, MAX_FILTER_ROWS as i64) as usize;
    let today = today();
    Html(views::render_form(&ExportForm::blank(rows, today), today, None))
}

// ---------------------------------------------------------------------------
// POST /export
// ---------------------------------------------------------------------------

/// Validate the form, run the paginated export and render the outcome.
///
/// Validation errors re-render the form with the submitted values. Export
/// errors render an error page; a partial file may remain in the export
/// directory but is not linked.
pub async fn run_export(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let form = ExportForm::from_fields(&fields);
    let plan = match form.plan() {
        Ok(plan) => plan,
        Err(e) => {
            let (status, _, message) = AppError::from(e).classify();
            return (status, Html(views::render_form(&form, today(), Some(&message)))).into_response();
        }
    };

    for skipped in &plan.skipped {
        tracing::warn!(index = skipped.index, reason = %skipped.reason, "Filter row skipped");
    }

    let file_name = export_file_name(&plan.query.date_range);
    let path = state.config.export_dir.join(&file_name);

    if let Err(e) = tokio::fs::create_dir_all(&state.config.export_dir).await {
        tracing::error!(dir = %state.config.export_dir.display(), error = %e, "Cannot create export directory");
        return error_page(AppError::InternalError(e.to_string()), &plan.skipped);
    }

    let summary = match export_to_file(state.report_source.as_ref(), &plan.query, &path).await {
        Ok(summary) => summary,
        Err(e) => return error_page(AppError::from(e), &plan.skipped),
    };

    Html(views::render_export_result(&file_name, &summary, &plan.skipped)).into_response()
}

fn error_page(err: AppError, skipped: &[SkippedFilter]) -> Response {
    let (status, _, message) = err.classify();
    (status, Html(views::render_export_error(&message, skipped))).into_response()
}
