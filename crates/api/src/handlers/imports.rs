//! Handlers for CSV imports into PostgreSQL.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ga4_core::report::is_export_file_name;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Table used when the request does not name one.
pub const DEFAULT_TABLE_NAME: &str = "ga4_export_data";

#[derive(Debug, Deserialize)]
pub struct CreateImportRequest {
    /// Name of an export in the export directory, as linked from the export
    /// result page (`export_<start>_to_<end>.csv`). Paths are refused.
    pub csv_path: String,
    pub table_name: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /imports
// ---------------------------------------------------------------------------

/// Import an exported CSV into a table, creating the table if needed.
///
/// Only export files are readable through this endpoint, and the name is
/// checked before the file is looked up, so the response never reveals
/// whether some other file exists.
pub async fn create_import(
    State(state): State<AppState>,
    Json(input): Json<CreateImportRequest>,
) -> AppResult<impl IntoResponse> {
    let database_url = state
        .config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Unavailable("DATABASE_URL is not configured".to_string()))?;

    if !is_export_file_name(&input.csv_path) {
        return Err(AppError::BadRequest(
            "csv_path must name an export file (export_<start>_to_<end>.csv)".to_string(),
        ));
    }

    let csv_path = state.config.export_dir.join(&input.csv_path);
    let table_name = input
        .table_name
        .as_deref()
        .unwrap_or(DEFAULT_TABLE_NAME);

    tracing::info!(path = %csv_path.display(), table = table_name, "Starting import");
    let summary = ga4_importer::import_csv(database_url, &csv_path, table_name).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}
