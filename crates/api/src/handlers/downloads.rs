//! Serving previously exported CSV files.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use ga4_core::report::is_export_file_name;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /exports/{file_name}
// ---------------------------------------------------------------------------

/// Send an export as a `text/csv` attachment.
///
/// Only names of the form `export_<start>_to_<end>.csv` are served, so no
/// other file in (or outside) the export directory is reachable.
pub async fn download_export(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !is_export_file_name(&file_name) {
        return Err(AppError::NotFound(format!("Export '{file_name}' not found")));
    }

    let path = state.config.export_dir.join(&file_name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("Export '{file_name}' not found")));
        }
        Err(e) => return Err(AppError::InternalError(e.to_string())),
    };

    tracing::debug!(file = %file_name, bytes = bytes.len(), "Serving export");
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}
