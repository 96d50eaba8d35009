//! Route definitions for the export form, mounted at the root.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{downloads, export};
use crate::state::AppState;

/// ```text
/// GET    /                       -> show_form        (?filters=N)
/// POST   /export                 -> run_export       (urlencoded form)
/// GET    /exports/{file_name}    -> download_export
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(export::show_form))
        .route("/export", post(export::run_export))
        .route("/exports/{file_name}", get(downloads::download_export))
}
