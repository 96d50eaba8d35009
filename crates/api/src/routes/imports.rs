//! Route definitions for the `/imports` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::imports;
use crate::state::AppState;

/// Routes mounted at `/imports`.
///
/// ```text
/// POST   /                       -> create_import
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(imports::create_import))
}
