pub mod exports;
pub mod health;
pub mod imports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /imports                                         run an import (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/imports", imports::router())
}
