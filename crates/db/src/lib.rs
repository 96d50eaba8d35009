//! PostgreSQL access for imported GA4 exports.
//!
//! The importer writes through the [`ImportTarget`] seam; [`PgImportTarget`]
//! is its PostgreSQL implementation.

use sqlx::postgres::PgPoolOptions;

pub mod target;

pub use target::{ImportTarget, PgImportTarget};

pub type DbPool = sqlx::PgPool;

/// Open a pool holding exactly one connection.
///
/// Each import run owns its connection and closes it when done.
pub async fn connect_single(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
}
