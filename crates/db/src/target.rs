//! Statement-level write target used by the CSV importer.

use async_trait::async_trait;
use ga4_core::value::CellValue;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{Postgres, Transaction};

use crate::DbPool;

/// Where imported rows are written.
///
/// The importer drives the sequence `execute_ddl` → `begin` →
/// `insert_row`* → `commit` | `rollback`, then always `close`.
#[async_trait]
pub trait ImportTarget: Send {
    /// Run a schema statement outside of any transaction.
    async fn execute_ddl(&mut self, statement: &str) -> Result<(), sqlx::Error>;

    async fn begin(&mut self) -> Result<(), sqlx::Error>;

    /// Insert one row inside the open transaction.
    async fn insert_row(&mut self, statement: &str, row: &[CellValue])
        -> Result<(), sqlx::Error>;

    async fn commit(&mut self) -> Result<(), sqlx::Error>;

    async fn rollback(&mut self) -> Result<(), sqlx::Error>;

    /// Release the connection. Any transaction still open is rolled back.
    async fn close(self)
    where
        Self: Sized;
}

/// [`ImportTarget`] backed by a single-connection PostgreSQL pool.
pub struct PgImportTarget {
    pool: DbPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgImportTarget {
    /// Connect to `database_url` with a dedicated connection.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = crate::connect_single(database_url).await?;
        Ok(Self::from_pool(pool))
    }

    /// Write through an existing pool. `close` closes that pool.
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool, tx: None }
    }
}

#[async_trait]
impl ImportTarget for PgImportTarget {
    async fn execute_ddl(&mut self, statement: &str) -> Result<(), sqlx::Error> {
        sqlx::query(statement).execute(&self.pool).await?;
        Ok(())
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        self.tx = Some(self.pool.begin().await?);
        Ok(())
    }

    async fn insert_row(
        &mut self,
        statement: &str,
        row: &[CellValue],
    ) -> Result<(), sqlx::Error> {
        let tx = self
            .tx
            .as_mut()
            .ok_or_else(|| sqlx::Error::Protocol("insert outside of a transaction".into()))?;

        let query = row
            .iter()
            .fold(sqlx::query(statement), |query, cell| bind_cell(query, cell));
        query.execute(&mut **tx).await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }

    async fn close(mut self) {
        // Dropping an open transaction queues its rollback on the connection.
        drop(self.tx.take());
        self.pool.close().await;
        tracing::debug!("Import connection closed");
    }
}

/// Bind one cell; `Null` is bound as untyped text and cast by the statement.
fn bind_cell<'q>(
    query: Query<'q, Postgres, PgArguments>,
    cell: &'q CellValue,
) -> Query<'q, Postgres, PgArguments> {
    match cell {
        CellValue::Null => query.bind(None::<String>),
        CellValue::Text(s) | CellValue::Decimal(s) => query.bind(s.as_str()),
        CellValue::Integer(v) => query.bind(*v),
        CellValue::Date(d) => query.bind(*d),
    }
}
