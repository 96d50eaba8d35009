//! Writing a loaded batch through an [`ImportTarget`].

use ga4_core::schema::{TableName, TableSchema};
use ga4_db::ImportTarget;
use serde::Serialize;

use crate::error::ImportError;
use crate::load::ImportBatch;

/// Result of a committed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub table: String,
    pub rows_inserted: u64,
}

/// Ensure `table` exists, then insert every row of `batch` in one
/// transaction.
///
/// Any insertion error rolls the whole batch back. The target is closed on
/// every path.
pub async fn write_batch<T>(
    mut target: T,
    table: &TableName,
    schema: &TableSchema,
    batch: &ImportBatch,
) -> Result<ImportSummary, ImportError>
where
    T: ImportTarget,
{
    let result = write_rows(&mut target, table, schema, batch).await;
    target.close().await;
    result
}

async fn write_rows<T>(
    target: &mut T,
    table: &TableName,
    schema: &TableSchema,
    batch: &ImportBatch,
) -> Result<ImportSummary, ImportError>
where
    T: ImportTarget,
{
    target
        .execute_ddl(&schema.create_table_sql(table))
        .await
        .map_err(|source| ImportError::CreateTable {
            table: table.to_string(),
            source,
        })?;
    tracing::info!(table = %table, "Destination table ensured");

    target.begin().await.map_err(ImportError::Begin)?;

    let statement = schema.insert_sql(table);
    for (i, row) in batch.rows.iter().enumerate() {
        if let Err(source) = target.insert_row(&statement, row).await {
            let row = i + 1;
            tracing::error!(table = %table, row, error = %source, "Insert failed, rolling back import");
            if let Err(e) = target.rollback().await {
                tracing::warn!(table = %table, error = %e, "Rollback failed");
            }
            return Err(ImportError::Insert { row, source });
        }
    }

    target.commit().await.map_err(ImportError::Commit)?;
    tracing::info!(table = %table, rows = batch.len(), "Import committed");

    Ok(ImportSummary {
        table: table.to_string(),
        rows_inserted: batch.len() as u64,
    })
}
