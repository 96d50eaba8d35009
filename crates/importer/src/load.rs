//! Reading an export CSV into typed rows in schema order.

use std::path::Path;

use ga4_core::schema::{ColumnType, TableSchema};
use ga4_core::value::CellValue;

use crate::error::ImportError;

/// Rows ready for insertion, one [`CellValue`] per schema column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    pub rows: Vec<Vec<CellValue>>,
    /// Non-blank date cells that could not be read and were stored as NULL.
    pub unparsed_dates: usize,
}

impl ImportBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read `path` and project its columns onto `schema`.
///
/// Extra CSV columns are ignored. A schema column absent from the header is
/// an error, as is a non-numeric value in a numeric column. Unreadable dates
/// become NULL and are logged.
pub fn load_import_file(path: &Path, schema: &TableSchema) -> Result<ImportBatch, ImportError> {
    if !path.is_file() {
        return Err(ImportError::FileNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let projection = schema
        .columns()
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column.name)
                .map(|index| (index, column))
                .ok_or(ImportError::MissingColumn(column.name))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut batch = ImportBatch::default();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row_number = i + 1;

        let mut row = Vec::with_capacity(projection.len());
        for &(index, column) in &projection {
            let raw = record.get(index).unwrap_or("");
            let cell = CellValue::parse(column.column_type, raw).map_err(|source| {
                ImportError::InvalidValue {
                    row: row_number,
                    column: column.name,
                    source,
                }
            })?;

            if column.column_type == ColumnType::Date && cell.is_null() && !raw.trim().is_empty() {
                tracing::warn!(row = row_number, value = raw, "Unreadable date stored as NULL");
                batch.unparsed_dates += 1;
            }
            row.push(cell);
        }
        batch.rows.push(row);
    }

    Ok(batch)
}
