use std::path::PathBuf;

use ga4_core::error::CoreError;

/// Errors from importing a GA4 export CSV.
///
/// Everything up to and including [`ImportError::InvalidValue`] is detected
/// before a database connection is opened.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("File '{}' does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("Error reading CSV file: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV header lacks one of the schema's columns.
    #[error("CSV is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A numeric column holds something that is not a number.
    #[error("Row {row}, column '{column}': {source}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        #[source]
        source: CoreError,
    },

    #[error("{0}")]
    InvalidTableName(#[source] CoreError),

    /// The blocking CSV load panicked or was cancelled.
    #[error("Import task failed: {0}")]
    Task(#[source] tokio::task::JoinError),

    #[error("Error connecting to the database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Error creating table '{table}': {source}")]
    CreateTable {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Error starting import transaction: {0}")]
    Begin(#[source] sqlx::Error),

    /// Row numbers count data rows from 1; the whole batch was rolled back.
    #[error("Error inserting row {row}: {source}")]
    Insert {
        row: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("Error committing import: {0}")]
    Commit(#[source] sqlx::Error),
}

impl ImportError {
    /// Whether the error was caused by the caller's input rather than by the
    /// database.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_)
                | Self::Csv(_)
                | Self::MissingColumn(_)
                | Self::InvalidValue { .. }
                | Self::InvalidTableName(_)
        )
    }
}
