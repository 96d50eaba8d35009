//! Destination table descriptor for imported GA4 exports.
//!
//! [`GA4_EXPORT_SCHEMA`] is the single source of truth for the column list:
//! the `CREATE TABLE` statement, the `INSERT` statement and the projection of
//! CSV columns are all derived from it, so they cannot drift apart.

use std::fmt;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Column types
// ---------------------------------------------------------------------------

/// SQL type of a destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Varchar(u16),
    Text,
    Integer,
    Decimal { precision: u8, scale: u8 },
    Date,
}

impl ColumnType {
    /// Column type as written in `CREATE TABLE`.
    pub fn sql_type(&self) -> String {
        match self {
            Self::Varchar(len) => format!("VARCHAR({len})"),
            Self::Text => "TEXT".to_string(),
            Self::Integer => "INTEGER".to_string(),
            Self::Decimal { precision, scale } => format!("NUMERIC({precision},{scale})"),
            Self::Date => "DATE".to_string(),
        }
    }

    /// Type used to cast the bound parameter in `INSERT`.
    ///
    /// Decimals are bound as text and NULLs as untyped text, so every
    /// placeholder carries an explicit cast.
    pub fn placeholder_cast(&self) -> &'static str {
        match self {
            Self::Varchar(_) => "varchar",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal { .. } => "numeric",
            Self::Date => "date",
        }
    }
}

/// One named column of a [`TableSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
}

const fn col(name: &'static str, column_type: ColumnType) -> ColumnDef {
    ColumnDef { name, column_type }
}

const NAME: ColumnType = ColumnType::Varchar(255);
const RATE: ColumnType = ColumnType::Decimal {
    precision: 10,
    scale: 2,
};

/// Name of the column holding `YYYYMMDD` dates in GA4 exports.
pub const DATE_COLUMN: &str = "date";

/// The 18-column layout of an imported GA4 export, in insertion order.
pub const GA4_EXPORT_SCHEMA: TableSchema = TableSchema {
    columns: &[
        col("hostName", NAME),
        col(DATE_COLUMN, ColumnType::Date),
        col("pagePath", ColumnType::Text),
        col("pageTitle", ColumnType::Text),
        col("city", NAME),
        col("country", NAME),
        col("deviceCategory", NAME),
        col("sessionDefaultChannelGroup", NAME),
        col("totalUsers", ColumnType::Integer),
        col("newUsers", ColumnType::Integer),
        col("sessions", ColumnType::Integer),
        col("sessionsPerUser", RATE),
        col("screenPageViews", ColumnType::Integer),
        col("eventCount", ColumnType::Integer),
        col("engagementRate", RATE),
        col("engagedSessions", ColumnType::Integer),
        col("bounceRate", RATE),
        col(
            "averageSessionDuration",
            ColumnType::Decimal {
                precision: 18,
                scale: 8,
            },
        ),
    ],
};

// ---------------------------------------------------------------------------
// Table schema
// ---------------------------------------------------------------------------

/// Ordered list of columns for a destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    columns: &'static [ColumnDef],
}

impl TableSchema {
    pub const fn new(columns: &'static [ColumnDef]) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &'static [ColumnDef] {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this schema.
    pub fn create_table_sql(&self, table: &TableName) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(c.name), c.column_type.sql_type()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {table} ({columns})")
    }

    /// Parameterised single-row `INSERT` naming every column in schema order.
    pub fn insert_sql(&self, table: &TableName) -> String {
        let names = self
            .columns
            .iter()
            .map(|c| quote_ident(c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("${}::{}", i + 1, c.column_type.placeholder_cast()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT INTO {table} ({names}) VALUES ({placeholders})")
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// ---------------------------------------------------------------------------
// Table name
// ---------------------------------------------------------------------------

/// PostgreSQL truncates identifiers longer than this many bytes.
pub const MAX_TABLE_NAME_LEN: usize = 63;

/// A validated, unquoted SQL table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Accepts `[A-Za-z_][A-Za-z0-9_]*` up to [`MAX_TABLE_NAME_LEN`] bytes.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_start || !valid_rest || name.len() > MAX_TABLE_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "Invalid table name '{name}': use letters, digits and underscores \
                 (max {MAX_TABLE_NAME_LEN} characters, not starting with a digit)"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn export_schema_has_eighteen_columns_in_order() {
        let names: Vec<_> = GA4_EXPORT_SCHEMA.columns().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "hostName",
                "date",
                "pagePath",
                "pageTitle",
                "city",
                "country",
                "deviceCategory",
                "sessionDefaultChannelGroup",
                "totalUsers",
                "newUsers",
                "sessions",
                "sessionsPerUser",
                "screenPageViews",
                "eventCount",
                "engagementRate",
                "engagedSessions",
                "bounceRate",
                "averageSessionDuration",
            ]
        );
    }

    #[test]
    fn create_table_sql_quotes_columns_and_keeps_order() {
        let table = TableName::parse("ga4_export_data").unwrap();
        let sql = GA4_EXPORT_SCHEMA.create_table_sql(&table);
        assert!(sql.starts_with(
            "CREATE TABLE IF NOT EXISTS ga4_export_data (\"hostName\" VARCHAR(255), \"date\" DATE, "
        ));
        assert!(sql.ends_with("\"averageSessionDuration\" NUMERIC(18,8))"));
        assert!(sql.contains("\"sessionsPerUser\" NUMERIC(10,2)"));
        assert!(sql.contains("\"totalUsers\" INTEGER"));
    }

    #[test]
    fn insert_sql_has_one_cast_placeholder_per_column() {
        let table = TableName::parse("t").unwrap();
        let sql = GA4_EXPORT_SCHEMA.insert_sql(&table);
        assert!(sql.starts_with("INSERT INTO t (\"hostName\", \"date\", "));
        assert!(sql.contains("VALUES ($1::varchar, $2::date, $3::text"));
        assert!(sql.ends_with("$18::numeric)"));
        assert_eq!(sql.matches('$').count(), GA4_EXPORT_SCHEMA.len());
    }

    #[test]
    fn table_names_are_plain_identifiers() {
        assert_eq!(TableName::parse(" _ga4_2024 ").unwrap().as_str(), "_ga4_2024");
        assert_matches!(TableName::parse(""), Err(CoreError::Validation(_)));
        assert_matches!(TableName::parse("1table"), Err(CoreError::Validation(_)));
        assert_matches!(
            TableName::parse("t; DROP TABLE users"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            TableName::parse(&"a".repeat(MAX_TABLE_NAME_LEN + 1)),
            Err(CoreError::Validation(_))
        );
    }
}
