//! Typed cell values parsed from CSV text for a destination column.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::schema::ColumnType;

/// A single value bound into an `INSERT`.
///
/// Absent or blank input becomes [`CellValue::Null`], which is written as SQL
/// `NULL` regardless of the column type.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i64),
    /// Kept as validated text so no precision is lost before PostgreSQL
    /// casts it to `NUMERIC`.
    Decimal(String),
    Date(NaiveDate),
}

impl CellValue {
    /// Parse `raw` for a column of `column_type`.
    ///
    /// Dates that cannot be read become `Null`; malformed numbers are a
    /// validation error.
    pub fn parse(column_type: ColumnType, raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::Null);
        }

        match column_type {
            ColumnType::Varchar(_) | ColumnType::Text => Ok(Self::Text(raw.to_string())),
            ColumnType::Integer => trimmed
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| CoreError::Validation(format!("'{trimmed}' is not an integer"))),
            ColumnType::Decimal { .. } => match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Self::Decimal(trimmed.to_string())),
                _ => Err(CoreError::Validation(format!(
                    "'{trimmed}' is not a decimal number"
                ))),
            },
            ColumnType::Date => Ok(normalize_date(trimmed).map_or(Self::Null, Self::Date)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Read a GA4 date.
///
/// Accepts the 8-digit `YYYYMMDD` form GA4 exports and the ISO `YYYY-MM-DD`
/// form. Anything else, including impossible calendar dates, is `None`.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let year = raw[0..4].parse().ok()?;
        let month = raw[4..6].parse().ok()?;
        let day = raw[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn compact_dates_are_rewritten() {
        assert_eq!(normalize_date("20241101"), Some(date(2024, 11, 1)));
        assert_eq!(
            normalize_date("20241101").unwrap().to_string(),
            "2024-11-01"
        );
    }

    #[test]
    fn iso_dates_pass_through() {
        assert_eq!(normalize_date("2024-11-30"), Some(date(2024, 11, 30)));
    }

    #[test]
    fn bad_dates_are_none() {
        assert_eq!(normalize_date("notadate"), None);
        assert_eq!(normalize_date("20241341"), None);
        assert_eq!(normalize_date("2024110"), None);
        assert_eq!(normalize_date(""), None);
    }

    #[test]
    fn unreadable_date_cell_is_null_not_error() {
        assert_eq!(
            CellValue::parse(ColumnType::Date, "notadate").unwrap(),
            CellValue::Null
        );
        assert_eq!(
            CellValue::parse(ColumnType::Date, "20241101").unwrap(),
            CellValue::Date(date(2024, 11, 1))
        );
    }

    #[test]
    fn blank_cells_are_null_for_every_type() {
        for ty in [
            ColumnType::Varchar(255),
            ColumnType::Text,
            ColumnType::Integer,
            ColumnType::Decimal {
                precision: 10,
                scale: 2,
            },
            ColumnType::Date,
        ] {
            assert!(CellValue::parse(ty, "  ").unwrap().is_null(), "{ty:?}");
        }
    }

    #[test]
    fn numbers_are_validated() {
        assert_eq!(
            CellValue::parse(ColumnType::Integer, " 42 ").unwrap(),
            CellValue::Integer(42)
        );
        assert_eq!(
            CellValue::parse(
                ColumnType::Decimal {
                    precision: 18,
                    scale: 8
                },
                "12.34567891"
            )
            .unwrap(),
            CellValue::Decimal("12.34567891".to_string())
        );
        assert_matches!(
            CellValue::parse(ColumnType::Integer, "4.5"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            CellValue::parse(
                ColumnType::Decimal {
                    precision: 10,
                    scale: 2
                },
                "NaN"
            ),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn text_keeps_surrounding_whitespace() {
        assert_eq!(
            CellValue::parse(ColumnType::Text, " /home ").unwrap(),
            CellValue::Text(" /home ".to_string())
        );
    }
}
