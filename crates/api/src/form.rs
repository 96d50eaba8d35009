//! The export form: defaults, submitted fields and their conversion into a
//! report query.

use std::collections::HashMap;

use chrono::NaiveDate;
use ga4_core::error::CoreError;
use ga4_core::filter::{build_filter_expression, FilterCondition, FilterSpec, SkippedFilter};
use ga4_core::report::{
    parse_field_list, parse_form_date, DateRange, ReportQuery, DATE_FORMAT, MAX_FILTER_ROWS,
};

/// Start date pre-filled on a fresh form.
pub const DEFAULT_START_DATE: &str = "2024-11-01";

/// Values of the export form, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportForm {
    pub dimensions: String,
    pub metrics: String,
    pub start_date: String,
    pub end_date: String,
    pub filters: Vec<FilterSpec>,
}

/// A validated export request.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub query: ReportQuery,
    /// Filter rows the user filled in but that were left out of the query.
    pub skipped: Vec<SkippedFilter>,
}

impl ExportForm {
    /// A blank form with `filter_rows` empty filter rows (clamped to
    /// [`MAX_FILTER_ROWS`]) and the end date set to `today`.
    pub fn blank(filter_rows: usize, today: NaiveDate) -> Self {
        let empty_filter = FilterSpec::new("", FilterCondition::Equals.as_str(), "");
        Self {
            dimensions: String::new(),
            metrics: String::new(),
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: today.format(DATE_FORMAT).to_string(),
            filters: vec![empty_filter; filter_rows.min(MAX_FILTER_ROWS)],
        }
    }

    /// Read submitted fields.
    ///
    /// Filter rows are `filter_field_{i}`, `filter_condition_{i}` and
    /// `filter_value_{i}` for `i` from 0; reading stops at the first index
    /// with none of the three present.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();

        let mut filters = Vec::new();
        for i in 0..MAX_FILTER_ROWS {
            let field = fields.get(&format!("filter_field_{i}"));
            let condition = fields.get(&format!("filter_condition_{i}"));
            let value = fields.get(&format!("filter_value_{i}"));
            if field.is_none() && condition.is_none() && value.is_none() {
                break;
            }
            filters.push(FilterSpec::new(
                field.cloned().unwrap_or_default(),
                condition.cloned().unwrap_or_default(),
                value.cloned().unwrap_or_default(),
            ));
        }

        Self {
            dimensions: get("dimensions"),
            metrics: get("metrics"),
            start_date: get("start_date"),
            end_date: get("end_date"),
            filters,
        }
    }

    /// Validate the form and build the report query.
    pub fn plan(&self) -> Result<ExportPlan, CoreError> {
        let dimensions = parse_field_list(&self.dimensions);
        let metrics = parse_field_list(&self.metrics);
        if dimensions.is_empty() || metrics.is_empty() {
            return Err(CoreError::Validation(
                "Please fill in all fields: at least one dimension and one metric are required"
                    .to_string(),
            ));
        }

        let start = parse_form_date("Start date", &self.start_date)?;
        let end = parse_form_date("End date", &self.end_date)?;
        let date_range = DateRange::new(start, end)?;

        let build = build_filter_expression(&self.filters);
        // Rows left completely empty are not worth a warning.
        let skipped = build
            .skipped
            .into_iter()
            .filter(|s| {
                self.filters
                    .get(s.index)
                    .is_some_and(|f| !f.field.trim().is_empty() || !f.value.is_empty())
            })
            .collect();

        let query = ReportQuery::new(dimensions, metrics, date_range, build.expression)?;
        Ok(ExportPlan { query, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ga4_core::filter::{FilterExpression, SkipReason};

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("dimensions", "city, deviceCategory"),
            ("metrics", "sessions"),
            ("start_date", "2024-11-01"),
            ("end_date", "2024-11-30"),
        ]
    }

    #[test]
    fn blank_form_clamps_filter_rows() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let form = ExportForm::blank(25, today);
        assert_eq!(form.filters.len(), MAX_FILTER_ROWS);
        assert_eq!(form.start_date, "2024-11-01");
        assert_eq!(form.end_date, "2025-01-15");
    }

    #[test]
    fn filter_rows_are_read_in_index_order_until_a_gap() {
        let mut pairs = base();
        pairs.extend([
            ("filter_field_0", "city"),
            ("filter_condition_0", "contains"),
            ("filter_value_0", "Par"),
            ("filter_field_1", "country"),
            ("filter_condition_1", "in_list"),
            ("filter_value_1", "FR,DE"),
            ("filter_field_3", "ignored"),
        ]);
        let form = ExportForm::from_fields(&fields(&pairs));
        assert_eq!(form.filters.len(), 2);
        assert_eq!(form.filters[1], FilterSpec::new("country", "in_list", "FR,DE"));
    }

    #[test]
    fn plan_builds_query_with_trimmed_fields() {
        let mut pairs = base();
        pairs.extend([
            ("filter_field_0", "city"),
            ("filter_condition_0", "equals"),
            ("filter_value_0", "Paris"),
        ]);
        let plan = ExportForm::from_fields(&fields(&pairs)).plan().unwrap();
        assert_eq!(plan.query.dimensions, vec!["city", "deviceCategory"]);
        assert_eq!(plan.query.metrics, vec!["sessions"]);
        assert_matches!(
            plan.query.filter,
            Some(FilterExpression::StringMatch { ref field, .. }) if field == "city"
        );
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn missing_metrics_is_a_validation_error() {
        let form = ExportForm::from_fields(&fields(&[
            ("dimensions", "city"),
            ("metrics", " , "),
            ("start_date", "2024-11-01"),
            ("end_date", "2024-11-30"),
        ]));
        assert_matches!(form.plan(), Err(CoreError::Validation(msg)) if msg.contains("fill in"));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let form = ExportForm::from_fields(&fields(&[
            ("dimensions", "city"),
            ("metrics", "sessions"),
            ("start_date", "2024-11-30"),
            ("end_date", "2024-11-01"),
        ]));
        assert_matches!(form.plan(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_partially_filled_rows_are_reported_as_skipped() {
        let mut pairs = base();
        pairs.extend([
            ("filter_field_0", ""),
            ("filter_condition_0", "equals"),
            ("filter_value_0", ""),
            ("filter_field_1", "city"),
            ("filter_condition_1", "equals"),
            ("filter_value_1", ""),
        ]);
        let plan = ExportForm::from_fields(&fields(&pairs)).plan().unwrap();
        assert!(plan.query.filter.is_none());
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].index, 1);
        assert_eq!(plan.skipped[0].reason, SkipReason::MissingValue);
    }
}
