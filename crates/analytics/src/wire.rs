//! JSON bodies of the `runReport` method.
//!
//! Request types borrow from the [`ReportRequest`]; response types are owned
//! and converted into a [`ReportPage`].

use ga4_core::filter::{FilterExpression, MatchType};
use ga4_core::report::{ReportPage, ReportRequest, ReportRow};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunReportBody<'a> {
    dimensions: Vec<NamedField<'a>>,
    metrics: Vec<NamedField<'a>>,
    date_ranges: Vec<WireDateRange>,
    limit: u64,
    offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension_filter: Option<WireExpression<'a>>,
}

#[derive(Debug, Serialize)]
struct NamedField<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDateRange {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum WireExpression<'a> {
    AndGroup { expressions: Vec<WireExpression<'a>> },
    NotExpression(Box<WireExpression<'a>>),
    Filter(WireFilter<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireFilter<'a> {
    field_name: &'a str,
    #[serde(flatten)]
    kind: WireFilterKind<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum WireFilterKind<'a> {
    #[serde(rename_all = "camelCase")]
    StringFilter {
        match_type: &'static str,
        value: &'a str,
        case_sensitive: bool,
    },
    #[serde(rename_all = "camelCase")]
    InListFilter {
        values: &'a [String],
        case_sensitive: bool,
    },
    NumericFilter {
        operation: &'static str,
        value: WireNumber,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum WireNumber {
    Int64Value(String),
    DoubleValue(f64),
}

impl<'a> RunReportBody<'a> {
    pub(crate) fn from_request(request: &ReportRequest<'a>) -> Result<Self, AnalyticsError> {
        let query = request.query;
        let dimension_filter = query.filter.as_ref().map(encode_expression).transpose()?;

        Ok(Self {
            dimensions: query
                .dimensions
                .iter()
                .map(|name| NamedField { name })
                .collect(),
            metrics: query.metrics.iter().map(|name| NamedField { name }).collect(),
            date_ranges: vec![WireDateRange {
                start_date: query.date_range.start_str(),
                end_date: query.date_range.end_str(),
            }],
            limit: request.limit,
            offset: request.offset,
            dimension_filter,
        })
    }
}

fn encode_expression(expr: &FilterExpression) -> Result<WireExpression<'_>, AnalyticsError> {
    Ok(match expr {
        FilterExpression::Conjunction { children } => WireExpression::AndGroup {
            expressions: children
                .iter()
                .map(encode_expression)
                .collect::<Result<_, _>>()?,
        },
        FilterExpression::Negation { child } => {
            WireExpression::NotExpression(Box::new(encode_expression(child)?))
        }
        FilterExpression::ListMatch { field, values } => WireExpression::Filter(WireFilter {
            field_name: field,
            kind: WireFilterKind::InListFilter {
                values,
                case_sensitive: false,
            },
        }),
        FilterExpression::StringMatch {
            field,
            value,
            match_type,
            case_sensitive,
        } => WireExpression::Filter(WireFilter {
            field_name: field,
            kind: encode_match(field, value, *match_type, *case_sensitive)?,
        }),
    })
}

/// Comparisons become numeric filters; the API's string filter has no
/// ordering operators. Regular expressions must match the whole value.
fn encode_match<'a>(
    field: &str,
    value: &'a str,
    match_type: MatchType,
    case_sensitive: bool,
) -> Result<WireFilterKind<'a>, AnalyticsError> {
    let string_filter = |match_type: &'static str| WireFilterKind::StringFilter {
        match_type,
        value,
        case_sensitive,
    };

    Ok(match match_type {
        MatchType::Exact => string_filter("EXACT"),
        MatchType::Contains => string_filter("CONTAINS"),
        MatchType::BeginsWith => string_filter("BEGINS_WITH"),
        MatchType::EndsWith => string_filter("ENDS_WITH"),
        MatchType::Regexp => string_filter("FULL_REGEXP"),
        MatchType::GreaterThan | MatchType::LessThan => WireFilterKind::NumericFilter {
            operation: match_type.as_str(),
            value: parse_number(field, value)?,
        },
    })
}

fn parse_number(field: &str, value: &str) -> Result<WireNumber, AnalyticsError> {
    let trimmed = value.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(WireNumber::Int64Value(int.to_string()));
    }
    match trimmed.parse::<f64>() {
        Ok(double) if double.is_finite() => Ok(WireNumber::DoubleValue(double)),
        _ => Err(AnalyticsError::InvalidFilter(format!(
            "'{value}' is not a number; greater/less than on '{field}' needs a numeric value"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunReportResponse {
    #[serde(default)]
    dimension_headers: Vec<HeaderName>,
    #[serde(default)]
    metric_headers: Vec<HeaderName>,
    #[serde(default)]
    rows: Vec<WireRow>,
    #[serde(default)]
    pub(crate) row_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct HeaderName {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRow {
    #[serde(default)]
    dimension_values: Vec<WireValue>,
    #[serde(default)]
    metric_values: Vec<WireValue>,
}

#[derive(Debug, Deserialize)]
struct WireValue {
    #[serde(default)]
    value: String,
}

impl From<RunReportResponse> for ReportPage {
    fn from(response: RunReportResponse) -> Self {
        let values = |v: Vec<WireValue>| v.into_iter().map(|x| x.value).collect();
        Self {
            dimension_headers: response.dimension_headers.into_iter().map(|h| h.name).collect(),
            metric_headers: response.metric_headers.into_iter().map(|h| h.name).collect(),
            rows: response
                .rows
                .into_iter()
                .map(|row| ReportRow {
                    dimension_values: values(row.dimension_values),
                    metric_values: values(row.metric_values),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
