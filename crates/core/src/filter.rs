//! Filter conditions entered on the export form and the expression tree
//! handed to the reporting API.
//!
//! The builder never fails: rows with a blank field, condition or value, or
//! with a condition outside the vocabulary, are skipped and reported back in
//! [`FilterBuild::skipped`] so the caller can show them to the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A filter condition selectable on the export form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    InList,
    ExactMatch,
    NotContains,
    NotStartsWith,
    NotEndsWith,
    Regex,
}

/// Every condition, in the order the form lists them.
pub const ALL_CONDITIONS: &[FilterCondition] = &[
    FilterCondition::Equals,
    FilterCondition::Contains,
    FilterCondition::StartsWith,
    FilterCondition::EndsWith,
    FilterCondition::GreaterThan,
    FilterCondition::LessThan,
    FilterCondition::InList,
    FilterCondition::ExactMatch,
    FilterCondition::NotContains,
    FilterCondition::NotStartsWith,
    FilterCondition::NotEndsWith,
    FilterCondition::Regex,
];

impl FilterCondition {
    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::InList => "in_list",
            Self::ExactMatch => "exact_match",
            Self::NotContains => "not_contains",
            Self::NotStartsWith => "not_starts_with",
            Self::NotEndsWith => "not_ends_with",
            Self::Regex => "regex",
        }
    }

    /// Human label shown in the condition drop-down.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExactMatch => "exact match",
            Self::NotContains => "does not contain",
            Self::NotStartsWith => "does not begin with",
            Self::NotEndsWith => "does not end with",
            Self::Regex => "regular expressions",
            other => other.as_str(),
        }
    }

    /// The string match type used for this condition, or `None` for
    /// [`FilterCondition::InList`] which becomes a list match instead.
    pub fn match_type(&self) -> Option<MatchType> {
        match self {
            Self::Equals | Self::ExactMatch => Some(MatchType::Exact),
            Self::Contains | Self::NotContains => Some(MatchType::Contains),
            Self::StartsWith | Self::NotStartsWith => Some(MatchType::BeginsWith),
            Self::EndsWith | Self::NotEndsWith => Some(MatchType::EndsWith),
            Self::GreaterThan => Some(MatchType::GreaterThan),
            Self::LessThan => Some(MatchType::LessThan),
            Self::Regex => Some(MatchType::Regexp),
            Self::InList => None,
        }
    }

    /// Whether the leaf must be wrapped in a [`FilterExpression::Negation`].
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            Self::NotContains | Self::NotStartsWith | Self::NotEndsWith
        )
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCondition {
    type Err = CoreError;

    /// Accepts either the snake_case identifier or the form label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ALL_CONDITIONS
            .iter()
            .copied()
            .find(|c| c.as_str() == s || c.label() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown filter condition '{s}'")))
    }
}

/// Match types understood by a string match leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Exact,
    Contains,
    BeginsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    Regexp,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "EXACT",
            Self::Contains => "CONTAINS",
            Self::BeginsWith => "BEGINS_WITH",
            Self::EndsWith => "ENDS_WITH",
            Self::GreaterThan => "GREATER_THAN",
            Self::LessThan => "LESS_THAN",
            Self::Regexp => "REGEXP",
        }
    }
}

// ---------------------------------------------------------------------------
// Input rows and the expression tree
// ---------------------------------------------------------------------------

/// One filter row as submitted on the form.
///
/// The condition is kept as raw text so that blank or unknown conditions can
/// be reported instead of rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub condition: String,
    pub value: String,
}

impl FilterSpec {
    pub fn new(
        field: impl Into<String>,
        condition: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            condition: condition.into(),
            value: value.into(),
        }
    }
}

/// A boolean predicate tree restricting which report rows are returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpression {
    StringMatch {
        field: String,
        value: String,
        match_type: MatchType,
        case_sensitive: bool,
    },
    ListMatch {
        field: String,
        values: Vec<String>,
    },
    Negation {
        child: Box<FilterExpression>,
    },
    Conjunction {
        children: Vec<FilterExpression>,
    },
}

/// Why a filter row was left out of the expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingField,
    MissingCondition,
    MissingValue,
    UnknownCondition(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => f.write_str("no dimension/metric name"),
            Self::MissingCondition => f.write_str("no condition"),
            Self::MissingValue => f.write_str("no value"),
            Self::UnknownCondition(c) => write!(f, "unknown condition '{c}'"),
        }
    }
}

/// A filter row that did not make it into the expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFilter {
    /// Zero-based position of the row in the submitted sequence.
    pub index: usize,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filter {} skipped: {}", self.index + 1, self.reason)
    }
}

/// Result of [`build_filter_expression`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBuild {
    /// `None` when no row was usable.
    pub expression: Option<FilterExpression>,
    pub skipped: Vec<SkippedFilter>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Combine the submitted filter rows into a single expression.
///
/// - 0 usable rows: no expression.
/// - 1 usable row: that leaf (or its negation) on its own.
/// - 2+ usable rows: a conjunction over all of them, in input order.
pub fn build_filter_expression(specs: &[FilterSpec]) -> FilterBuild {
    let mut nodes = Vec::with_capacity(specs.len());
    let mut skipped = Vec::new();

    for (index, spec) in specs.iter().enumerate() {
        match leaf_for(spec) {
            Ok(node) => nodes.push(node),
            Err(reason) => skipped.push(SkippedFilter { index, reason }),
        }
    }

    let expression = match nodes.len() {
        0 => None,
        1 => nodes.pop(),
        _ => Some(FilterExpression::Conjunction { children: nodes }),
    };

    FilterBuild {
        expression,
        skipped,
    }
}

fn leaf_for(spec: &FilterSpec) -> Result<FilterExpression, SkipReason> {
    let field = spec.field.trim();
    if field.is_empty() {
        return Err(SkipReason::MissingField);
    }
    if spec.condition.trim().is_empty() {
        return Err(SkipReason::MissingCondition);
    }
    if spec.value.is_empty() {
        return Err(SkipReason::MissingValue);
    }
    let condition: FilterCondition = spec
        .condition
        .parse()
        .map_err(|_| SkipReason::UnknownCondition(spec.condition.trim().to_string()))?;

    let leaf = match condition.match_type() {
        None => FilterExpression::ListMatch {
            field: field.to_string(),
            // Literal substrings between commas; no trimming.
            values: spec.value.split(',').map(str::to_string).collect(),
        },
        Some(match_type) => FilterExpression::StringMatch {
            field: field.to_string(),
            value: spec.value.clone(),
            match_type,
            case_sensitive: false,
        },
    };

    if condition.is_negated() {
        Ok(FilterExpression::Negation {
            child: Box::new(leaf),
        })
    } else {
        Ok(leaf)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
