//! Server-rendered HTML pages for the export form.
//!
//! Every user-supplied string goes through [`escape`].

use std::fmt::Write;

use chrono::NaiveDate;
use ga4_analytics::ExportSummary;
use ga4_core::filter::{FilterCondition, SkippedFilter, ALL_CONDITIONS};
use ga4_core::report::MAX_FILTER_ROWS;

use crate::form::ExportForm;

const TITLE: &str = "GA4 Data Export Tool with Full Filter Options";

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n</head>\n<body>\n<h1>{TITLE}</h1>\n{body}</body>\n</html>\n"
    )
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// The export form, pre-filled from `form`, with an optional error banner.
pub fn render_form(form: &ExportForm, today: NaiveDate, error: Option<&str>) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h2>{today}</h2>");
    body.push_str(
        "<p>Specify dimensions, metrics, date range, and filters to fetch GA4 data.</p>\n",
    );
    if let Some(message) = error {
        let _ = writeln!(body, "<p class=\"error\" role=\"alert\">{}</p>", escape(message));
    }

    // Changing the number of filter rows reloads the form.
    let _ = writeln!(
        body,
        "<form method=\"get\" action=\"/\">\n\
         <label>Number of filters <input type=\"number\" name=\"filters\" min=\"0\" max=\"{MAX_FILTER_ROWS}\" value=\"{}\"></label>\n\
         <button type=\"submit\">Update</button>\n</form>",
        form.filters.len()
    );

    body.push_str("<form method=\"post\" action=\"/export\">\n");
    let _ = writeln!(
        body,
        "<p><label>Dimensions <input type=\"text\" name=\"dimensions\" value=\"{}\" \
         placeholder=\"Enter dimensions separated by commas (e.g., city, browser)\"></label></p>",
        escape(&form.dimensions)
    );
    let _ = writeln!(
        body,
        "<p><label>Metrics <input type=\"text\" name=\"metrics\" value=\"{}\" \
         placeholder=\"Enter metrics separated by commas (e.g., activeUsers, sessions)\"></label></p>",
        escape(&form.metrics)
    );
    let _ = writeln!(
        body,
        "<p><label>Start Date <input type=\"date\" name=\"start_date\" value=\"{}\"></label></p>",
        escape(&form.start_date)
    );
    let _ = writeln!(
        body,
        "<p><label>End Date <input type=\"date\" name=\"end_date\" value=\"{}\"></label></p>",
        escape(&form.end_date)
    );

    if !form.filters.is_empty() {
        body.push_str("<h3>Add Filters (Optional)</h3>\n");
    }
    for (i, filter) in form.filters.iter().enumerate() {
        let selected: Option<FilterCondition> = filter.condition.parse().ok();
        let _ = writeln!(body, "<fieldset>\n<legend>Filter {}</legend>", i + 1);
        let _ = writeln!(
            body,
            "<label>Dimension/Metric Name <input type=\"text\" name=\"filter_field_{i}\" value=\"{}\"></label>",
            escape(&filter.field)
        );
        let _ = writeln!(body, "<label>Condition <select name=\"filter_condition_{i}\">");
        for condition in ALL_CONDITIONS {
            let marker = if selected == Some(*condition) {
                " selected"
            } else {
                ""
            };
            let _ = writeln!(
                body,
                "<option value=\"{}\"{marker}>{}</option>",
                condition.as_str(),
                condition.label()
            );
        }
        body.push_str("</select></label>\n");
        let _ = writeln!(
            body,
            "<label>Value <input type=\"text\" name=\"filter_value_{i}\" value=\"{}\"></label>\n</fieldset>",
            escape(&filter.value)
        );
    }

    body.push_str("<button type=\"submit\">Fetch Data</button>\n</form>\n");
    page(&body)
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Success page with a download link for `file_name`.
pub fn render_export_result(
    file_name: &str,
    summary: &ExportSummary,
    skipped: &[SkippedFilter],
) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<p class=\"success\">Data export complete! File saved as {} ({} rows).</p>",
        escape(file_name),
        summary.rows
    );
    body.push_str(&render_warnings(skipped));
    let _ = writeln!(
        body,
        "<p><a href=\"/exports/{0}\" download=\"{0}\">Download CSV File</a></p>",
        escape(file_name)
    );
    body.push_str("<p><a href=\"/\">New export</a></p>\n");
    page(&body)
}

/// Failure page for an export that was attempted.
pub fn render_export_error(message: &str, skipped: &[SkippedFilter]) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<p class=\"error\" role=\"alert\">An error occurred: {}</p>",
        escape(message)
    );
    body.push_str(&render_warnings(skipped));
    body.push_str("<p><a href=\"/\">Back to the form</a></p>\n");
    page(&body)
}

fn render_warnings(skipped: &[SkippedFilter]) -> String {
    if skipped.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"warnings\">\n");
    for s in skipped {
        let _ = writeln!(out, "<li>{}</li>", escape(&s.to_string()));
    }
    out.push_str("</ul>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ga4_core::filter::{FilterSpec, SkipReason};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
    }

    #[test]
    fn escape_handles_markup_and_quotes() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn form_has_one_fieldset_per_filter_row() {
        let html = render_form(&ExportForm::blank(3, today()), today(), None);
        assert_eq!(html.matches("<fieldset>").count(), 3);
        assert!(html.contains("name=\"filter_value_2\""));
        assert!(!html.contains("name=\"filter_value_3\""));
        assert!(html.contains("value=\"2024-11-01\""));
        assert!(html.contains("value=\"2024-12-01\""));
        assert!(html.contains("<option value=\"not_contains\">does not contain</option>"));
    }

    #[test]
    fn form_keeps_submitted_values_escaped() {
        let mut form = ExportForm::blank(1, today());
        form.dimensions = "city\"><script>".to_string();
        form.filters[0] = FilterSpec::new("city", "does not contain", "x");
        let html = render_form(&form, today(), Some("End date <bad>"));
        assert!(html.contains("value=\"city&quot;&gt;&lt;script&gt;\""));
        assert!(html.contains("<option value=\"not_contains\" selected>"));
        assert!(html.contains("End date &lt;bad&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn result_lists_skipped_filters_and_download_link() {
        let summary = ExportSummary {
            pages: 1,
            rows: 42,
            header_written: true,
        };
        let skipped = [SkippedFilter {
            index: 1,
            reason: SkipReason::MissingValue,
        }];
        let html = render_export_result("export_2024-11-01_to_2024-11-30.csv", &summary, &skipped);
        assert!(html.contains("(42 rows)"));
        assert!(html.contains("<li>Filter 2 skipped: no value</li>"));
        assert!(html.contains("href=\"/exports/export_2024-11-01_to_2024-11-30.csv\""));
    }
}
