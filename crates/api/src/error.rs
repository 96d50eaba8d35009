use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ga4_analytics::AnalyticsError;
use ga4_core::error::CoreError;
use ga4_importer::ImportError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the library errors and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses; the HTML
/// handlers use [`AppError::classify`] to show the same message in a page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A dependency the request needs is not configured or not reachable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl AppError {
    /// HTTP status, error code and user-facing message for this error.
    ///
    /// Internal details are logged here and replaced by a generic message.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Analytics(err) => classify_analytics_error(err),
            AppError::Import(err) => classify_import_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Classify an analytics error.
///
/// - Filters the API cannot express map to 400.
/// - Failures talking to Google (token, request, API status) map to 502 and
///   keep their message, which the user needs to fix property or field names.
/// - Local problems (credentials, disk) map to 500 with a sanitized message.
fn classify_analytics_error(err: &AnalyticsError) -> (StatusCode, &'static str, String) {
    match err {
        AnalyticsError::InvalidFilter(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        AnalyticsError::ApiError { .. }
        | AnalyticsError::Token { .. }
        | AnalyticsError::Request(_) => {
            tracing::warn!(error = %err, "Analytics request failed");
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
        }
        AnalyticsError::CredentialsIo { .. }
        | AnalyticsError::Credentials(_)
        | AnalyticsError::Csv(_)
        | AnalyticsError::Io(_) => {
            tracing::error!(error = %err, "Export failed");
            internal()
        }
    }
}

/// Classify an import error.
///
/// Input problems keep their message; database failures are logged and
/// sanitized, except that a failed insert reports the row that was rejected.
fn classify_import_error(err: &ImportError) -> (StatusCode, &'static str, String) {
    match err {
        ImportError::FileNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        e if e.is_input_error() => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
        ImportError::Connect(source) => {
            tracing::error!(error = %source, "Import database connection failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "Could not connect to the database".to_string(),
            )
        }
        ImportError::Insert { row, source } => {
            tracing::error!(row, error = %source, "Import insert failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "IMPORT_FAILED",
                format!("Row {row} was rejected by the database; nothing was imported"),
            )
        }
        other => {
            tracing::error!(error = %other, "Import failed");
            internal()
        }
    }
}
