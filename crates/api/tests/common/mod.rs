#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use ga4_analytics::{AnalyticsError, ReportSource};
use ga4_core::filter::FilterExpression;
use ga4_core::report::{ReportPage, ReportRequest, ReportRow};
use http_body_util::BodyExt;
use tower::ServiceExt;

use ga4_api::config::ServerConfig;
use ga4_api::router::build_app_router;
use ga4_api::state::AppState;

// ---------------------------------------------------------------------------
// Mock report source
// ---------------------------------------------------------------------------

/// A request as seen by [`MockSource`].
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub offset: u64,
    pub dimensions: Vec<String>,
    pub filter: Option<FilterExpression>,
}

/// Answers every request with `rows` rows, or with `error` when set.
pub struct MockSource {
    pub rows: usize,
    pub error: Option<(u16, String)>,
    pub seen: Mutex<Vec<SeenRequest>>,
}

impl MockSource {
    pub fn with_rows(rows: usize) -> Arc<Self> {
        Arc::new(Self {
            rows,
            error: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            rows: 0,
            error: Some((status, body.to_string())),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSource for MockSource {
    fn property_id(&self) -> &str {
        "123456"
    }

    async fn run_report(&self, request: &ReportRequest<'_>) -> Result<ReportPage, AnalyticsError> {
        self.seen.lock().unwrap().push(SeenRequest {
            offset: request.offset,
            dimensions: request.query.dimensions.clone(),
            filter: request.query.filter.clone(),
        });

        if let Some((status, body)) = &self.error {
            return Err(AnalyticsError::ApiError {
                status: *status,
                body: body.clone(),
            });
        }

        Ok(ReportPage {
            dimension_headers: request.query.dimensions.clone(),
            metric_headers: request.query.metrics.clone(),
            rows: (0..self.rows)
                .map(|i| ReportRow {
                    dimension_values: vec![format!("value-{i}"); request.query.dimensions.len()],
                    metric_values: vec![i.to_string(); request.query.metrics.len()],
                })
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` writing exports into `export_dir`.
pub fn test_config(export_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        export_dir: export_dir.to_path_buf(),
        database_url: None,
    }
}

/// Build the full application router around `source` and `config`.
pub fn build_test_app_with(source: Arc<dyn ReportSource>, config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        report_source: source,
    };
    build_app_router(state, &config)
}

pub fn build_test_app(source: Arc<dyn ReportSource>, export_dir: &Path) -> Router {
    build_test_app_with(source, test_config(export_dir))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(app: Router, uri: &str, fields: &[(&str, &str)]) -> Response {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencode(k), urlencode(v)))
        .collect::<Vec<_>>()
        .join("&");
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Percent-encode a form value (`application/x-www-form-urlencoded`).
fn urlencode(input: &str) -> String {
    let mut out = String::new();
    for b in input.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
