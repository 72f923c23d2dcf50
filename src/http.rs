//! HTTP transport module for the seo-audit server
//!
//! Provides the Axum router: the audit endpoint, a static landing form,
//! and plain-JSON health/metrics endpoints. A middleware layer in front of
//! the API records request counters and latencies.

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    middleware,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::{cmp::Ordering, sync::Arc};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::{AuditError, Result};
use crate::score::AuditReport;
use crate::{extract, fetch, score};

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<Config>,
    pub client: reqwest::Client,
    pub metrics: Arc<Mutex<HttpMetrics>>,
}

/// Metrics for HTTP server
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    pub total_requests: u64,
    pub last_request_unix: u64,
    pub errors_total: u64,
    pub latencies: Vec<f64>, // ring buffer for p95
}

impl HttpMetrics {
    pub fn new() -> Self {
        Self {
            total_requests: 0,
            last_request_unix: std::time::SystemTime::UNIX_EPOCH
                .elapsed()
                .unwrap_or_default()
                .as_secs(),
            errors_total: 0,
            latencies: Vec::with_capacity(256),
        }
    }
}

impl Default for HttpMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Audit request body. `keywords` defaults to empty; `url` is validated in
/// the handler so a missing field gets the documented 400 instead of a
/// generic deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// POST /api/audit: fetch the page, extract signals, score keywords.
pub async fn audit_handler(
    State(state): State<HttpState>,
    Json(request): Json<AuditRequest>,
) -> Result<Json<AuditReport>> {
    let url = match request.url.as_deref().map(str::trim) {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => {
            return Err(AuditError::Validation {
                message: "URL is required.".to_string(),
            });
        }
    };

    tracing::info!(url = %url, keywords = request.keywords.len(), "running audit");

    let html = fetch::fetch_page(&state.client, &url, state.config.fetch.max_body_bytes).await?;
    let signals = extract::extract_signals(&html);
    tracing::debug!(?signals, "extracted page signals");

    Ok(Json(score::build_report(url, request.keywords, &signals)))
}

/// Any non-POST method on the audit route
async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Only POST requests allowed" })),
    )
}

/// Landing form posting to /api/audit
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("../assets/index.html"))
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Metrics endpoint
pub async fn metrics_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let metrics = state.metrics.lock().await.clone();

    // Compute latency stats
    let (avg_latency_ms, p95_latency_ms) = if metrics.latencies.is_empty() {
        (None, None)
    } else {
        let sum: f64 = metrics.latencies.iter().sum();
        let avg = sum / metrics.latencies.len() as f64;
        let mut sorted = metrics.latencies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let p95_idx = (sorted.len() as f64 * 0.95) as usize;
        let p95 = sorted.get(p95_idx).copied();
        (Some(avg), p95)
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json!({
            "metrics_version": "1",
            "total_requests": metrics.total_requests,
            "last_request_unix": metrics.last_request_unix,
            "errors_total": metrics.errors_total,
            "avg_latency_ms": avg_latency_ms,
            "p95_latency_ms": p95_latency_ms
        })
        .to_string(),
    )
}

/// Request-metrics middleware; only API traffic is counted.
async fn track_metrics(
    State(metrics): State<Arc<Mutex<HttpMetrics>>>,
    req: axum::http::Request<Body>,
    next: middleware::Next,
) -> axum::response::Response {
    let is_api = req.uri().path().starts_with("/api/");
    let start = if is_api {
        Some(std::time::Instant::now())
    } else {
        None
    };
    let resp = next.run(req).await;
    if let Some(start_time) = start {
        let latency_ms = start_time.elapsed().as_millis() as f64;
        let mut m = metrics.lock().await;
        if latency_ms > 0.0 {
            m.latencies.push(latency_ms);
            if m.latencies.len() > 256 {
                m.latencies.remove(0);
            }
        }
        if !resp.status().is_success() {
            m.errors_total = m.errors_total.saturating_add(1);
        }
        m.total_requests = m.total_requests.saturating_add(1);
        m.last_request_unix = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
    }
    resp
}

/// Build the application router over the given state.
pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(
            "/api/audit",
            post(audit_handler).fallback(method_not_allowed),
        )
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(
                    state.metrics.clone(),
                    track_metrics,
                ))
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any)),
        )
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(config: Config) -> Result<()> {
    let client = fetch::build_client(&config)?;
    let state = HttpState {
        config: Arc::new(config),
        client,
        metrics: Arc::new(Mutex::new(HttpMetrics::new())),
    };
    let bind = state.config.runtime.http_bind;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| AuditError::Internal {
            message: format!("Failed to bind HTTP listener: {}", e),
        })?;

    tracing::info!("Starting HTTP server on {}", bind);

    axum::serve(listener, app)
        .await
        .map_err(|e| AuditError::Internal {
            message: format!("HTTP server error: {}", e),
        })?;

    Ok(())
}
