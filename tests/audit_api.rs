//! End-to-end tests for the audit HTTP surface.
//!
//! Requests are driven straight through the router with `oneshot`; the
//! successful-audit path fetches from a fixture page served on an ephemeral
//! local listener, so no external network is involved.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Html,
    routing::get,
};
use seo_audit::{
    config::Config,
    fetch,
    http::{HttpMetrics, HttpState, build_router},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

fn app_with(config: Config) -> Router {
    let client = fetch::build_client(&config).expect("client should build");
    build_router(HttpState {
        config: Arc::new(config),
        client,
        metrics: Arc::new(Mutex::new(HttpMetrics::new())),
    })
}

fn app() -> Router {
    app_with(Config::default())
}

fn audit_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/audit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Serve a fixture page on an ephemeral port, returning its base URL.
async fn serve_fixture(html: &'static str) -> String {
    let fixture = Router::new().route("/", get(move || async move { Html(html) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("fixture listener should bind");
    let addr = listener.local_addr().expect("fixture addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, fixture).await;
    });
    format!("http://{}/", addr)
}

#[tokio::test]
async fn missing_url_returns_400() {
    let response = app().oneshot(audit_request(json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "URL is required." }));
}

#[tokio::test]
async fn empty_url_returns_400() {
    let response = app()
        .oneshot(audit_request(json!({ "url": "", "keywords": ["seo"] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "URL is required.");
}

#[tokio::test]
async fn get_on_audit_route_returns_405() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/audit")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "Only POST requests allowed" }));
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn successful_audit_reports_score_and_suggestions() {
    let url = serve_fixture(
        r#"<html>
            <head><title>SEO Audit Tool</title></head>
            <body>
                <h1>Welcome</h1>
                <img src="a.png">
                <img src="b.png">
            </body>
        </html>"#,
    )
    .await;

    let response = app()
        .oneshot(audit_request(
            json!({ "url": url, "keywords": ["seo", "audit"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    assert_eq!(report["url"], url);
    assert_eq!(report["score"], 20);
    assert_eq!(report["keywords"], json!(["seo", "audit"]));

    let suggestions: Vec<String> = report["suggestions"]
        .as_array()
        .expect("suggestions should be an array")
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect();
    assert!(suggestions.contains(&r#"Use "seo" in the meta description."#.to_string()));
    assert!(suggestions.contains(&r#"Use "audit" in the meta description."#.to_string()));
    assert!(suggestions.contains(&r#"Include "audit" in the H1 tag."#.to_string()));
    assert!(suggestions.contains(&"2 image(s) missing alt tags.".to_string()));
}

#[tokio::test]
async fn clean_page_gets_default_suggestion() {
    let url = serve_fixture(
        r#"<html>
            <head>
                <title>Rust SEO guide</title>
                <meta name="description" content="A Rust SEO guide.">
            </head>
            <body><h1>Rust SEO guide</h1></body>
        </html>"#,
    )
    .await;

    let response = app()
        .oneshot(audit_request(json!({ "url": url, "keywords": ["seo"] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    // 30 keyword points plus the flat image bonus
    assert_eq!(report["score"], 40);
    assert_eq!(report["suggestions"], json!(["No issues found! Great job."]));
}

#[tokio::test]
async fn keywords_default_to_empty() {
    let url = serve_fixture("<html><head><title>t</title></head><body></body></html>").await;

    let response = app()
        .oneshot(audit_request(json!({ "url": url })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    assert_eq!(report["score"], 10);
    assert_eq!(report["keywords"], json!([]));
}

#[tokio::test]
async fn fetch_failure_returns_fixed_500_message() {
    // Bind then drop to find a port nothing is listening on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let response = app()
        .oneshot(audit_request(json!({
            "url": format!("http://127.0.0.1:{}/", port),
            "keywords": ["seo"]
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Failed to analyze site. The site may be blocking this tool, or the URL may be invalid."
    );
}

#[tokio::test]
async fn oversized_body_returns_fixed_500_message() {
    let page: &'static str = Box::leak(
        format!(
            "<html><head><title>big</title></head><body>{}</body></html>",
            "x".repeat(4096)
        )
        .into_boxed_str(),
    );
    let url = serve_fixture(page).await;

    let mut config = Config::default();
    config.fetch.max_body_bytes = 64;

    let response = app_with(config)
        .oneshot(audit_request(json!({ "url": url, "keywords": ["seo"] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Failed to analyze site. The site may be blocking this tool, or the URL may be invalid."
    );
}

#[tokio::test]
async fn body_under_cap_is_audited_normally() {
    let url = serve_fixture("<html><head><title>seo</title></head><body></body></html>").await;

    let mut config = Config::default();
    config.fetch.max_body_bytes = 4096;

    let response = app_with(config)
        .oneshot(audit_request(json!({ "url": url, "keywords": ["seo"] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    // title hit plus the flat image bonus
    assert_eq!(report["score"], 20);
}

#[tokio::test]
async fn metrics_count_api_traffic_only() {
    let app = app();

    let _ = app
        .clone()
        .oneshot(audit_request(json!({})))
        .await
        .unwrap();
    let _ = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let metrics = body_json(response).await;
    assert_eq!(metrics["total_requests"], 1);
    assert_eq!(metrics["errors_total"], 1);
}
