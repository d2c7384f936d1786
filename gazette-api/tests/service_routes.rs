//! HTTP tests for health, profile, metrics and the OpenAPI document.

mod support;

use std::sync::Arc;

use axum::{body::Body, http::StatusCode};
use gazette_api::Upstream;
use support::{request, CannedUpstream, DownUpstream, TestApp};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test]
async fn test_liveness_and_readiness() -> TestResult {
    let app = TestApp::new()?;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());

    let (status, body) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn test_welcome_text() -> TestResult {
    let app = TestApp::new()?;

    let (status, body) = app.send(request("GET", "/", Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body)?, "Welcome to the Gazette API");
    Ok(())
}

#[tokio::test]
async fn test_profile_with_fact() -> TestResult {
    let app = TestApp::new()?;

    let (status, body) = app.get("/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["user"]["email"], "maintainers@gazette.run");
    assert_eq!(body["user"]["stack"], "Rust/Axum");
    assert_eq!(body["fact"], "Cats sleep for most of the day.");
    Ok(())
}

#[tokio::test]
async fn test_profile_fact_fallbacks() -> TestResult {
    let app = TestApp::with_upstream_down()?;
    let (status, body) = app.get("/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fact"], "Unable to fetch a cat fact at the moment");

    let canned = Arc::new(CannedUpstream { fact: None });
    let app = TestApp::with_upstream(Upstream {
        countries: canned.clone(),
        rates: Arc::new(DownUpstream),
        facts: canned,
    })?;
    let (status, body) = app.get("/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fact"], "No cat fact available");
    Ok(())
}

#[tokio::test]
async fn test_metrics_exposes_request_counters() -> TestResult {
    let app = TestApp::new()?;
    app.get("/health").await;

    let (status, body) = app.send(request("GET", "/metrics", Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body)?;
    assert!(text.contains("gazette_http_requests_total"));
    Ok(())
}

#[tokio::test]
async fn test_metrics_label_unknown_paths_as_unmatched() -> TestResult {
    let app = TestApp::new()?;
    for uri in ["/no-such-route-1", "/no-such-route-2", "/countries/x/y"] {
        let (status, _) = app.send(request("GET", uri, Body::empty())).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let (_, body) = app.send(request("GET", "/metrics", Body::empty())).await;
    let text = String::from_utf8(body)?;
    assert!(text.contains(r#"path="unmatched""#));
    assert!(!text.contains("no-such-route"));
    assert!(!text.contains("/countries/x/y"));
    Ok(())
}

#[cfg(feature = "openapi")]
#[tokio::test]
async fn test_openapi_document_is_served() -> TestResult {
    let app = TestApp::new()?;

    let (status, body) = app.get("/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Gazette API");
    assert!(body["paths"]["/strings/filter-by-natural-language"].is_object());
    Ok(())
}
