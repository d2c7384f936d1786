//! HTTP tests for refresh, the countries registry and the summary image.

mod support;

use axum::{
    body::{to_bytes, Body},
    http::{header, StatusCode},
};
use gazette_storage::CountryStore;
use gazette_test_utils::sample_country;
use support::{request, TestApp, MULTIPLIER};
use tower::ServiceExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

async fn refresh(app: &TestApp) -> (StatusCode, serde_json::Value) {
    app.send_json(request("POST", "/countries/refresh", Body::empty()))
        .await
}

#[tokio::test]
async fn test_empty_registry() -> TestResult {
    let app = TestApp::new()?;

    let (status, body) = app.get("/countries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));

    let (status, body) = app.get("/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_countries"], 0);
    assert!(body["last_refreshed_at"].is_null());

    let (status, body) = app.get("/countries/image").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SUMMARY_IMAGE_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn test_refresh_computes_gdp_and_persists() -> TestResult {
    let app = TestApp::new()?;

    let (status, body) = refresh(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let refreshed_at = body["refreshed_at"].clone();
    assert!(refreshed_at.is_string());

    let (status, nigeria) = app.get("/countries/Nigeria").await;
    assert_eq!(status, StatusCode::OK);
    let expected = 206139587_f64 * f64::from(MULTIPLIER) / 1600.0;
    assert_eq!(nigeria["estimated_gdp"].as_f64(), Some(expected));
    assert_eq!(nigeria["currency_code"], "NGN");
    assert_eq!(nigeria["exchange_rate"].as_f64(), Some(1600.0));
    assert_eq!(nigeria["capital"], "Abuja");
    assert_eq!(nigeria["flag_url"], "https://flagcdn.com/ng.svg");
    assert_eq!(nigeria["last_refreshed_at"], refreshed_at);

    // Currency without a rate
    let (_, atlantis) = app.get("/countries/Atlantis").await;
    assert_eq!(atlantis["currency_code"], "ATL");
    assert!(atlantis["exchange_rate"].is_null());
    assert_eq!(atlantis["estimated_gdp"].as_f64(), Some(0.0));
    assert!(atlantis["capital"].is_null());

    // No currencies at all
    let (_, antarctica) = app.get("/countries/Antarctica").await;
    assert!(antarctica["currency_code"].is_null());
    assert_eq!(antarctica["estimated_gdp"].as_f64(), Some(0.0));

    let (_, status_body) = app.get("/status").await;
    assert_eq!(status_body["total_countries"], 3);
    assert_eq!(status_body["last_refreshed_at"], refreshed_at);
    Ok(())
}

#[tokio::test]
async fn test_refresh_is_an_upsert() -> TestResult {
    let app = TestApp::new()?;

    let (first, _) = refresh(&app).await;
    let (second, _) = refresh(&app).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let (_, body) = app.get("/status").await;
    assert_eq!(body["total_countries"], 3);
    Ok(())
}

#[tokio::test]
async fn test_list_filters_and_sort() -> TestResult {
    let app = TestApp::new()?;
    refresh(&app).await;

    let (status, body) = app.get("/countries?region=africa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "Nigeria");

    let (_, body) = app.get("/countries?currency=ngn").await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, body) = app.get("/countries?region=Polar&currency=NGN").await;
    assert_eq!(body, serde_json::json!([]));

    let (_, body) = app.get("/countries?sort=gdp_desc").await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
    assert_eq!(body[0]["name"], "Nigeria");

    let (status, body) = app.get("/countries?sort=population").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FORMAT");
    Ok(())
}

#[tokio::test]
async fn test_get_and_delete_by_name() -> TestResult {
    let app = TestApp::new()?;
    refresh(&app).await;

    let (status, body) = app.get("/countries/nigeria").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Nigeria");

    let (status, body) = app.get("/countries/Wakanda").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Country not found");

    let (status, _) = app.delete("/countries/Atlantis").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.delete("/countries/Atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/status").await;
    assert_eq!(body["total_countries"], 2);
    Ok(())
}

#[tokio::test]
async fn test_refresh_writes_summary_image() -> TestResult {
    let app = TestApp::new()?;
    refresh(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/countries/image", Body::empty()))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(bytes.starts_with(PNG_MAGIC));

    assert!(app.cache.path().join("summary.png").exists());
    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_aborts_refresh() -> TestResult {
    let app = TestApp::with_upstream_down()?;
    app.store
        .upsert(&sample_country("Kenya", "Africa", "KES", 53_771_296, 42.0))
        .await?;

    let (status, body) = refresh(&app).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
    assert_eq!(body["error"], "External data source unavailable");
    assert_eq!(body["details"], "Could not fetch data from Countries");

    // Existing rows untouched, nothing added, no image
    let (_, status_body) = app.get("/status").await;
    assert_eq!(status_body["total_countries"], 1);
    let (_, kenya) = app.get("/countries/Kenya").await;
    assert_eq!(kenya["estimated_gdp"].as_f64(), Some(42.0));
    let (status, _) = app.get("/countries/image").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_rates_failure_writes_nothing() -> TestResult {
    let app = TestApp::with_rates_down()?;

    let (status, body) = refresh(&app).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["details"], "Could not fetch data from Exchange Rates");

    let (_, body) = app.get("/countries").await;
    assert_eq!(body, serde_json::json!([]));
    Ok(())
}
