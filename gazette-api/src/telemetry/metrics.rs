//! Prometheus Metrics Definitions
//!
//! Defines all gazette metrics with appropriate labels and types.
//! Exposes a /metrics endpoint for Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_histogram_vec, Counter,
    CounterVec, Encoder, Gauge, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, 30s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Global metrics instance - initialized once on first use
pub static METRICS: Lazy<ApiResult<GazetteMetrics>> = Lazy::new(GazetteMetrics::new);

/// Container for all gazette metrics.
#[derive(Clone)]
pub struct GazetteMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Refresh cycles - labels: status (success/failure)
    pub refresh_runs_total: CounterVec,

    /// Country rows written by successful refreshes
    pub countries_upserted_total: Counter,

    /// Records currently held by the strings registry
    pub strings_stored: Gauge,
}

impl GazetteMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "gazette_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "gazette_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| {
                ApiError::internal_error(format!(
                    "Failed to register http_request_duration_seconds: {}",
                    e
                ))
            })?,

            refresh_runs_total: register_counter_vec!(
                "gazette_refresh_runs_total",
                "Total number of country refresh cycles",
                &["status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register refresh_runs_total: {}", e)))?,

            countries_upserted_total: register_counter!(
                "gazette_countries_upserted_total",
                "Total number of country rows written by refreshes"
            )
            .map_err(|e| {
                ApiError::internal_error(format!("Failed to register countries_upserted_total: {}", e))
            })?,

            strings_stored: register_gauge!(
                "gazette_strings_stored",
                "Current number of stored strings"
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register strings_stored: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record the outcome of one refresh cycle.
    pub fn record_refresh(&self, success: bool, upserted: usize) {
        let status = if success { "success" } else { "failure" };
        self.refresh_runs_total.with_label_values(&[status]).inc();
        if success {
            self.countries_upserted_total.inc_by(upserted as f64);
        }
    }

    /// Set the strings registry size.
    pub fn set_strings_stored(&self, count: usize) {
        self.strings_stored.set(count as f64);
    }
}

/// Run `f` against the global metrics, skipping silently if registration failed.
pub fn with_metrics(f: impl FnOnce(&GazetteMetrics)) {
    if let Ok(metrics) = METRICS.as_ref() {
        f(metrics);
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
))]
pub async fn metrics_handler() -> impl IntoResponse {
    // Make sure the gazette collectors exist before the first scrape
    if let Err(e) = METRICS.as_ref() {
        tracing::warn!(error = %e, "Metrics registration failed");
    }

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
