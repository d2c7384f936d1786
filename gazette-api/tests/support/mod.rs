//! In-process harness for the HTTP tests: the full router over the in-memory
//! country store, canned upstream sources and a throwaway image cache.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use gazette_api::{
    create_api_router, sources::CountryPayload, ApiConfig, AppState, CountrySource, FactSource,
    FixedMultiplier, ProfileConfig, RateSource, SummaryConfig, Upstream,
};
use gazette_core::UpstreamError;
use gazette_storage::InMemoryCountryStore;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const MULTIPLIER: u32 = 1500;

/// Upstream that answers with the gazette-test-utils payloads.
pub struct CannedUpstream {
    pub fact: Option<String>,
}

#[async_trait]
impl CountrySource for CannedUpstream {
    async fn fetch_countries(&self) -> Result<Vec<CountryPayload>, UpstreamError> {
        serde_json::from_value(gazette_test_utils::countries_payload())
            .map_err(|e| UpstreamError::unavailable("Countries", e))
    }
}

#[async_trait]
impl RateSource for CannedUpstream {
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>, UpstreamError> {
        let payload = gazette_test_utils::rates_payload();
        serde_json::from_value(payload["rates"].clone())
            .map_err(|e| UpstreamError::unavailable("Exchange Rates", e))
    }
}

#[async_trait]
impl FactSource for CannedUpstream {
    async fn fetch_fact(&self) -> Result<Option<String>, UpstreamError> {
        Ok(self.fact.clone())
    }
}

/// Upstream where every call fails.
pub struct DownUpstream;

#[async_trait]
impl CountrySource for DownUpstream {
    async fn fetch_countries(&self) -> Result<Vec<CountryPayload>, UpstreamError> {
        Err(UpstreamError::unavailable("Countries", "connection refused"))
    }
}

#[async_trait]
impl RateSource for DownUpstream {
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>, UpstreamError> {
        Err(UpstreamError::unavailable("Exchange Rates", "connection refused"))
    }
}

#[async_trait]
impl FactSource for DownUpstream {
    async fn fetch_fact(&self) -> Result<Option<String>, UpstreamError> {
        Err(UpstreamError::unavailable("Cat Facts", "connection refused"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryCountryStore>,
    pub cache: TempDir,
}

impl TestApp {
    /// Working countries and rates sources with the given fact.
    pub fn new() -> Result<Self, std::io::Error> {
        let upstream = Arc::new(CannedUpstream {
            fact: Some("Cats sleep for most of the day.".to_string()),
        });
        Self::build(Upstream {
            countries: upstream.clone(),
            rates: upstream.clone(),
            facts: upstream,
        })
    }

    /// Countries source works, the rates source is down.
    pub fn with_rates_down() -> Result<Self, std::io::Error> {
        let canned = Arc::new(CannedUpstream { fact: None });
        Self::build(Upstream {
            countries: canned.clone(),
            rates: Arc::new(DownUpstream),
            facts: canned,
        })
    }

    /// Every upstream source is down.
    pub fn with_upstream_down() -> Result<Self, std::io::Error> {
        let down = Arc::new(DownUpstream);
        Self::build(Upstream {
            countries: down.clone(),
            rates: down.clone(),
            facts: down,
        })
    }

    pub fn with_upstream(upstream: Upstream) -> Result<Self, std::io::Error> {
        Self::build(upstream)
    }

    fn build(upstream: Upstream) -> Result<Self, std::io::Error> {
        let cache = tempfile::tempdir()?;
        let store = Arc::new(InMemoryCountryStore::new());
        let state = AppState::new(
            store.clone(),
            upstream,
            Arc::new(FixedMultiplier(MULTIPLIER)),
            &SummaryConfig {
                cache_dir: cache.path().to_path_buf(),
            },
            ProfileConfig::default(),
        );
        let router = create_api_router(state, &ApiConfig::default());
        Ok(Self {
            router,
            store,
            cache,
        })
    }

    /// Send one request and collect the status and raw body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .map(|bytes| bytes.to_vec())
            .unwrap_or_default();
        (status, body)
    }

    /// Send one request and decode the body as JSON (`Null` when empty).
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|e| {
                panic!("invalid JSON body ({}): {}", e, String::from_utf8_lossy(&body))
            })
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(request("GET", uri, Body::empty())).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(request("DELETE", uri, Body::empty())).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.into()))
            .unwrap_or_else(|e| panic!("bad request {}: {}", uri, e));
        self.send_json(request).await
    }
}

pub fn request(method: &str, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap_or_else(|e| panic!("bad request {} {}: {}", method, uri, e))
}
