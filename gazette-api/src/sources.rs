//! External data sources: country metadata, USD exchange rates and the
//! fact shown on `/me`.
//!
//! Each source is a trait so the refresh and the profile route can be driven
//! by in-process fakes in tests. [`HttpSources`] implements all three over
//! reqwest.

use async_trait::async_trait;
use gazette_core::UpstreamError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::SourcesConfig;
use crate::error::{ApiError, ApiResult};

pub const COUNTRIES_SOURCE: &str = "Countries";
pub const RATES_SOURCE: &str = "Exchange Rates";
pub const FACT_SOURCE: &str = "Cat Facts";

// ============================================================================
// PAYLOADS
// ============================================================================

/// One currency entry of a country payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrencyPayload {
    #[serde(default)]
    pub code: Option<String>,
}

/// One country as returned by the countries source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryPayload {
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<CurrencyPayload>>,
}

impl CountryPayload {
    /// Code of the first listed currency, if any.
    pub fn primary_currency(&self) -> Option<&str> {
        self.currencies
            .as_ref()
            .and_then(|currencies| currencies.first())
            .and_then(|currency| currency.code.as_deref())
            .filter(|code| !code.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct RatesPayload {
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct FactPayload {
    #[serde(default)]
    fact: Option<String>,
}

// ============================================================================
// SOURCE TRAITS
// ============================================================================

#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<CountryPayload>, UpstreamError>;
}

/// USD-denominated exchange rates keyed by currency code.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>, UpstreamError>;
}

#[async_trait]
pub trait FactSource: Send + Sync {
    /// `Ok(None)` when the source answered without a fact.
    async fn fetch_fact(&self) -> Result<Option<String>, UpstreamError>;
}

// ============================================================================
// HTTP IMPLEMENTATION
// ============================================================================

/// All upstream sources over one shared reqwest client.
#[derive(Clone)]
pub struct HttpSources {
    client: reqwest::Client,
    config: SourcesConfig,
}

impl HttpSources {
    pub fn new(config: SourcesConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("gazette-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::internal_error(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        source_name: &'static str,
        url: &str,
    ) -> Result<T, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| UpstreamError::unavailable(source_name, e))?;

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::unavailable(source_name, e))
    }
}

#[async_trait]
impl CountrySource for HttpSources {
    async fn fetch_countries(&self) -> Result<Vec<CountryPayload>, UpstreamError> {
        let countries: Vec<CountryPayload> = self
            .get_json(COUNTRIES_SOURCE, &self.config.countries_url)
            .await?;
        tracing::debug!(count = countries.len(), "Fetched countries");
        Ok(countries)
    }
}

#[async_trait]
impl RateSource for HttpSources {
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>, UpstreamError> {
        let payload: RatesPayload = self.get_json(RATES_SOURCE, &self.config.rates_url).await?;
        tracing::debug!(count = payload.rates.len(), "Fetched exchange rates");
        Ok(payload.rates)
    }
}

#[async_trait]
impl FactSource for HttpSources {
    async fn fetch_fact(&self) -> Result<Option<String>, UpstreamError> {
        let payload: FactPayload = self.get_json(FACT_SOURCE, &self.config.fact_url).await?;
        Ok(payload.fact.filter(|fact| !fact.trim().is_empty()))
    }
}
