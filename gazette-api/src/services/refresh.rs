//! Country refresh cycle.
//!
//! Fetches country metadata and USD exchange rates, derives a GDP estimate
//! per country, writes the whole cycle through [`CountryStore::upsert_batch`]
//! and regenerates the summary image. Either fetch failing aborts the cycle
//! before anything is written. A failed image only logs a warning.
//!
//! Concurrent refreshes are not serialized; two overlapping cycles may
//! interleave their batches.

use chrono::Utc;
use gazette_core::{
    estimate_gdp, resolve_exchange_rate, CountryFilter, CountryRecord, GazetteResult, Timestamp,
    GDP_MULTIPLIER_RANGE,
};
use gazette_storage::CountryStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::summary_image::{CountriesSummary, SummaryImage};
use crate::sources::{CountryPayload, CountrySource, RateSource};
use crate::telemetry::metrics::with_metrics;

// ============================================================================
// GDP MULTIPLIER
// ============================================================================

/// Source of the per-country GDP multiplier, drawn from
/// [`GDP_MULTIPLIER_RANGE`].
pub trait MultiplierSource: Send + Sync {
    fn draw(&self) -> u32;
}

/// Uniform draws from a seedable RNG.
pub struct RandomMultiplier {
    rng: Mutex<StdRng>,
}

impl RandomMultiplier {
    /// Seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible sequence for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl MultiplierSource for RandomMultiplier {
    fn draw(&self) -> u32 {
        // A poisoned RNG is still a valid RNG
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(GDP_MULTIPLIER_RANGE)
    }
}

/// Always the same multiplier.
#[derive(Debug, Clone, Copy)]
pub struct FixedMultiplier(pub u32);

impl MultiplierSource for FixedMultiplier {
    fn draw(&self) -> u32 {
        self.0
    }
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// Result of a completed refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub refreshed_at: Timestamp,
    pub countries: usize,
    /// Whether the summary image was regenerated
    pub summary_written: bool,
}

pub struct RefreshOrchestrator {
    countries: Arc<dyn CountrySource>,
    rates: Arc<dyn RateSource>,
    store: Arc<dyn CountryStore>,
    multiplier: Arc<dyn MultiplierSource>,
    summary: SummaryImage,
}

impl RefreshOrchestrator {
    pub fn new(
        countries: Arc<dyn CountrySource>,
        rates: Arc<dyn RateSource>,
        store: Arc<dyn CountryStore>,
        multiplier: Arc<dyn MultiplierSource>,
        summary: SummaryImage,
    ) -> Self {
        Self {
            countries,
            rates,
            store,
            multiplier,
            summary,
        }
    }

    /// Run one refresh cycle.
    pub async fn refresh(&self) -> GazetteResult<RefreshOutcome> {
        tracing::info!("Country refresh started");

        let outcome = self.run().await;
        match &outcome {
            Ok(outcome) => {
                with_metrics(|metrics| metrics.record_refresh(true, outcome.countries));
                tracing::info!(
                    countries = outcome.countries,
                    summary_written = outcome.summary_written,
                    refreshed_at = %outcome.refreshed_at,
                    "Country refresh completed"
                );
            }
            Err(e) => {
                with_metrics(|metrics| metrics.record_refresh(false, 0));
                tracing::warn!(error = %e, "Country refresh aborted");
            }
        }
        outcome
    }

    async fn run(&self) -> GazetteResult<RefreshOutcome> {
        let payloads = self.countries.fetch_countries().await?;
        let rates = self.rates.fetch_rates().await?;
        tracing::debug!(
            countries = payloads.len(),
            rates = rates.len(),
            "Upstream data fetched"
        );

        let refreshed_at = Utc::now();
        let records: Vec<CountryRecord> = payloads
            .into_iter()
            .map(|payload| self.build_record(payload, &rates, refreshed_at))
            .collect();

        self.store.upsert_batch(&records).await?;

        let summary_written = match self.regenerate_summary(refreshed_at).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Summary image regeneration failed");
                false
            }
        };

        Ok(RefreshOutcome {
            refreshed_at,
            countries: records.len(),
            summary_written,
        })
    }

    fn build_record(
        &self,
        payload: CountryPayload,
        rates: &HashMap<String, f64>,
        refreshed_at: Timestamp,
    ) -> CountryRecord {
        let currency_code = payload.primary_currency().map(str::to_string);
        let exchange_rate = resolve_exchange_rate(currency_code.as_deref(), rates);
        let estimated_gdp = match exchange_rate {
            Some(_) => estimate_gdp(payload.population, self.multiplier.draw(), exchange_rate),
            None => 0.0,
        };

        CountryRecord {
            name: payload.name,
            capital: payload.capital,
            region: payload.region,
            population: payload.population,
            currency_code,
            exchange_rate,
            estimated_gdp,
            flag_url: payload.flag,
            last_refreshed_at: refreshed_at,
        }
    }

    async fn regenerate_summary(
        &self,
        refreshed_at: Timestamp,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let records = self.store.list(&CountryFilter::default(), None).await?;
        let summary = CountriesSummary::from_records(&records, refreshed_at);
        self.summary.write(summary).await?;
        Ok(())
    }
}
