//! Shared application components handed to the routers.

use std::sync::Arc;
use std::time::Instant;

use gazette_storage::{CountryStore, StringsRegistry};

use crate::config::{ProfileConfig, SummaryConfig};
use crate::services::{MultiplierSource, RefreshOrchestrator, SummaryImage};
use crate::sources::{CountrySource, FactSource, RateSource};

/// External data sources used by the service.
#[derive(Clone)]
pub struct Upstream {
    pub countries: Arc<dyn CountrySource>,
    pub rates: Arc<dyn RateSource>,
    pub facts: Arc<dyn FactSource>,
}

/// Everything the routers need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub strings: Arc<StringsRegistry>,
    pub countries: Arc<dyn CountryStore>,
    pub refresher: Arc<RefreshOrchestrator>,
    pub summary: SummaryImage,
    pub facts: Arc<dyn FactSource>,
    pub profile: Arc<ProfileConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        countries: Arc<dyn CountryStore>,
        upstream: Upstream,
        multiplier: Arc<dyn MultiplierSource>,
        summary_config: &SummaryConfig,
        profile: ProfileConfig,
    ) -> Self {
        let summary = SummaryImage::new(summary_config);
        let refresher = RefreshOrchestrator::new(
            upstream.countries,
            upstream.rates,
            countries.clone(),
            multiplier,
            summary.clone(),
        );

        Self {
            strings: Arc::new(StringsRegistry::new()),
            countries,
            refresher: Arc::new(refresher),
            summary,
            facts: upstream.facts,
            profile: Arc::new(profile),
            start_time: Instant::now(),
        }
    }
}
