//! Country records and the derived GDP estimate.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Range the per-country GDP multiplier is drawn from, both ends inclusive.
pub const GDP_MULTIPLIER_RANGE: RangeInclusive<u32> = 1000..=2000;

/// A country as persisted by the countries registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CountryRecord {
    /// Unique key
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: u64,
    pub currency_code: Option<String>,
    /// USD-denominated rate for `currency_code`
    pub exchange_rate: Option<f64>,
    /// Synthetic estimate, see [`estimate_gdp`]
    pub estimated_gdp: f64,
    pub flag_url: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub last_refreshed_at: Timestamp,
}

impl CountryRecord {
    /// Whether this record passes the region/currency filter.
    ///
    /// Comparisons ignore ASCII case.
    pub fn matches(&self, filter: &CountryFilter) -> bool {
        fn eq_opt(field: &Option<String>, wanted: &Option<String>) -> bool {
            match wanted {
                None => true,
                Some(wanted) => field
                    .as_deref()
                    .is_some_and(|value| value.eq_ignore_ascii_case(wanted)),
            }
        }
        eq_opt(&self.region, &filter.region) && eq_opt(&self.currency_code, &filter.currency)
    }
}

/// Optional filters for listing countries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryFilter {
    pub region: Option<String>,
    pub currency: Option<String>,
}

/// Sort options for listing countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountrySort {
    /// Highest `estimated_gdp` first
    GdpDesc,
}

impl FromStr for CountrySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gdp_desc" => Ok(CountrySort::GdpDesc),
            other => Err(format!("unknown sort option '{}'", other)),
        }
    }
}

/// Registry-wide status summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CountryStatus {
    pub total_countries: u64,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub last_refreshed_at: Option<Timestamp>,
}

/// Look up the USD rate for `currency_code`.
///
/// Missing codes, missing rates and non-positive rates all resolve to `None`.
pub fn resolve_exchange_rate(
    currency_code: Option<&str>,
    rates: &HashMap<String, f64>,
) -> Option<f64> {
    let rate = *rates.get(currency_code?)?;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// `population * multiplier / exchange_rate`, or `0.0` without a rate.
///
/// The multiplier is random noise drawn from [`GDP_MULTIPLIER_RANGE`], so the
/// result is a synthetic estimate rather than a real GDP figure.
pub fn estimate_gdp(population: u64, multiplier: u32, exchange_rate: Option<f64>) -> f64 {
    match exchange_rate {
        Some(rate) => population as f64 * f64::from(multiplier) / rate,
        None => 0.0,
    }
}
