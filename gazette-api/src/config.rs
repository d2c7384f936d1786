//! API Configuration Module
//!
//! Configuration for the HTTP listener, CORS, upstream data sources, the
//! summary image cache and the `/me` profile. Every value is loaded from
//! environment variables with defaults suitable for local development and
//! passed explicitly to the components that need it.

use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// Listener and CORS configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address to bind.
    pub bind_addr: IpAddr,

    /// Port to bind.
    pub port: u16,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `GAZETTE_API_BIND`: Address to bind (default: 0.0.0.0)
    /// - `PORT` or `GAZETTE_API_PORT`: Port to bind (default: 3000)
    /// - `GAZETTE_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `GAZETTE_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_origins = std::env::var("GAZETTE_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_addr: env_parse("GAZETTE_API_BIND").unwrap_or(defaults.bind_addr),
            port: env_parse("PORT")
                .or_else(|| env_parse("GAZETTE_API_PORT"))
                .unwrap_or(defaults.port),
            cors_origins,
            cors_max_age_secs: env_parse("GAZETTE_CORS_MAX_AGE_SECS")
                .unwrap_or(defaults.cors_max_age_secs),
        }
    }

    /// Socket address the server listens on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }
}

// ============================================================================
// UPSTREAM SOURCES
// ============================================================================

pub const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";
pub const DEFAULT_FACT_URL: &str = "https://catfact.ninja/fact";

/// Endpoints of the external data sources.
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    pub countries_url: String,
    pub rates_url: String,
    pub fact_url: String,
    /// Per-request timeout for every upstream call
    pub timeout: Duration,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            rates_url: DEFAULT_RATES_URL.to_string(),
            fact_url: DEFAULT_FACT_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl SourcesConfig {
    /// Environment variables: `GAZETTE_COUNTRIES_URL`, `GAZETTE_RATES_URL`,
    /// `GAZETTE_FACT_URL`, `GAZETTE_HTTP_TIMEOUT_SECS` (default: 30).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            countries_url: env_string("GAZETTE_COUNTRIES_URL").unwrap_or(defaults.countries_url),
            rates_url: env_string("GAZETTE_RATES_URL").unwrap_or(defaults.rates_url),
            fact_url: env_string("GAZETTE_FACT_URL").unwrap_or(defaults.fact_url),
            timeout: env_parse("GAZETTE_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

// ============================================================================
// SUMMARY IMAGE
// ============================================================================

pub const SUMMARY_FILE_NAME: &str = "summary.png";

/// Where the refresh writes the summary image.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub cache_dir: PathBuf,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
        }
    }
}

impl SummaryConfig {
    /// Environment variables: `GAZETTE_CACHE_DIR` (default: `cache`).
    pub fn from_env() -> Self {
        Self {
            cache_dir: env_string("GAZETTE_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| Self::default().cache_dir),
        }
    }

    pub fn image_path(&self) -> PathBuf {
        self.cache_dir.join(SUMMARY_FILE_NAME)
    }
}

// ============================================================================
// PROFILE
// ============================================================================

/// Owner profile echoed by `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProfileConfig {
    pub email: String,
    pub name: String,
    pub stack: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            email: "maintainers@gazette.run".to_string(),
            name: "Gazette Maintainers".to_string(),
            stack: "Rust/Axum".to_string(),
        }
    }
}

impl ProfileConfig {
    /// Environment variables: `GAZETTE_PROFILE_EMAIL`, `GAZETTE_PROFILE_NAME`,
    /// `GAZETTE_PROFILE_STACK`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            email: env_string("GAZETTE_PROFILE_EMAIL").unwrap_or(defaults.email),
            name: env_string("GAZETTE_PROFILE_NAME").unwrap_or(defaults.name),
            stack: env_string("GAZETTE_PROFILE_STACK").unwrap_or(defaults.stack),
        }
    }
}
