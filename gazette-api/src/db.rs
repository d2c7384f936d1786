//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres and the
//! [`CountryStore`] implementation backed by the `countries` table.

use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use deadpool_postgres::{
    Config, ManagerConfig, Pool, PoolConfig, PoolError, RecyclingMethod, Runtime,
};
use gazette_core::{
    CountryFilter, CountryRecord, CountrySort, CountryStatus, GazetteError, GazetteResult,
    StorageError, Timestamp,
};
use gazette_storage::CountryStore;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// How long to wait for a free connection
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "gazette".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("GAZETTE_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("GAZETTE_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("GAZETTE_DB_NAME").unwrap_or_else(|_| "gazette".to_string()),
            user: std::env::var("GAZETTE_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("GAZETTE_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("GAZETTE_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("GAZETTE_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(self.max_size);
        pool_config.timeouts.wait = Some(self.timeout);
        cfg.pool = Some(pool_config);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// SQL
// ============================================================================

const TABLE_PRESENT_SQL: &str = "SELECT to_regclass('countries') IS NOT NULL AS present";

const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS countries (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    capital VARCHAR(255),
    region VARCHAR(255),
    population BIGINT NOT NULL CHECK (population >= 0),
    currency_code VARCHAR(10),
    exchange_rate DOUBLE PRECISION,
    estimated_gdp DOUBLE PRECISION NOT NULL DEFAULT 0,
    flag_url VARCHAR(500),
    last_refreshed_at TIMESTAMPTZ NOT NULL
)";

/// Country names are unique regardless of case; upserts conflict on this index.
const NAME_INDEX_SQL: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS countries_name_lower_key ON countries (LOWER(name))";

const UPSERT_SQL: &str = "
INSERT INTO countries
    (name, capital, region, population, currency_code, exchange_rate, estimated_gdp, flag_url, last_refreshed_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
ON CONFLICT ((LOWER(name))) DO UPDATE SET
    name = EXCLUDED.name,
    capital = EXCLUDED.capital,
    region = EXCLUDED.region,
    population = EXCLUDED.population,
    currency_code = EXCLUDED.currency_code,
    exchange_rate = EXCLUDED.exchange_rate,
    estimated_gdp = EXCLUDED.estimated_gdp,
    flag_url = EXCLUDED.flag_url,
    last_refreshed_at = EXCLUDED.last_refreshed_at";

const SELECT_COLUMNS: &str = "SELECT name, capital, region, population, currency_code, \
     exchange_rate, estimated_gdp, flag_url, last_refreshed_at FROM countries";

// ============================================================================
// ERROR AND ROW CONVERSIONS
// ============================================================================

fn backend_error(err: tokio_postgres::Error) -> GazetteError {
    // Log the full error; callers only see a generic database failure
    tracing::error!("Database error: {:?}", err);
    StorageError::Backend {
        reason: err.to_string(),
    }
    .into()
}

fn pool_error(err: PoolError) -> GazetteError {
    tracing::error!("Connection pool error: {:?}", err);
    match err {
        PoolError::Timeout(_) => StorageError::Unavailable {
            reason: "connection pool exhausted".to_string(),
        },
        PoolError::Closed => StorageError::Unavailable {
            reason: "connection pool is closed".to_string(),
        },
        other => StorageError::Backend {
            reason: other.to_string(),
        },
    }
    .into()
}

fn population_param(record: &CountryRecord) -> GazetteResult<i64> {
    i64::try_from(record.population).map_err(|_| {
        GazetteError::from(StorageError::Backend {
            reason: format!("population {} of {} exceeds BIGINT", record.population, record.name),
        })
    })
}

fn upsert_params<'a>(
    record: &'a CountryRecord,
    population: &'a i64,
) -> [&'a (dyn ToSql + Sync); 9] {
    [
        &record.name,
        &record.capital,
        &record.region,
        population,
        &record.currency_code,
        &record.exchange_rate,
        &record.estimated_gdp,
        &record.flag_url,
        &record.last_refreshed_at,
    ]
}

fn country_from_row(row: &Row) -> GazetteResult<CountryRecord> {
    let population: i64 = row.try_get("population").map_err(backend_error)?;
    let population = u64::try_from(population).map_err(|_| {
        GazetteError::from(StorageError::Backend {
            reason: format!("negative population {} in countries table", population),
        })
    })?;

    Ok(CountryRecord {
        name: row.try_get("name").map_err(backend_error)?,
        capital: row.try_get("capital").map_err(backend_error)?,
        region: row.try_get("region").map_err(backend_error)?,
        population,
        currency_code: row.try_get("currency_code").map_err(backend_error)?,
        exchange_rate: row.try_get("exchange_rate").map_err(backend_error)?,
        estimated_gdp: row.try_get("estimated_gdp").map_err(backend_error)?,
        flag_url: row.try_get("flag_url").map_err(backend_error)?,
        last_refreshed_at: row.try_get("last_refreshed_at").map_err(backend_error)?,
    })
}

/// `SELECT` for [`DbClient::list`]; placeholders are numbered in filter order.
fn list_sql(filter: &CountryFilter, sort: Option<CountrySort>) -> String {
    let mut sql = String::from(SELECT_COLUMNS);
    let mut clauses = Vec::new();
    if filter.region.is_some() {
        clauses.push(format!("LOWER(region) = LOWER(${})", clauses.len() + 1));
    }
    if filter.currency.is_some() {
        clauses.push(format!("LOWER(currency_code) = LOWER(${})", clauses.len() + 1));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    match sort {
        Some(CountrySort::GdpDesc) => sql.push_str(" ORDER BY estimated_gdp DESC, id"),
        None => sql.push_str(" ORDER BY id"),
    }
    sql
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// PostgreSQL-backed countries registry.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> GazetteResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(pool_error)
    }
}

#[async_trait]
impl CountryStore for DbClient {
    async fn ensure_schema(&self) -> GazetteResult<()> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_one(TABLE_PRESENT_SQL, &[])
            .await
            .map_err(backend_error)?;
        let present: bool = row.try_get("present").map_err(backend_error)?;
        if present {
            tracing::debug!("countries table already present");
        } else {
            conn.batch_execute(CREATE_TABLE_SQL)
                .await
                .map_err(backend_error)?;
            tracing::info!("Created countries table");
        }

        conn.batch_execute(NAME_INDEX_SQL)
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn upsert(&self, record: &CountryRecord) -> GazetteResult<()> {
        let conn = self.get_conn().await?;
        let population = population_param(record)?;
        conn.execute(UPSERT_SQL, &upsert_params(record, &population))
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn upsert_batch(&self, records: &[CountryRecord]) -> GazetteResult<()> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await.map_err(backend_error)?;
        let stmt = tx.prepare(UPSERT_SQL).await.map_err(backend_error)?;

        for record in records {
            let population = population_param(record)?;
            tx.execute(&stmt, &upsert_params(record, &population))
                .await
                .map_err(backend_error)?;
        }

        tx.commit().await.map_err(backend_error)?;
        tracing::debug!(count = records.len(), "Upserted countries batch");
        Ok(())
    }

    async fn get_by_name(&self, name: &str) -> GazetteResult<Option<CountryRecord>> {
        let conn = self.get_conn().await?;
        let sql = format!("{} WHERE LOWER(name) = LOWER($1) LIMIT 1", SELECT_COLUMNS);
        let row = conn
            .query_opt(sql.as_str(), &[&name])
            .await
            .map_err(backend_error)?;
        row.as_ref().map(country_from_row).transpose()
    }

    async fn list(
        &self,
        filter: &CountryFilter,
        sort: Option<CountrySort>,
    ) -> GazetteResult<Vec<CountryRecord>> {
        let conn = self.get_conn().await?;

        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();
        if let Some(region) = filter.region.as_ref() {
            params.push(region);
        }
        if let Some(currency) = filter.currency.as_ref() {
            params.push(currency);
        }

        let sql = list_sql(filter, sort);
        let rows = conn
            .query(sql.as_str(), &params)
            .await
            .map_err(backend_error)?;
        rows.iter().map(country_from_row).collect()
    }

    async fn delete_by_name(&self, name: &str) -> GazetteResult<bool> {
        let conn = self.get_conn().await?;
        let affected = conn
            .execute("DELETE FROM countries WHERE LOWER(name) = LOWER($1)", &[&name])
            .await
            .map_err(backend_error)?;
        Ok(affected > 0)
    }

    async fn status(&self) -> GazetteResult<CountryStatus> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "SELECT COUNT(*) AS total, MAX(last_refreshed_at) AS last_refreshed_at FROM countries",
                &[],
            )
            .await
            .map_err(backend_error)?;

        let total: i64 = row.try_get("total").map_err(backend_error)?;
        let last_refreshed_at: Option<Timestamp> =
            row.try_get("last_refreshed_at").map_err(backend_error)?;

        Ok(CountryStatus {
            total_countries: u64::try_from(total).unwrap_or_default(),
            last_refreshed_at,
        })
    }

    async fn ping(&self) -> GazetteResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await.map_err(backend_error)?;
        Ok(())
    }
}
