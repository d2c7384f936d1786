//! Countries registry contract and an in-memory implementation.

use async_trait::async_trait;
use gazette_core::{CountryFilter, CountryRecord, CountrySort, CountryStatus, GazetteResult};
use tokio::sync::RwLock;

/// Keyed store of [`CountryRecord`]s (key: `name`).
///
/// Name lookups and the region/currency filters ignore case. `upsert` must be
/// a single atomic insert-or-update.
#[async_trait]
pub trait CountryStore: Send + Sync {
    /// Create the backing table if it does not exist yet.
    async fn ensure_schema(&self) -> GazetteResult<()>;

    /// Insert `record`, or overwrite every non-key field of the existing row.
    async fn upsert(&self, record: &CountryRecord) -> GazetteResult<()>;

    /// Upsert a whole refresh cycle.
    ///
    /// Implementations that can should apply all records or none.
    async fn upsert_batch(&self, records: &[CountryRecord]) -> GazetteResult<()> {
        for record in records {
            self.upsert(record).await?;
        }
        Ok(())
    }

    async fn get_by_name(&self, name: &str) -> GazetteResult<Option<CountryRecord>>;

    async fn list(
        &self,
        filter: &CountryFilter,
        sort: Option<CountrySort>,
    ) -> GazetteResult<Vec<CountryRecord>>;

    /// Returns whether a record was removed.
    async fn delete_by_name(&self, name: &str) -> GazetteResult<bool>;

    /// Record count and the newest `last_refreshed_at`.
    async fn status(&self) -> GazetteResult<CountryStatus>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> GazetteResult<()>;
}

/// Sort `records` in place according to `sort`.
pub fn sort_countries(records: &mut [CountryRecord], sort: Option<CountrySort>) {
    match sort {
        Some(CountrySort::GdpDesc) => {
            records.sort_by(|a, b| b.estimated_gdp.total_cmp(&a.estimated_gdp));
        }
        None => {}
    }
}

/// In-memory [`CountryStore`] keeping insertion order.
///
/// Not persisted; used by tests and when no database is configured.
/// Country names compare without regard to case, as the PostgreSQL store's
/// `LOWER(name)` key does.
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Insert or overwrite the record with the same name.
fn upsert_into(records: &mut Vec<CountryRecord>, record: &CountryRecord) {
    match records
        .iter_mut()
        .find(|existing| same_name(&existing.name, &record.name))
    {
        Some(existing) => *existing = record.clone(),
        None => records.push(record.clone()),
    }
}

#[derive(Default)]
pub struct InMemoryCountryStore {
    records: RwLock<Vec<CountryRecord>>,
}

impl InMemoryCountryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CountryStore for InMemoryCountryStore {
    async fn ensure_schema(&self) -> GazetteResult<()> {
        Ok(())
    }

    async fn upsert(&self, record: &CountryRecord) -> GazetteResult<()> {
        let mut records = self.records.write().await;
        upsert_into(&mut records, record);
        Ok(())
    }

    async fn upsert_batch(&self, batch: &[CountryRecord]) -> GazetteResult<()> {
        // One write guard for the whole batch so readers never see half a cycle
        let mut records = self.records.write().await;
        for record in batch {
            upsert_into(&mut records, record);
        }
        Ok(())
    }

    async fn get_by_name(&self, name: &str) -> GazetteResult<Option<CountryRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| same_name(&record.name, name))
            .cloned())
    }

    async fn list(
        &self,
        filter: &CountryFilter,
        sort: Option<CountrySort>,
    ) -> GazetteResult<Vec<CountryRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<CountryRecord> = records
            .iter()
            .filter(|record| record.matches(filter))
            .cloned()
            .collect();
        sort_countries(&mut matching, sort);
        Ok(matching)
    }

    async fn delete_by_name(&self, name: &str) -> GazetteResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| !same_name(&record.name, name));
        Ok(records.len() != before)
    }

    async fn status(&self) -> GazetteResult<CountryStatus> {
        let records = self.records.read().await;
        Ok(CountryStatus {
            total_countries: records.len() as u64,
            last_refreshed_at: records.iter().map(|record| record.last_refreshed_at).max(),
        })
    }

    async fn ping(&self) -> GazetteResult<()> {
        Ok(())
    }
}
