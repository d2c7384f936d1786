//! In-memory registry of analyzed strings keyed by content hash.

use std::collections::HashMap;
use std::sync::RwLock;

use gazette_core::{
    apply_filters, content_hash, parse_natural_query, EntityKind, GazetteError, GazetteResult,
    PredicateSet, StorageError, StringRecord,
};

#[derive(Default)]
struct Entries {
    by_id: HashMap<String, StringRecord>,
    /// Insertion order of ids, used for listing
    order: Vec<String>,
}

/// Concurrency-safe store of [`StringRecord`]s.
///
/// Every mutation takes the write lock, so two creates of the same value
/// cannot both succeed and a delete is visible to the next read.
#[derive(Default)]
pub struct StringsRegistry {
    entries: RwLock<Entries>,
}

fn lock_poisoned<T>(_: T) -> GazetteError {
    GazetteError::Storage(StorageError::LockPoisoned)
}

fn not_found(value: &str) -> GazetteError {
    GazetteError::Storage(StorageError::NotFound {
        entity: EntityKind::String,
        key: value.to_string(),
    })
}

impl StringsRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze and store `value`.
    ///
    /// Fails with [`StorageError::AlreadyExists`] when the same exact text is
    /// already stored; the existing record is left untouched.
    pub fn create(&self, value: &str) -> GazetteResult<StringRecord> {
        let record = StringRecord::new(value);
        let mut entries = self.entries.write().map_err(lock_poisoned)?;

        if entries.by_id.contains_key(&record.id) {
            return Err(GazetteError::Storage(StorageError::AlreadyExists {
                entity: EntityKind::String,
                key: record.id,
            }));
        }

        entries.order.push(record.id.clone());
        entries.by_id.insert(record.id.clone(), record.clone());
        tracing::debug!(id = %record.id, length = record.properties.length, "String stored");
        Ok(record)
    }

    /// Look up a record by its raw value.
    pub fn get(&self, value: &str) -> GazetteResult<StringRecord> {
        let id = content_hash(value);
        let entries = self.entries.read().map_err(lock_poisoned)?;
        entries.by_id.get(&id).cloned().ok_or_else(|| not_found(value))
    }

    /// All records matching `predicates`, in insertion order.
    pub fn list(&self, predicates: &PredicateSet) -> GazetteResult<Vec<StringRecord>> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        let ordered = entries.order.iter().filter_map(|id| entries.by_id.get(id));
        Ok(apply_filters(ordered, predicates))
    }

    /// Parse `query`, reject contradictory results, then list.
    ///
    /// Returns the interpreted predicates alongside the matches.
    pub fn query_natural(&self, query: &str) -> GazetteResult<(PredicateSet, Vec<StringRecord>)> {
        let predicates = parse_natural_query(query)?;
        predicates.validate()?;
        let records = self.list(&predicates)?;
        Ok((predicates, records))
    }

    /// Remove the record for `value`.
    pub fn delete(&self, value: &str) -> GazetteResult<()> {
        let id = content_hash(value);
        let mut entries = self.entries.write().map_err(lock_poisoned)?;

        if entries.by_id.remove(&id).is_none() {
            return Err(not_found(value));
        }
        entries.order.retain(|existing| existing != &id);
        tracing::debug!(id = %id, "String deleted");
        Ok(())
    }

    /// Number of stored records.
    pub fn len(&self) -> GazetteResult<usize> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.by_id.len())
    }

    pub fn is_empty(&self) -> GazetteResult<bool> {
        Ok(self.len()? == 0)
    }
}
