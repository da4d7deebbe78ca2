//! Process-local store implementation for tests and Redis-less development.

use super::kv::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use bloomfilter::Bloom;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_FILTER_CAPACITY: usize = 10_000;
const DEFAULT_FILTER_ERROR_RATE: f64 = 0.001;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.expires_at > Instant::now()
    }
}

/// An in-process [`KeyValueStore`].
///
/// Honors TTLs (expired entries read as absent) and implements the
/// membership-filter primitives with an in-process bloom filter sized from
/// the reserve parameters. Being process-local it cannot coordinate
/// multiple service instances, so it is only suitable for tests and
/// single-process development.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, Entry>>,
    filters: Mutex<HashMap<String, Bloom<String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        debug!("Using in-memory key-value store");
        Self::default()
    }

    fn new_filter(error_rate: f64, capacity: usize) -> StoreResult<Bloom<String>> {
        Bloom::new_for_fp_rate(capacity, error_rate)
            .map_err(|e| StoreError::Operation(e.to_string()))
    }

    /// Looks up the filter at `key`, creating it with backend defaults when
    /// absent (the behavior of a bare `BF.ADD`).
    fn bloom_entry<'a>(
        filters: &'a mut HashMap<String, Bloom<String>>,
        key: &str,
    ) -> StoreResult<&'a mut Bloom<String>> {
        match filters.entry(key.to_string()) {
            MapEntry::Occupied(entry) => Ok(entry.into_mut()),
            MapEntry::Vacant(entry) => Ok(entry.insert(Self::new_filter(
                DEFAULT_FILTER_ERROR_RATE,
                DEFAULT_FILTER_CAPACITY,
            )?)),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> StoreResult<bool> {
        let mut entries = self.entries.lock();
        if entries.get(key).is_some_and(Entry::is_live) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.lock().remove(key);
        self.filters.lock().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        if self.entries.lock().get(key).is_some_and(Entry::is_live) {
            return Ok(true);
        }
        Ok(self.filters.lock().contains_key(key))
    }

    async fn filter_reserve(&self, key: &str, error_rate: f64, capacity: u64) -> StoreResult<()> {
        let mut filters = self.filters.lock();
        if filters.contains_key(key) {
            return Err(StoreError::Operation(format!(
                "filter `{}` already exists",
                key
            )));
        }
        filters.insert(key.to_string(), Self::new_filter(error_rate, capacity as usize)?);
        Ok(())
    }

    async fn filter_add(&self, key: &str, item: &str) -> StoreResult<bool> {
        let mut filters = self.filters.lock();
        let bloom = Self::bloom_entry(&mut filters, key)?;

        let item = item.to_string();
        let present = bloom.check(&item);
        if !present {
            bloom.set(&item);
        }
        Ok(!present)
    }

    async fn filter_add_many(&self, key: &str, items: &[String]) -> StoreResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        let mut filters = self.filters.lock();
        let bloom = Self::bloom_entry(&mut filters, key)?;
        for item in items {
            bloom.set(item);
        }
        Ok(())
    }

    async fn filter_contains(&self, key: &str, item: &str) -> StoreResult<bool> {
        let filters = self.filters.lock();
        match filters.get(key) {
            Some(bloom) => Ok(bloom.check(&item.to_string())),
            None => Ok(false),
        }
    }
}
