//! Store trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Connectivity problems and command failures are kept distinct so that
/// callers can tell "the store is unreachable" apart from "the store
/// rejected this operation".
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),
    #[error("key-value store operation failed: {0}")]
    Operation(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Remote string key-value store with TTL support and probabilistic
/// membership-filter primitives.
///
/// This is the substrate under the distributed lock, both caches, and the
/// email membership filter. Implementations must be thread-safe; every
/// method is a potentially blocking network round-trip. Errors propagate:
/// the layers above decide whether a failure is swallowed (caches), failed
/// open (filter reads), or surfaced (lock, filter writes).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieves the value stored at `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if the key is absent or expired
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` at `key` with the given time-to-live.
    ///
    /// Sub-second TTLs are rounded up to one second by backends with
    /// second-granularity expiry.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Atomically creates `key` only if it is currently absent, with the
    /// given time-to-live.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the key was created, `Ok(false)` if it already existed.
    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> StoreResult<bool>;

    /// Unconditionally deletes `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Checks whether `key` currently exists.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Creates an empty membership filter at `key` sized for `capacity`
    /// items at the target false-positive `error_rate`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Operation`] if a filter already exists at `key`.
    async fn filter_reserve(&self, key: &str, error_rate: f64, capacity: u64) -> StoreResult<()>;

    /// Adds `item` to the membership filter at `key`, creating the filter
    /// with backend defaults if absent.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the item was newly added, `Ok(false)` if the filter
    /// already reported it present.
    async fn filter_add(&self, key: &str, item: &str) -> StoreResult<bool>;

    /// Adds every item to the membership filter at `key` in one batched
    /// round-trip.
    async fn filter_add_many(&self, key: &str, items: &[String]) -> StoreResult<()>;

    /// Checks whether `item` may be a member of the filter at `key`.
    ///
    /// A missing filter reports `Ok(false)` for every item. A `true` result
    /// may be a false positive; a `false` result is definitive.
    async fn filter_contains(&self, key: &str, item: &str) -> StoreResult<bool>;
}
