//! Store-backed distributed mutual exclusion.
//!
//! Advisory locking over the key-value store's atomic set-if-absent: for a
//! given key, at most one body closure across all concurrent callers (in
//! this process or any peer process sharing the same store) runs between a
//! successful acquire and its release. The TTL clears the key if a holder
//! crashes mid-critical-section, so peers self-heal without intervention.
//!
//! There is no renewal or heartbeat: a critical section that runs longer
//! than its TTL can lose the lock while still executing. Callers must pick
//! a TTL comfortably larger than the expected critical-section duration.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::store::{KeyValueStore, StoreError};

const LOCK_VALUE: &str = "1";

/// Errors produced by [`DistributedLock::with_lock`].
///
/// Acquisition failure (the lock stayed held through every retry) is kept
/// distinct from store connectivity failure; only the former is worth
/// retrying at the operation level.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("failed to acquire lock `{key}` after {attempts} attempts")]
    AcquisitionFailed { key: String, attempts: u32 },
    #[error("lock store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// Acquisition parameters for [`DistributedLock::with_lock`].
#[derive(Debug, Clone, Copy)]
pub struct LockOptions {
    /// Time after which the lock key auto-expires even if never released.
    pub ttl: Duration,
    /// Total acquisition attempts before giving up.
    pub retry_times: u32,
    /// Fixed sleep between attempts.
    pub retry_delay: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10),
            retry_times: 3,
            retry_delay: Duration::from_millis(100),
        }
    }
}

/// Mutual exclusion keyed by arbitrary strings, backed by the shared store.
pub struct DistributedLock<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> DistributedLock<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Attempts to take the lock, succeeding only if the key was absent.
    ///
    /// # Errors
    ///
    /// Propagates store connectivity/command errors; `Ok(false)` means the
    /// lock is currently held by someone else.
    pub async fn acquire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.store.set_if_absent_with_ttl(key, LOCK_VALUE, ttl).await
    }

    /// Unconditionally deletes the lock key.
    pub async fn release(&self, key: &str) -> Result<(), StoreError> {
        self.store.delete(key).await
    }

    /// Runs `body` while holding the lock.
    ///
    /// Attempts `acquire` up to `options.retry_times` times with a fixed
    /// `options.retry_delay` sleep between attempts. Once acquired, `body`
    /// runs and the lock is released afterward on every exit path, whether
    /// `body`'s result is success or failure.
    ///
    /// # Errors
    ///
    /// - [`LockError::AcquisitionFailed`] when every attempt found the lock
    ///   held; `body` is never invoked in this case.
    /// - [`LockError::StoreUnavailable`] on store connectivity errors
    ///   during acquire or release. These are not retried internally;
    ///   retries apply only to "lock currently held".
    pub async fn with_lock<T, F, Fut>(
        &self,
        key: &str,
        options: LockOptions,
        body: F,
    ) -> Result<T, LockError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut attempt = 0;
        while attempt < options.retry_times {
            if self.acquire(key, options.ttl).await? {
                debug!("Acquired lock `{}`", key);
                let out = body().await;
                self.release(key).await?;
                debug!("Released lock `{}`", key);
                return Ok(out);
            }

            attempt += 1;
            if attempt < options.retry_times {
                tokio::time::sleep(options.retry_delay).await;
            }
        }

        warn!(
            "Failed to acquire lock `{}` after {} attempts",
            key, options.retry_times
        );
        Err(LockError::AcquisitionFailed {
            key: key.to_string(),
            attempts: options.retry_times,
        })
    }
}
