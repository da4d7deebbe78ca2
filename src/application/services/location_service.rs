//! User current-location service.
//!
//! Writes are serialized per user through the distributed lock; reads go
//! through the location cache and fall back to durable storage on a miss.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::UserLocation;
use crate::domain::repositories::LocationRepository;
use crate::error::AppError;
use crate::infrastructure::cache::LocationCache;
use crate::infrastructure::lock::{DistributedLock, LockError, LockOptions};
use crate::infrastructure::store::KeyValueStore;

const LOCK_PREFIX: &str = "lock:user:location:";

/// Service for reading and updating a user's current location.
pub struct LocationService<L, S> {
    location_repository: Arc<L>,
    cache: LocationCache<S>,
    lock: DistributedLock<S>,
    lock_options: LockOptions,
}

impl<L: LocationRepository, S: KeyValueStore> LocationService<L, S> {
    /// Creates a new location service.
    ///
    /// `cache_ttl` bounds staleness of cached locations; `lock_options`
    /// controls per-user write serialization. The lock TTL must comfortably
    /// exceed the expected durable round-trip time.
    pub fn new(
        location_repository: Arc<L>,
        store: Arc<S>,
        cache_ttl: Duration,
        lock_options: LockOptions,
    ) -> Self {
        Self {
            location_repository,
            cache: LocationCache::new(store.clone(), cache_ttl),
            lock: DistributedLock::new(store),
            lock_options,
        }
    }

    fn lock_key(user_id: &str) -> String {
        format!("{}{}", LOCK_PREFIX, user_id)
    }

    /// Updates (or first records) a user's current location.
    ///
    /// Runs under the per-user distributed lock: find the existing durable
    /// record, update it in place or insert a new one, then write through
    /// to the cache. Concurrent updates for the same user serialize on the
    /// lock; updates for different users never contend.
    ///
    /// # Errors
    ///
    /// - [`AppError::Conflict`] when the lock could not be acquired within
    ///   its retry budget; the caller should simply retry.
    /// - [`AppError::Internal`] when the lock store is unreachable or the
    ///   durable write fails.
    pub async fn update_location(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<UserLocation, AppError> {
        let lock_key = Self::lock_key(user_id);

        let outcome = self
            .lock
            .with_lock(&lock_key, self.lock_options, || {
                self.perform_update(user_id, latitude, longitude)
            })
            .await;

        match outcome {
            Ok(result) => result,
            Err(LockError::AcquisitionFailed { .. }) => {
                warn!("Concurrent location update conflict for user {}", user_id);
                Err(AppError::conflict(
                    "Location update already in progress",
                    json!({ "user_id": user_id }),
                ))
            }
            Err(LockError::StoreUnavailable(e)) => Err(AppError::internal(
                "Lock store unavailable",
                json!({ "reason": e.to_string() }),
            )),
        }
    }

    /// The critical section: durable write first, cache write after.
    async fn perform_update(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<UserLocation, AppError> {
        let existing = self.location_repository.find_by_user(user_id).await?;

        let saved = match existing {
            Some(_) => {
                self.location_repository
                    .update_by_user(user_id, latitude, longitude)
                    .await?
            }
            None => {
                self.location_repository
                    .insert(user_id, latitude, longitude)
                    .await?
            }
        };

        self.cache.put(&saved).await;

        debug!("Location updated for user {}", user_id);
        Ok(saved)
    }

    /// Retrieves a user's current location, cache first.
    ///
    /// A cache hit returns without touching durable storage. On a miss the
    /// durable record is read and cached best-effort for future requests.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] when the user has no recorded location.
    /// - [`AppError::Internal`] on durable-store errors.
    pub async fn get_location(&self, user_id: &str) -> Result<UserLocation, AppError> {
        if let Some(cached) = self.cache.get(user_id).await {
            return Ok(cached);
        }

        let location = self
            .location_repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "No location recorded for user",
                    json!({ "user_id": user_id }),
                )
            })?;

        self.cache.put(&location).await;
        Ok(location)
    }

    /// Drops the cached location for a user, best-effort.
    pub async fn invalidate(&self, user_id: &str) {
        self.cache.invalidate(user_id).await;
    }
}
