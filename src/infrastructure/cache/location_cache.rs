//! Cache of per-user current locations.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::entities::UserLocation;
use crate::infrastructure::store::KeyValueStore;

const CACHE_PREFIX: &str = "user:location:";

/// Read-through/write-through cache of one [`UserLocation`] per user.
///
/// Entries are written only after the corresponding durable write has
/// committed, so a cached value is never fresher than durable state.
pub struct LocationCache<S> {
    store: Arc<S>,
    ttl: Duration,
}

impl<S: KeyValueStore> LocationCache<S> {
    pub fn new(store: Arc<S>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    fn cache_key(user_id: &str) -> String {
        format!("{}{}", CACHE_PREFIX, user_id)
    }

    /// Retrieves the cached location for a user.
    ///
    /// Store errors and undecodable payloads degrade to a miss; the caller
    /// falls back to the durable record.
    pub async fn get(&self, user_id: &str) -> Option<UserLocation> {
        let key = Self::cache_key(user_id);

        match self.store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<UserLocation>(&raw) {
                Ok(location) => {
                    debug!("Cache HIT: location for user {}", user_id);
                    Some(location)
                }
                Err(e) => {
                    warn!("Discarding undecodable cached location for user {}: {}", user_id, e);
                    None
                }
            },
            Ok(None) => {
                debug!("Cache MISS: location for user {}", user_id);
                None
            }
            Err(e) => {
                warn!("Location cache read failed for user {}: {}", user_id, e);
                None
            }
        }
    }

    /// Stores a location, best-effort.
    ///
    /// Failures are logged and swallowed; the durable write has already
    /// succeeded by the time this runs.
    pub async fn put(&self, location: &UserLocation) {
        let key = Self::cache_key(&location.user_id);

        let payload = match serde_json::to_string(location) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode location for user {}: {}", location.user_id, e);
                return;
            }
        };

        match self.store.set_with_ttl(&key, &payload, self.ttl).await {
            Ok(()) => debug!(
                "Cache SET: location for user {} (TTL: {}s)",
                location.user_id,
                self.ttl.as_secs()
            ),
            Err(e) => warn!("Failed to cache location for user {}: {}", location.user_id, e),
        }
    }

    /// Removes the cached location for a user, best-effort.
    pub async fn invalidate(&self, user_id: &str) {
        let key = Self::cache_key(user_id);

        match self.store.delete(&key).await {
            Ok(()) => debug!("Cache INVALIDATE: location for user {}", user_id),
            Err(e) => warn!("Failed to invalidate location cache for user {}: {}", user_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::{InMemoryKeyValueStore, MockKeyValueStore, StoreError};
    use chrono::Utc;

    fn location(user_id: &str) -> UserLocation {
        UserLocation::new(user_id, 37.7749, -122.4194, Utc::now())
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let cache = LocationCache::new(store, Duration::from_secs(300));

        let loc = location("u1");
        cache.put(&loc).await;

        assert_eq!(cache.get("u1").await, Some(loc));
        assert_eq!(cache.get("u2").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let cache = LocationCache::new(store, Duration::from_secs(300));

        cache.put(&location("u1")).await;
        cache.invalidate("u1").await;

        assert_eq!(cache.get("u1").await, None);
    }

    #[tokio::test]
    async fn test_read_error_degrades_to_miss() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("down".into())));

        let cache = LocationCache::new(Arc::new(store), Duration::from_secs(300));
        assert_eq!(cache.get("u1").await, None);
    }

    #[tokio::test]
    async fn test_write_error_is_swallowed() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set_with_ttl()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Unavailable("down".into())));

        let cache = LocationCache::new(Arc::new(store), Duration::from_secs(300));
        cache.put(&location("u1")).await;
    }

    #[tokio::test]
    async fn test_undecodable_payload_degrades_to_miss() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store
            .set_with_ttl("user:location:u1", "not json", Duration::from_secs(300))
            .await
            .unwrap();

        let cache = LocationCache::new(store, Duration::from_secs(300));
        assert_eq!(cache.get("u1").await, None);
    }
}
