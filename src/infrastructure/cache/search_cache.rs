//! Cache of paginated geo-search results keyed by query fingerprints.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::entities::{StoreSearchPage, StoreSearchQuery};
use crate::infrastructure::store::KeyValueStore;

const CACHE_PREFIX: &str = "stores:search:";

/// Derives the cache key for a search query.
///
/// Center coordinates are formatted to exactly 6 decimal places (~11 cm at
/// the equator), so queries differing only in floating-point noise beyond
/// that precision map to the same key, while a change to any other field
/// changes the key. Absent optional filters render as empty segments.
pub fn search_fingerprint(query: &StoreSearchQuery) -> String {
    let name = query.name.as_deref().unwrap_or("");
    let store_type = query.store_type.as_deref().unwrap_or("");

    format!(
        "{}lat:{:.6}|lng:{:.6}|r:{}|n:{}|t:{}|pi:{}|ps:{}",
        CACHE_PREFIX,
        query.latitude,
        query.longitude,
        query.radius_km,
        name,
        store_type,
        query.page_index,
        query.page_size,
    )
}

/// Read-through/write-through cache of [`StoreSearchPage`] payloads.
///
/// Entries expire by TTL only; store mutations do not invalidate them, so a
/// stale page may be served for up to the TTL after a relevant store change.
pub struct SearchCache<S> {
    store: Arc<S>,
    ttl: Duration,
}

impl<S: KeyValueStore> SearchCache<S> {
    pub fn new(store: Arc<S>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Retrieves the cached page for a fingerprint.
    ///
    /// An empty result set is a valid hit; only an absent entry (or a
    /// degraded read) is a miss.
    pub async fn get(&self, fingerprint: &str) -> Option<StoreSearchPage> {
        match self.store.get(fingerprint).await {
            Ok(Some(raw)) => match serde_json::from_str::<StoreSearchPage>(&raw) {
                Ok(page) => {
                    debug!("Cache HIT: {}", fingerprint);
                    Some(page)
                }
                Err(e) => {
                    warn!("Discarding undecodable cached search result: {}", e);
                    None
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", fingerprint);
                None
            }
            Err(e) => {
                warn!("Search cache read failed: {}", e);
                None
            }
        }
    }

    /// Stores a page, best-effort; failures are logged and swallowed.
    pub async fn put(&self, fingerprint: &str, page: &StoreSearchPage) {
        let payload = match serde_json::to_string(page) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode search result: {}", e);
                return;
            }
        };

        match self.store.set_with_ttl(fingerprint, &payload, self.ttl).await {
            Ok(()) => debug!("Cache SET: {} (TTL: {}s)", fingerprint, self.ttl.as_secs()),
            Err(e) => warn!("Failed to cache search result: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::InMemoryKeyValueStore;

    fn query() -> StoreSearchQuery {
        StoreSearchQuery {
            latitude: 37.7749,
            longitude: -122.4194,
            radius_km: 5.0,
            name: None,
            store_type: None,
            page_index: 1,
            page_size: 10,
        }
    }

    fn empty_page(q: &StoreSearchQuery) -> StoreSearchPage {
        StoreSearchPage {
            stores: Vec::new(),
            total_item_count: 0,
            page_index: q.page_index,
            page_size: q.page_size,
            center_latitude: q.latitude,
            center_longitude: q.longitude,
            radius_km: q.radius_km,
        }
    }

    #[test]
    fn test_fingerprint_ignores_noise_beyond_six_decimals() {
        let q1 = query();
        let mut q2 = query();
        q2.latitude = 37.774_900_000_04;
        q2.longitude = -122.419_400_000_01;

        assert_eq!(search_fingerprint(&q1), search_fingerprint(&q2));
    }

    #[test]
    fn test_fingerprint_distinguishes_sixth_decimal() {
        let q1 = query();
        let mut q2 = query();
        q2.latitude = 37.774_901;

        assert_ne!(search_fingerprint(&q1), search_fingerprint(&q2));
    }

    #[test]
    fn test_fingerprint_changes_with_every_field() {
        let base = search_fingerprint(&query());

        let mut q = query();
        q.radius_km = 10.0;
        assert_ne!(search_fingerprint(&q), base);

        let mut q = query();
        q.name = Some("coffee".to_string());
        assert_ne!(search_fingerprint(&q), base);

        let mut q = query();
        q.store_type = Some("grocery".to_string());
        assert_ne!(search_fingerprint(&q), base);

        let mut q = query();
        q.page_index = 2;
        assert_ne!(search_fingerprint(&q), base);

        let mut q = query();
        q.page_size = 20;
        assert_ne!(search_fingerprint(&q), base);
    }

    #[test]
    fn test_fingerprint_is_namespaced() {
        assert!(search_fingerprint(&query()).starts_with("stores:search:"));
    }

    #[tokio::test]
    async fn test_empty_page_is_a_hit_not_a_miss() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let cache = SearchCache::new(store, Duration::from_secs(300));

        let q = query();
        let fingerprint = search_fingerprint(&q);

        assert_eq!(cache.get(&fingerprint).await, None);

        cache.put(&fingerprint, &empty_page(&q)).await;

        let hit = cache.get(&fingerprint).await.expect("cached empty page");
        assert!(hit.stores.is_empty());
        assert_eq!(hit.total_item_count, 0);
    }
}
