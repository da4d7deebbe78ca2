//! Geo-radius store search with result caching.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::LocationService;
use crate::domain::entities::{NearbySearchRequest, StoreSearchPage, StoreSearchQuery};
use crate::domain::repositories::{LocationRepository, StoreSearchRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{SearchCache, search_fingerprint};
use crate::infrastructure::store::KeyValueStore;

/// Service for searching stores around a point or around a user.
///
/// Results are cached per canonical query fingerprint. Store mutations do
/// not invalidate cached pages; staleness is bounded by the cache TTL only.
pub struct StoreSearchService<R, L, S> {
    store_repository: Arc<R>,
    location_service: Arc<LocationService<L, S>>,
    cache: SearchCache<S>,
}

impl<R, L, S> StoreSearchService<R, L, S>
where
    R: StoreSearchRepository,
    L: LocationRepository,
    S: KeyValueStore,
{
    pub fn new(
        store_repository: Arc<R>,
        location_service: Arc<LocationService<L, S>>,
        store: Arc<S>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store_repository,
            location_service,
            cache: SearchCache::new(store, cache_ttl),
        }
    }

    /// Searches for stores within a radius of the query's center point.
    ///
    /// On a cache hit the stored page is returned without touching durable
    /// storage, including pages with zero matches. On a miss the geo query
    /// runs (radius converted to meters, results ordered by ascending
    /// distance) and the composed page is cached best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on durable-store errors.
    pub async fn search_stores(&self, query: &StoreSearchQuery) -> Result<StoreSearchPage, AppError> {
        let fingerprint = search_fingerprint(query);

        if let Some(page) = self.cache.get(&fingerprint).await {
            debug!("Serving store search from cache");
            return Ok(page);
        }

        debug!("Store search cache miss, querying repository");
        let radius_m = query.radius_km * 1000.0;

        let (stores, total_item_count) = self
            .store_repository
            .radius_search(
                query.latitude,
                query.longitude,
                radius_m,
                query.name.clone(),
                query.store_type.clone(),
                query.page_index,
                query.page_size,
            )
            .await?;

        let page = StoreSearchPage {
            stores,
            total_item_count,
            page_index: query.page_index,
            page_size: query.page_size,
            center_latitude: query.latitude,
            center_longitude: query.longitude,
            radius_km: query.radius_km,
        };

        self.cache.put(&fingerprint, &page).await;

        info!(
            "Found {} stores within {} km of ({}, {})",
            total_item_count, query.radius_km, query.latitude, query.longitude
        );
        Ok(page)
    }

    /// Searches for stores around the user's current location.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the user has no recorded
    /// location, otherwise the same errors as [`Self::search_stores`].
    pub async fn search_from_user_location(
        &self,
        user_id: &str,
        request: &NearbySearchRequest,
    ) -> Result<StoreSearchPage, AppError> {
        let location = self.location_service.get_location(user_id).await?;

        let query = StoreSearchQuery {
            latitude: location.latitude,
            longitude: location.longitude,
            radius_km: request.radius_km,
            name: request.name.clone(),
            store_type: request.store_type.clone(),
            page_index: request.page_index,
            page_size: request.page_size,
        };

        self.search_stores(&query).await
    }
}
