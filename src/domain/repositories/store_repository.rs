//! Repository trait for geo-radius store queries.

use crate::domain::entities::StoreWithDistance;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store-catalog query interface.
///
/// The backing implementation computes distances server-side (e.g. with a
/// spatial index) and already filters to active, non-deleted stores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreSearchRepository: Send + Sync {
    /// Finds stores within `radius_m` meters of the center point.
    ///
    /// Results are ordered by ascending distance from the center and
    /// paginated with a 1-based `page_index`. The second tuple element is
    /// the total match count before pagination.
    ///
    /// # Arguments
    ///
    /// - `name_filter` - optional substring match on the store name
    /// - `type_filter` - optional exact match on the store type
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    #[allow(clippy::too_many_arguments)]
    async fn radius_search(
        &self,
        center_latitude: f64,
        center_longitude: f64,
        radius_m: f64,
        name_filter: Option<String>,
        type_filter: Option<String>,
        page_index: u32,
        page_size: u32,
    ) -> Result<(Vec<StoreWithDistance>, u64), AppError>;
}
