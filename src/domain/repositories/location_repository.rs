//! Repository trait for durable user-location storage.

use crate::domain::entities::UserLocation;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable storage for per-user current locations.
///
/// Implementations persist a queryable geographic point alongside the plain
/// latitude/longitude scalars and refresh `updated_at` on every write. This
/// crate consumes the interface; the backing store lives with the host
/// application.
///
/// # Implementations
///
/// - Test mocks available with `cfg(test)`
/// - Hand-rolled fakes in `tests/common` for integration suites
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Finds the location record for a user.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UserLocation))` if a record exists
    /// - `Ok(None)` if the user has no recorded location
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_user(&self, user_id: &str) -> Result<Option<UserLocation>, AppError>;

    /// Inserts a new location record for a user with no prior record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<UserLocation, AppError>;

    /// Updates the existing location record for a user in place.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update_by_user(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<UserLocation, AppError>;
}
