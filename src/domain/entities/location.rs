//! User current-location entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recently known position of one user.
///
/// At most one record exists per user. The cached copy mirrors the durable
/// record exactly; `updated_at` is refreshed by the storage layer on every
/// durable write, so a cached value is never newer than its durable source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>,
}

impl UserLocation {
    pub fn new(
        user_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            latitude,
            longitude,
            updated_at,
        }
    }
}
