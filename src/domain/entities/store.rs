//! Store catalog entities and geo-search parameter/result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One store in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub store_type: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A store paired with its computed distance from a search center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreWithDistance {
    #[serde(flatten)]
    pub store: Store,
    /// Distance from the search center in meters.
    pub distance_m: f64,
}

/// Fully-specified radius search parameters.
///
/// Inputs are assumed already validated (coordinates in range, page index
/// 1-based) by the time they reach this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSearchQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub name: Option<String>,
    pub store_type: Option<String>,
    pub page_index: u32,
    pub page_size: u32,
}

/// Radius search parameters relative to the caller's current location.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchRequest {
    pub radius_km: f64,
    pub name: Option<String>,
    pub store_type: Option<String>,
    pub page_index: u32,
    pub page_size: u32,
}

/// One page of radius search results, ordered by ascending distance.
///
/// This is the payload stored in the search cache; an empty `stores` list is
/// a valid cached value, distinct from a cache miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSearchPage {
    pub stores: Vec<StoreWithDistance>,
    pub total_item_count: u64,
    pub page_index: u32,
    pub page_size: u32,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub radius_km: f64,
}
