//! # Store Locator Core
//!
//! Caching and distributed-locking core for a location-based store search
//! backend: per-user current locations, geo-radius store search results,
//! and registered-email membership checks, all layered over one shared
//! key-value store.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Core entities and the collaborator
//!   interfaces for durable storage (implemented by the host application)
//! - **Application Layer** ([`application`]) - Location, store-search, and
//!   user-email services orchestrating locks, caches, and the filter
//! - **Infrastructure Layer** ([`infrastructure`]) - Key-value store
//!   backends, the distributed lock, caches, and the membership filter
//!
//! ## Guarantees
//!
//! - Location updates for one user are serialized across every process
//!   sharing the store; updates for different users never contend.
//! - Caches are pure accelerators: when the store is unavailable, reads
//!   fall back to durable storage and writes are skipped, never failing a
//!   request.
//! - The email membership filter has no false negatives and fails open on
//!   store errors, so a duplicate can never slip past an outage.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point the core at a Redis server (RedisBloom required for BF.* commands)
//! export REDIS_URL="redis://localhost:6379"
//! ```
//!
//! Wire the services with your repository implementations:
//!
//! ```rust,ignore
//! let config = store_locator_core::config::load_from_env()?;
//! let store = Arc::new(RedisKeyValueStore::connect(&config.redis_url).await?);
//! let locations = Arc::new(LocationService::new(
//!     location_repository,
//!     store.clone(),
//!     config.location_cache_ttl(),
//!     config.lock_options(),
//! ));
//! ```
//!
//! ## Configuration
//!
//! Loaded from environment variables via [`config::Config`]. See the
//! [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LocationService, StoreSearchService, UserService};
    pub use crate::config::Config;
    pub use crate::domain::entities::{
        NearbySearchRequest, Store, StoreSearchPage, StoreSearchQuery, StoreWithDistance, User,
        UserLocation,
    };
    pub use crate::domain::repositories::{
        LocationRepository, StoreSearchRepository, UserRepository,
    };
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{LocationCache, SearchCache, search_fingerprint};
    pub use crate::infrastructure::lock::{DistributedLock, LockError, LockOptions};
    pub use crate::infrastructure::membership::EmailMembershipFilter;
    pub use crate::infrastructure::store::{
        InMemoryKeyValueStore, KeyValueStore, RedisKeyValueStore, StoreError,
    };
}
