//! Read-through/write-through caches over the key-value store.
//!
//! Both caches are pure accelerators: every read error degrades to a miss
//! and every write error is logged and swallowed, so an unavailable cache
//! store falls back to the durable path instead of failing requests.

mod location_cache;
mod search_cache;

pub use location_cache::LocationCache;
pub use search_cache::{SearchCache, search_fingerprint};
