//! Probabilistic membership tracking for registered email addresses.
//!
//! The filter state lives entirely in the key-value store under a single
//! key, so every service instance shares one view. Membership checks can
//! return false positives at the configured rate but never false negatives;
//! a `false` answer proves the email was never added.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::store::{KeyValueStore, StoreResult};

const EMAIL_FILTER_KEY: &str = "user:email:bloom";

/// Store-backed membership filter over registered email addresses.
///
/// Emails are trimmed and lowercased before every add and check, so
/// cosmetically different spellings of one address share a single entry.
pub struct EmailMembershipFilter<S> {
    store: Arc<S>,
    capacity: u64,
    error_rate: f64,
}

impl<S: KeyValueStore> EmailMembershipFilter<S> {
    pub fn new(store: Arc<S>, capacity: u64, error_rate: f64) -> Self {
        Self {
            store,
            capacity,
            error_rate,
        }
    }

    fn normalize(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Creates the filter in the store if it does not exist yet.
    ///
    /// Idempotent: an existing filter is left untouched, whatever capacity
    /// and error rate it was created with.
    pub async fn initialize_if_absent(&self) -> StoreResult<()> {
        if self.store.exists(EMAIL_FILTER_KEY).await? {
            debug!("Email membership filter already exists");
            return Ok(());
        }

        self.store
            .filter_reserve(EMAIL_FILTER_KEY, self.error_rate, self.capacity)
            .await?;
        info!(
            "Email membership filter created (capacity {}, error rate {})",
            self.capacity, self.error_rate
        );
        Ok(())
    }

    /// Adds an email to the filter.
    ///
    /// # Returns
    ///
    /// Whether the filter considered the email newly added. A `false` here
    /// reflects the filter's own prior state, not ground truth: a false
    /// positive can report a genuinely new email as already present.
    pub async fn add(&self, email: &str) -> StoreResult<bool> {
        self.store
            .filter_add(EMAIL_FILTER_KEY, &Self::normalize(email))
            .await
    }

    /// Adds every email in one batched store round-trip.
    ///
    /// An empty input is a true no-op: no store call is made.
    pub async fn add_all(&self, emails: &[String]) -> StoreResult<()> {
        if emails.is_empty() {
            return Ok(());
        }

        let normalized: Vec<String> = emails.iter().map(|e| Self::normalize(e)).collect();
        self.store
            .filter_add_many(EMAIL_FILTER_KEY, &normalized)
            .await?;
        info!("Added {} emails to membership filter", normalized.len());
        Ok(())
    }

    /// Checks whether an email may have been registered.
    ///
    /// `false` is definitive; `true` may be a false positive and requires a
    /// durable lookup to confirm. A store error fails open to `true`: the
    /// cost is one extra durable lookup, whereas failing closed could let a
    /// duplicate slip through.
    pub async fn might_contain(&self, email: &str) -> bool {
        match self
            .store
            .filter_contains(EMAIL_FILTER_KEY, &Self::normalize(email))
            .await
        {
            Ok(present) => present,
            Err(e) => {
                warn!("Email membership check failed, assuming possible member: {}", e);
                true
            }
        }
    }

    /// Deletes and re-creates the filter, empty.
    ///
    /// The caller is responsible for repopulating from the source of truth
    /// afterward.
    pub async fn reset(&self) -> StoreResult<()> {
        self.store.delete(EMAIL_FILTER_KEY).await?;
        self.initialize_if_absent().await?;
        info!("Email membership filter reset");
        Ok(())
    }
}
