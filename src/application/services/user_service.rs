//! Registered-email checks backed by the membership filter.
//!
//! The filter front-runs the durable existence lookup: a negative answer is
//! definitive and skips the database entirely; a positive answer (which may
//! be a false positive) triggers one durable lookup to confirm.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::membership::EmailMembershipFilter;
use crate::infrastructure::store::{KeyValueStore, StoreError};

/// Service wrapping the email membership filter around durable user lookups.
pub struct UserService<U, S> {
    user_repository: Arc<U>,
    email_filter: EmailMembershipFilter<S>,
}

impl<U: UserRepository, S: KeyValueStore> UserService<U, S> {
    pub fn new(
        user_repository: Arc<U>,
        store: Arc<S>,
        filter_capacity: u64,
        filter_error_rate: f64,
    ) -> Self {
        Self {
            user_repository,
            email_filter: EmailMembershipFilter::new(store, filter_capacity, filter_error_rate),
        }
    }

    /// Checks whether an email address belongs to a registered user.
    ///
    /// The membership filter is consulted first. A `false` from the filter
    /// is authoritative (no false negatives) and short-circuits without a
    /// durable lookup. A `true` (possibly a false positive, and also the
    /// fail-open answer when the filter store is down) is confirmed
    /// against durable storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on durable-store errors.
    pub async fn is_email_registered(&self, email: &str) -> Result<bool, AppError> {
        if !self.email_filter.might_contain(email).await {
            debug!("Membership filter rules out email, skipping durable lookup");
            return Ok(false);
        }

        debug!("Membership filter reports possible match, checking durable store");
        Ok(self.user_repository.find_by_email(email).await?.is_some())
    }

    /// Records a successfully registered email in the membership filter.
    ///
    /// The filter is an optimization, not a correctness requirement: a
    /// failure to add is logged and swallowed, and the worst case is one
    /// extra durable lookup on a future duplicate check.
    pub async fn mark_email_registered(&self, email: &str) {
        match self.email_filter.add(email).await {
            Ok(_) => debug!("Email recorded in membership filter"),
            Err(e) => warn!("Failed to record email in membership filter: {}", e),
        }
    }

    /// Startup bulk pass: creates the filter if absent and populates it
    /// with every active registered email.
    ///
    /// # Returns
    ///
    /// The number of emails added.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the filter store or the durable
    /// store fails; callers running at startup may log and continue, since
    /// the filter fails open when missing entries cannot be ruled out.
    pub async fn populate_email_filter(&self) -> Result<usize, AppError> {
        self.email_filter
            .initialize_if_absent()
            .await
            .map_err(filter_error)?;

        let emails = self.user_repository.list_active_emails().await?;
        if emails.is_empty() {
            info!("No registered emails to populate");
            return Ok(0);
        }

        self.email_filter
            .add_all(&emails)
            .await
            .map_err(filter_error)?;
        info!("Populated email membership filter with {} entries", emails.len());
        Ok(emails.len())
    }

    /// Clears the filter and repopulates it from durable storage.
    ///
    /// # Errors
    ///
    /// Same as [`Self::populate_email_filter`].
    pub async fn rebuild_email_filter(&self) -> Result<usize, AppError> {
        self.email_filter.reset().await.map_err(filter_error)?;
        self.populate_email_filter().await
    }
}

fn filter_error(e: StoreError) -> AppError {
    AppError::internal(
        "Email membership filter unavailable",
        json!({ "reason": e.to_string() }),
    )
}
