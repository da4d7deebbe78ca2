//! Repository trait for user-existence lookups.

use crate::domain::entities::User;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable user lookups needed by the email-existence flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds an active user by email address.
    ///
    /// Only consulted when the membership filter reports a possible match.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists the email addresses of every active registered user.
    ///
    /// Used by the startup bulk pass that populates the membership filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_active_emails(&self) -> Result<Vec<String>, AppError>;
}
