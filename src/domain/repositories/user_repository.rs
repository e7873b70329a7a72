//! Repository trait for user account data access.

use crate::domain::entities::{NewUser, User};
use crate::error::StoreError;
use async_trait::async_trait;

/// Repository interface for the identity store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user whose username equals `username` or whose email equals `email`.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateIdentity`] if the username or email is taken.
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Lists all users ordered by id.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}
