//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::StoreError;
use async_trait::async_trait;

/// Repository interface for the link store.
///
/// The store must enforce uniqueness of `short_code` itself; callers rely on
/// [`StoreError::DuplicateCode`] from [`LinkRepository::insert`] rather than
/// on a prior [`LinkRepository::exists_by_code`] check.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns true if any link already uses `code`.
    async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError>;

    /// Inserts a new link with `click_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCode`] if the short code is already taken.
    /// Returns [`StoreError::Unavailable`] on any other store failure.
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// Atomically increments the click counter of `code`.
    ///
    /// Returns `Ok(false)` if no link has that code.
    async fn increment_clicks(&self, code: &str) -> Result<bool, StoreError>;

    /// Lists links owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, StoreError>;

    /// Counts all links.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Sums click counters over all links.
    async fn total_clicks(&self) -> Result<i64, StoreError>;

    /// Round-trips to the store to check connectivity.
    async fn ping(&self) -> Result<(), StoreError>;
}
