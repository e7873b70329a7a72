//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its owner and click counter.
///
/// Links are immutable after creation except for `click_count`, which only
/// ever grows by one per successful redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    /// `None` for anonymous links.
    pub owner_id: Option<i64>,
    pub source_ip: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        owner_id: Option<i64>,
        source_ip: String,
        click_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            owner_id,
            source_ip,
            click_count,
            created_at,
        }
    }

    /// Returns true if the link has no owning user.
    pub fn is_anonymous(&self) -> bool {
        self.owner_id.is_none()
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: String,
    pub owner_id: Option<i64>,
    pub source_ip: String,
}
