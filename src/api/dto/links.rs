//! DTOs for listing a user's links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One owned link as returned by `GET /urls`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListLinksResponse {
    pub message: String,
    pub urls: Vec<LinkItem>,
}
