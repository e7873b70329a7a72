//! Handler for listing the caller's links.

use axum::{Json, extract::State};

use crate::api::dto::links::{LinkItem, ListLinksResponse};
use crate::domain::AuthState;
use crate::error::AppError;
use crate::state::AppState;

/// Lists links created by the authenticated caller, newest first.
///
/// # Endpoint
///
/// `GET /urls`
///
/// # Errors
///
/// Returns 401 Unauthorized without a bearer credential.
/// Returns 403 Forbidden if the presented credential fails verification.
pub async fn list_links_handler(
    State(state): State<AppState>,
    auth: AuthState,
) -> Result<Json<ListLinksResponse>, AppError> {
    let links = state.link_service.list_owned(&auth).await?;

    let urls = links
        .into_iter()
        .map(|link| LinkItem {
            short_url: state.link_service.short_url(&link.short_code),
            original_url: link.original_url,
            short_code: link.short_code,
            click_count: link.click_count,
            created_at: link.created_at,
        })
        .collect();

    Ok(Json(ListLinksResponse {
        message: "Short links listed successfully.".to_string(),
        urls,
    }))
}
