//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::ApiJson;
use crate::domain::AuthState;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::ClientIp;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// A bearer credential is optional. With a valid one the link is owned by
/// that user; without one the link is anonymous.
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "originalUrl": "https://example.com/some/long/path",
///   "shortUrl": "http://localhost:3000/aZ3k9Q",
///   "message": "URL shortened successfully."
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an empty or non-absolute URL, or a body that
/// is not the expected JSON.
/// Returns 403 Forbidden if the presented credential fails verification.
/// Returns 500 if no unique code could be allocated.
pub async fn shorten_handler(
    State(state): State<AppState>,
    auth: AuthState,
    ClientIp(source_ip): ClientIp,
    ApiJson(payload): ApiJson<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let created = state
        .link_service
        .create(&payload.long_url, &auth, &source_ip)
        .await?;

    let message = if auth.is_authenticated() {
        "URL shortened successfully."
    } else {
        "URL shortened successfully (anonymous)."
    };

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            original_url: created.link.original_url,
            short_url: created.short_url,
            message: message.to_string(),
        }),
    ))
}
