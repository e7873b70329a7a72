//! Optional bearer credential middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

use crate::domain::AuthState;
use crate::{error::AppError, state::AppState};

/// Classifies the caller and attaches an [`AuthState`] to the request.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Outcomes
///
/// - No header, another scheme, or an empty token: the request continues as
///   [`AuthState::Anonymous`]
/// - A valid, unexpired token: the request continues as
///   [`AuthState::Authenticated`]
/// - A token that fails verification, or is not valid UTF-8: the request
///   stops with `403 Forbidden` and never reaches the handler
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::post, middleware};
/// use crate::api::middleware::auth;
///
/// let router = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.as_bytes());

    let auth = st
        .authenticator
        .classify_raw(authorization)
        .into_state()
        .map_err(|e| {
            AppError::forbidden(
                "Invalid or expired token",
                serde_json::json!({ "reason": e.to_string() }),
            )
        })?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

/// Reads the [`AuthState`] attached by [`layer`].
///
/// Routes mounted without the middleware see every caller as anonymous.
impl<S> FromRequestParts<S> for AuthState
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthState>()
            .cloned()
            .unwrap_or_default())
    }
}
