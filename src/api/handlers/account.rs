//! Handlers for registration and login.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::account::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::api::extract::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new user.
///
/// # Endpoint
///
/// `POST /register`
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "email": "alice@example.com", "password": "secret" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for missing or overlong fields, a malformed email,
/// or a body that is not the expected JSON.
/// Returns 409 Conflict if the username or email is taken.
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.validate()?;

    let identity = state
        .account_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully.".to_string(),
            user: identity.into(),
        }),
    ))
}

/// Exchanges email and password for a bearer credential.
///
/// # Endpoint
///
/// `POST /login`
///
/// # Errors
///
/// Returns 400 Bad Request for missing fields.
/// Returns 401 Unauthorized for an unknown email or a wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let login = state
        .account_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful.".to_string(),
        token: login.token,
        user: login.identity.into(),
    }))
}
