//! Application error types and their HTTP mapping.
//!
//! [`AppError`] is the single error type returned by services and handlers.
//! Repositories report [`StoreError`], which keeps the storage-level
//! distinction between constraint violations and an unreachable store until
//! the service layer decides what to do with it.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Error body returned to clients.
///
/// ```json
/// { "error": "Invalid URL format", "code": "validation_error" }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

/// Errors surfaced by the service and API layers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input (bad URL, missing registration fields).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// A credential is required but none was presented, or login failed.
    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    /// A credential was presented but failed verification.
    #[error("{message}")]
    Forbidden { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Duplicate username or email at registration.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// The collision resolver ran out of attempts.
    #[error("Failed to allocate a unique short code after {attempts} attempts")]
    AllocationExhausted { attempts: usize },

    /// The backing store is unreachable, timed out, or returned an error.
    #[error("{message}")]
    StoreUnavailable { message: String },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::AllocationExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::Unauthorized { .. } => "unauthorized",
            AppError::Forbidden { .. } => "forbidden",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::AllocationExhausted { .. } => "allocation_exhausted",
            AppError::StoreUnavailable { .. } => "store_unavailable",
            AppError::Internal { .. } => "internal_error",
        }
    }

    /// Converts the error into the serializable client body.
    pub fn to_error_body(&self) -> ErrorBody {
        let details = match self {
            AppError::Validation { details, .. }
            | AppError::Unauthorized { details, .. }
            | AppError::Forbidden { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Conflict { details, .. }
            | AppError::Internal { details, .. } => details.clone(),
            AppError::AllocationExhausted { attempts } => json!({ "attempts": attempts }),
            AppError::StoreUnavailable { .. } => Value::Null,
        };

        ErrorBody {
            error: self.to_string(),
            code: self.code(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        let mut response = (status, Json(self.to_error_body())).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        AppError::bad_request(
            "Validation failed",
            json!({ "fields": fields, "errors": errors }),
        )
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

/// Errors reported by repository implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert rejected by the unique constraint on `short_code`.
    #[error("short code '{0}' already exists")]
    DuplicateCode(String),

    /// Insert rejected by the unique constraint on username or email.
    #[error("username or email already exists")]
    DuplicateIdentity,

    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateCode(code) => AppError::conflict(
                "Short code already exists",
                json!({ "short_code": code }),
            ),
            StoreError::DuplicateIdentity => AppError::conflict(
                "Username or email is already in use",
                Value::Null,
            ),
            StoreError::Unavailable(source) => {
                tracing::error!(error = %source, "Store operation failed");
                AppError::StoreUnavailable {
                    message: "Storage backend is unavailable".to_string(),
                }
            }
        }
    }
}
