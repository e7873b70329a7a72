//! User registration and login.

use regex::Regex;
use serde_json::json;
use std::sync::{Arc, LazyLock};

use crate::domain::entities::{Identity, NewUser};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::security::{JwtCodec, PasswordHasher};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Checks registration fields: all non-blank, within length limits, email
/// shaped like `a@b.c`.
///
/// Shared by the HTTP API and the admin CLI. Lengths are counted in
/// characters.
///
/// # Errors
///
/// Returns [`AppError::Validation`] describing the first problem found.
pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AppError> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(AppError::bad_request(
            "Username, email and password are required",
            serde_json::Value::Null,
        ));
    }

    for (field, value, max) in [
        ("username", username, MAX_USERNAME_LENGTH),
        ("email", email, MAX_EMAIL_LENGTH),
        ("password", password, MAX_PASSWORD_LENGTH),
    ] {
        if value.chars().count() > max {
            return Err(AppError::bad_request(
                format!("{field} must be at most {max} characters"),
                json!({ "field": field, "max": max }),
            ));
        }
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(AppError::bad_request(
            "Invalid email format",
            json!({ "email": email }),
        ));
    }

    Ok(())
}

/// A successful login: the issued credential and who it identifies.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub identity: Identity,
}

/// Service for account registration and credential issuance.
pub struct AccountService {
    user_repository: Arc<dyn UserRepository>,
    codec: Arc<JwtCodec>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(user_repository: Arc<dyn UserRepository>, codec: Arc<JwtCodec>) -> Self {
        Self {
            user_repository,
            codec,
            hasher: PasswordHasher::new(),
        }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is blank or the email is malformed.
    /// Returns [`AppError::Conflict`] if the username or email is already in use.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, AppError> {
        validate_registration(username, email, password)?;

        if self
            .user_repository
            .find_by_username_or_email(username, email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Username or email is already in use",
                serde_json::Value::Null,
            ));
        }

        let password_hash = self.hash_password(password).await?;

        let user = self
            .user_repository
            .insert(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(user.identity())
    }

    /// Verifies `email` / `password` and issues a bearer credential.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is blank.
    /// Returns [`AppError::Unauthorized`] if the credentials do not match.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::bad_request(
                "Email and password are required",
                serde_json::Value::Null,
            ));
        }

        let Some(user) = self.user_repository.find_by_email(email).await? else {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, serde_json::Value::Null));
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::info!(user_id = user.id, "Login failed: password mismatch");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, serde_json::Value::Null));
        }

        let identity = user.identity();
        let token = self.codec.sign(&identity).map_err(|e| {
            AppError::internal("Failed to issue credential", json!({ "reason": e.to_string() }))
        })?;

        tracing::info!(user_id = identity.id, "User logged in");

        Ok(LoginResult { token, identity })
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::internal("Password hashing task failed", json!({ "reason": e.to_string() })))?
            .map_err(|e| AppError::internal("Failed to hash password", json!({ "reason": e.to_string() })))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::internal("Password verification task failed", json!({ "reason": e.to_string() })))?
            .map_err(|e| AppError::internal("Stored password hash is invalid", json!({ "reason": e.to_string() })))
    }
}
