//! DTOs for registration and login.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Identity;

/// Registration payload. Missing fields deserialize as empty and are
/// rejected by the account service.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 50, message = "Username must be at most 50 characters"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 254))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 128))]
    pub password: String,
}

/// Public view of a user; never includes the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<Identity> for UserDto {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            email: identity.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserDto,
}
