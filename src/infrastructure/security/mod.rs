//! Credential signing and password hashing.
//!
//! - [`JwtCodec`] - HS256 bearer credential signing and verification
//! - [`PasswordHasher`] - Argon2id password hashing

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtCodec, SigningError, VerificationError};
pub use password::{PasswordError, PasswordHasher};
