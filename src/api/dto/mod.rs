//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Link payloads use camelCase field names.

pub mod account;
pub mod health;
pub mod links;
pub mod shorten;
