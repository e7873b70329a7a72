//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping with its click counter
//! - [`User`] - A registered account
//! - [`Identity`] - The public part of a user carried by credentials
//!
//! Separate `NewLink` / `NewUser` structs carry the data for inserts.

pub mod link;
pub mod user;

pub use link::{Link, NewLink};
pub use user::{Identity, NewUser, User};
