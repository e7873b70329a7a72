//! HTTP middleware for request processing.
//!
//! Provides optional bearer authentication and request tracing.

pub mod auth;
pub mod tracing;
