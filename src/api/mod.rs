//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extract`] - JSON body extractor with API error rejections
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Optional bearer authentication and request tracing

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
