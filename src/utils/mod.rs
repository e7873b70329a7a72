//! Utility functions for code generation, URL validation, and request handling.
//!
//! - [`code_generator`] - Short code generation and shape validation
//! - [`url_validator`] - Absolute URL validation for submitted links
//! - [`client_ip`] - Client address extraction
//! - [`db_error`] - PostgreSQL constraint violation classification

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
pub mod url_validator;
