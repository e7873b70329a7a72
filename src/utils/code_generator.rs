//! Short code generation and validation utilities.
//!
//! Codes are 6 characters drawn uniformly from `[A-Za-z0-9]`. Uniqueness is
//! not guaranteed here; see [`crate::application::services::CodeAllocator`].

use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use std::sync::LazyLock;

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 6;

/// Codes that collide with fixed routes and are never handed out.
pub const RESERVED_CODES: &[&str] = &["health"];

/// Canonical short code shape.
static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{6}$").expect("short code regex is valid")
});

/// Source of candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces one candidate code.
    fn generate(&self) -> String;
}

/// Generator backed by the thread-local, OS-seeded RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random 6-character alphanumeric code.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Returns true if `code` has the canonical short code shape.
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Returns true if `code` is shadowed by a fixed route.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
