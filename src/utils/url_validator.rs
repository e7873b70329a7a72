//! Validation of URLs submitted for shortening.

use url::Url;

/// Reasons a submitted URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,
    #[error("URL is not a valid absolute URL: {0}")]
    Malformed(String),
    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is a non-empty absolute URL with a scheme and a host.
///
/// The URL is not rewritten; callers store the input exactly as submitted so
/// that redirects return it unchanged.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_long_url("https://example.com/page").is_ok());
/// assert!(validate_long_url("not-a-url").is_err());
/// assert!(validate_long_url("mailto:a@x.com").is_err());
/// ```
pub fn validate_long_url(input: &str) -> Result<Url, UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::Malformed(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}
