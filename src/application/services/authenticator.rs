//! Bearer credential classification.

use std::sync::Arc;

use crate::domain::AuthState;
use crate::domain::entities::Identity;
use crate::infrastructure::security::{JwtCodec, VerificationError};

/// Result of inspecting a request's `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No bearer credential was presented.
    Anonymous,
    /// The credential verified against the server secret and has not expired.
    Authenticated(Identity),
    /// A credential was presented but failed verification.
    Rejected(VerificationError),
}

impl AuthOutcome {
    /// Converts a non-rejected outcome into the state attached to the request.
    ///
    /// Returns the verification error for rejected credentials.
    pub fn into_state(self) -> Result<AuthState, VerificationError> {
        match self {
            AuthOutcome::Anonymous => Ok(AuthState::Anonymous),
            AuthOutcome::Authenticated(identity) => Ok(AuthState::Authenticated(identity)),
            AuthOutcome::Rejected(e) => Err(e),
        }
    }
}

/// Classifies requests as anonymous, authenticated, or rejected.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// A missing header, a different scheme, or an empty token is anonymous,
/// never rejected.
#[derive(Debug, Clone)]
pub struct CredentialAuthenticator {
    codec: Arc<JwtCodec>,
}

impl CredentialAuthenticator {
    pub fn new(codec: Arc<JwtCodec>) -> Self {
        Self { codec }
    }

    /// Classifies the `Authorization` header bytes, if present.
    ///
    /// Header values may carry bytes outside visible ASCII. A bearer
    /// credential that is not valid UTF-8 is rejected as malformed; any
    /// other scheme stays anonymous.
    pub fn classify_raw(&self, authorization: Option<&[u8]>) -> AuthOutcome {
        let Some(raw) = authorization else {
            return AuthOutcome::Anonymous;
        };

        match std::str::from_utf8(raw) {
            Ok(value) => self.classify(Some(value)),
            Err(_) if has_bearer_scheme(raw) => {
                tracing::debug!("Bearer credential is not valid UTF-8");
                AuthOutcome::Rejected(VerificationError::Malformed)
            }
            Err(_) => AuthOutcome::Anonymous,
        }
    }

    /// Classifies the `Authorization` header value, if present.
    pub fn classify(&self, authorization: Option<&str>) -> AuthOutcome {
        let Some(token) = authorization.and_then(extract_bearer) else {
            return AuthOutcome::Anonymous;
        };

        match self.codec.verify(token) {
            Ok(claims) => AuthOutcome::Authenticated(claims.identity()),
            Err(e) => {
                tracing::debug!(reason = %e, "Bearer credential rejected");
                AuthOutcome::Rejected(e)
            }
        }
    }
}

/// Returns the token of a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. Returns `None` for other
/// schemes and for an empty token.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn has_bearer_scheme(raw: &[u8]) -> bool {
    let raw = raw.trim_ascii_start();
    raw.len() > 7 && raw[..6].eq_ignore_ascii_case(b"bearer") && raw[6] == b' '
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"authenticator-secret";

    fn bob() -> Identity {
        Identity {
            id: 2,
            username: "bob".to_string(),
            email: "b@x.com".to_string(),
        }
    }

    fn authenticator() -> CredentialAuthenticator {
        CredentialAuthenticator::new(Arc::new(JwtCodec::new(SECRET, 3600)))
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer("BEARER   abc  "), Some("abc"));

        assert_eq!(extract_bearer("Bearer"), None);
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer("abc.def.ghi"), None);
        assert_eq!(extract_bearer(""), None);
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(authenticator().classify(None), AuthOutcome::Anonymous);
    }

    #[test]
    fn test_other_scheme_is_anonymous() {
        assert_eq!(
            authenticator().classify(Some("Basic dXNlcjpwYXNz")),
            AuthOutcome::Anonymous
        );
    }

    #[test]
    fn test_valid_token_is_authenticated() {
        let token = JwtCodec::new(SECRET, 3600).sign(&bob()).unwrap();

        let outcome = authenticator().classify(Some(&format!("Bearer {token}")));
        assert_eq!(outcome, AuthOutcome::Authenticated(bob()));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = JwtCodec::new(SECRET, -30).sign(&bob()).unwrap();

        let outcome = authenticator().classify(Some(&format!("Bearer {token}")));
        assert_eq!(outcome, AuthOutcome::Rejected(VerificationError::Expired));
    }

    #[test]
    fn test_foreign_token_is_rejected() {
        let token = JwtCodec::new(b"someone-else", 3600).sign(&bob()).unwrap();

        let outcome = authenticator().classify(Some(&format!("Bearer {token}")));
        assert_eq!(
            outcome,
            AuthOutcome::Rejected(VerificationError::BadSignature)
        );
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let outcome = authenticator().classify(Some("Bearer garbage"));
        assert_eq!(outcome, AuthOutcome::Rejected(VerificationError::Malformed));
    }

    #[test]
    fn test_into_state() {
        assert_eq!(AuthOutcome::Anonymous.into_state(), Ok(AuthState::Anonymous));
        assert_eq!(
            AuthOutcome::Authenticated(bob()).into_state(),
            Ok(AuthState::Authenticated(bob()))
        );
        assert_eq!(
            AuthOutcome::Rejected(VerificationError::Expired).into_state(),
            Err(VerificationError::Expired)
        );
    }

    #[test]
    fn test_raw_non_ascii_bearer_is_rejected() {
        let outcome = authenticator().classify_raw(Some("Bearer tök.en.x".as_bytes()));
        assert_eq!(outcome, AuthOutcome::Rejected(VerificationError::Malformed));
    }

    #[test]
    fn test_raw_invalid_utf8_bearer_is_rejected() {
        let outcome = authenticator().classify_raw(Some(b"bearer \xff\xfe.x.y"));
        assert_eq!(outcome, AuthOutcome::Rejected(VerificationError::Malformed));
    }

    #[test]
    fn test_raw_invalid_utf8_other_scheme_is_anonymous() {
        let outcome = authenticator().classify_raw(Some(b"Basic \xff\xfe"));
        assert_eq!(outcome, AuthOutcome::Anonymous);
    }

    #[test]
    fn test_raw_missing_header_is_anonymous() {
        assert_eq!(authenticator().classify_raw(None), AuthOutcome::Anonymous);
    }
}
