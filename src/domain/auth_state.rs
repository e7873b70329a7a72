//! Per-request authentication state.

use crate::domain::entities::Identity;

/// Authentication state attached to a request that was allowed to proceed.
///
/// Requests carrying a credential that fails verification never reach a
/// handler, so there is no rejected variant here. See
/// [`crate::application::services::authenticator::AuthOutcome`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No bearer credential was presented.
    #[default]
    Anonymous,
    /// A valid, unexpired credential was presented.
    Authenticated(Identity),
}

impl AuthState {
    /// Returns the authenticated identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated(identity) => Some(identity),
        }
    }

    /// Returns the owner id to attribute new links to.
    pub fn owner_id(&self) -> Option<i64> {
        self.identity().map(|identity| identity.id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_no_owner() {
        let state = AuthState::default();
        assert_eq!(state, AuthState::Anonymous);
        assert!(state.owner_id().is_none());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_authenticated_owner() {
        let state = AuthState::Authenticated(Identity {
            id: 3,
            username: "bob".to_string(),
            email: "b@x.com".to_string(),
        });

        assert_eq!(state.owner_id(), Some(3));
        assert_eq!(state.identity().unwrap().username, "bob");
        assert!(state.is_authenticated());
    }
}
