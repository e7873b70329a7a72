use std::sync::Arc;

use crate::application::services::{AccountService, CredentialAuthenticator, LinkService};

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub account_service: Arc<AccountService>,
    pub authenticator: Arc<CredentialAuthenticator>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client address.
    pub behind_proxy: bool,
}
