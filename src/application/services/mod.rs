//! Business logic services for the application layer.

pub mod account_service;
pub mod authenticator;
pub mod code_allocator;
pub mod link_service;

pub use account_service::{AccountService, LoginResult, validate_registration};
pub use authenticator::{AuthOutcome, CredentialAuthenticator};
pub use code_allocator::{CodeAllocator, MAX_ALLOCATION_ATTEMPTS, PendingLink};
pub use link_service::{CreatedLink, LinkService};
