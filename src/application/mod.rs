//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation, and credential handling,
//! and expose a small API to HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, redirection, and listing
//! - [`services::code_allocator::CodeAllocator`] - Unique short code allocation
//! - [`services::account_service::AccountService`] - Registration and login
//! - [`services::authenticator::CredentialAuthenticator`] - Bearer credential classification

pub mod services;
