//! Link creation, redirection, and listing service.

use std::sync::Arc;

use crate::application::services::code_allocator::{CodeAllocator, PendingLink};
use crate::domain::AuthState;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_valid_code};
use crate::utils::url_validator::validate_long_url;
use serde_json::json;

/// A newly created link together with its fully qualified short URL.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: Link,
    pub short_url: String,
}

/// Service for creating, resolving, and listing shortened links.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    allocator: CodeAllocator,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public address short codes are appended to,
    /// e.g. `http://localhost:3000`.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        generator: Arc<dyn CodeGenerator>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            allocator: CodeAllocator::new(link_repository.clone(), generator),
            link_repository,
            base_url,
        }
    }

    /// Shortens `original_url` on behalf of the caller described by `auth`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty or not absolute;
    /// nothing is stored in that case.
    /// Returns [`AppError::AllocationExhausted`] if no unique code was found.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn create(
        &self,
        original_url: &str,
        auth: &AuthState,
        source_ip: &str,
    ) -> Result<CreatedLink, AppError> {
        validate_long_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let pending = PendingLink {
            original_url: original_url.to_string(),
            owner_id: auth.owner_id(),
            source_ip: source_ip.to_string(),
        };

        let link = self.allocator.allocate(&pending).await?;

        tracing::info!(
            code = %link.short_code,
            owner_id = ?link.owner_id,
            "Short link created"
        );

        Ok(CreatedLink {
            short_url: self.short_url(&link.short_code),
            link,
        })
    }

    /// Resolves `short_code` and records one click.
    ///
    /// The click is counted as soon as the lookup succeeds, independent of
    /// whether the client follows the redirect.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has that code.
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        if !is_valid_code(short_code) {
            return Err(not_found(short_code));
        }

        let link = self
            .link_repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| not_found(short_code))?;

        if !self.link_repository.increment_clicks(short_code).await? {
            return Err(not_found(short_code));
        }

        tracing::debug!(code = %short_code, "Click recorded");

        Ok(link.original_url)
    }

    /// Lists links owned by the authenticated caller, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for anonymous callers.
    pub async fn list_owned(&self, auth: &AuthState) -> Result<Vec<Link>, AppError> {
        let identity = auth.identity().ok_or_else(|| {
            AppError::unauthorized(
                "Authentication required",
                json!({ "reason": "A bearer credential is required to list links" }),
            )
        })?;

        Ok(self.link_repository.list_by_owner(identity.id).await?)
    }

    /// Builds the full short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Checks store connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        Ok(self.link_repository.ping().await?)
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}
