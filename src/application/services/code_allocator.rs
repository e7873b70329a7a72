//! Unique short code allocation with bounded collision retry.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, StoreError};
use crate::utils::code_generator::{CodeGenerator, is_reserved_code};

/// Maximum number of candidate codes tried for one link.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 5;

/// Link fields known before a short code is assigned.
#[derive(Debug, Clone)]
pub struct PendingLink {
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub source_ip: String,
}

impl PendingLink {
    fn with_code(&self, short_code: String) -> NewLink {
        NewLink {
            original_url: self.original_url.clone(),
            short_code,
            owner_id: self.owner_id,
            source_ip: self.source_ip.clone(),
        }
    }
}

/// Allocates a short code and inserts the link in one bounded loop.
///
/// Each attempt generates a candidate, skips it if it names a fixed route or
/// the store already has it, and otherwise inserts. The existence check alone cannot prevent two
/// concurrent requests from picking the same free candidate, so an insert
/// rejected with [`StoreError::DuplicateCode`] counts as a collision and the
/// loop moves on to a fresh candidate. Both kinds of collision consume the
/// same attempt budget.
pub struct CodeAllocator {
    link_repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
}

impl CodeAllocator {
    pub fn new(link_repository: Arc<dyn LinkRepository>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            link_repository,
            generator,
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
        }
    }

    /// Inserts `pending` under a freshly allocated unique short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllocationExhausted`] if every attempt collided.
    /// Returns [`AppError::StoreUnavailable`] on any other store failure;
    /// those are not retried.
    pub async fn allocate(&self, pending: &PendingLink) -> Result<Link, AppError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            if is_reserved_code(&candidate) {
                tracing::debug!(attempt, code = %candidate, "Short code reserved, retrying");
                continue;
            }

            if self.link_repository.exists_by_code(&candidate).await? {
                tracing::debug!(attempt, code = %candidate, "Short code taken, retrying");
                continue;
            }

            match self.link_repository.insert(pending.with_code(candidate)).await {
                Ok(link) => return Ok(link),
                Err(StoreError::DuplicateCode(code)) => {
                    tracing::warn!(attempt, code = %code, "Short code claimed concurrently, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::error!(attempts = self.max_attempts, "Short code allocation exhausted");

        Err(AppError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::MockCodeGenerator;
    use chrono::Utc;
    use mockall::Sequence;

    fn pending() -> PendingLink {
        PendingLink {
            original_url: "https://example.com".to_string(),
            owner_id: Some(1),
            source_ip: "127.0.0.1".to_string(),
        }
    }

    fn stored(new_link: &NewLink) -> Link {
        Link::new(
            10,
            new_link.original_url.clone(),
            new_link.short_code.clone(),
            new_link.owner_id,
            new_link.source_ip.clone(),
            0,
            Utc::now(),
        )
    }

    fn generator_yielding(codes: &[&'static str]) -> MockCodeGenerator {
        let mut generator = MockCodeGenerator::new();
        let mut seq = Sequence::new();
        for &code in codes {
            generator
                .expect_generate()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move || code.to_string());
        }
        generator
    }

    #[tokio::test]
    async fn test_allocate_first_candidate_free() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .withf(|code| code == "AAAAAA")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|l| l.short_code == "AAAAAA" && l.owner_id == Some(1))
            .times(1)
            .returning(|l| Ok(stored(&l)));

        let allocator = CodeAllocator::new(
            Arc::new(repo),
            Arc::new(generator_yielding(&["AAAAAA"])),
        );

        let link = allocator.allocate(&pending()).await.unwrap();
        assert_eq!(link.short_code, "AAAAAA");
    }

    #[tokio::test]
    async fn test_allocate_skips_existing_codes() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .returning(|code| Ok(code != "CCCCCC"));
        repo.expect_insert()
            .withf(|l| l.short_code == "CCCCCC")
            .times(1)
            .returning(|l| Ok(stored(&l)));

        let allocator = CodeAllocator::new(
            Arc::new(repo),
            Arc::new(generator_yielding(&["AAAAAA", "BBBBBB", "CCCCCC"])),
        );

        let link = allocator.allocate(&pending()).await.unwrap();
        assert_eq!(link.short_code, "CCCCCC");
    }

    #[tokio::test]
    async fn test_allocate_retries_on_insert_conflict() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code().times(2).returning(|_| Ok(false));
        repo.expect_insert().times(2).returning(|l| {
            if l.short_code == "RACE01" {
                Err(StoreError::DuplicateCode(l.short_code))
            } else {
                Ok(stored(&l))
            }
        });

        let allocator = CodeAllocator::new(
            Arc::new(repo),
            Arc::new(generator_yielding(&["RACE01", "FREE02"])),
        );

        let link = allocator.allocate(&pending()).await.unwrap();
        assert_eq!(link.short_code, "FREE02");
    }

    #[tokio::test]
    async fn test_allocate_exhausted_after_five_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .times(MAX_ALLOCATION_ATTEMPTS)
            .returning(|_| Ok(true));
        repo.expect_insert().times(0);

        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .times(MAX_ALLOCATION_ATTEMPTS)
            .returning(|| "TAKEN1".to_string());

        let allocator = CodeAllocator::new(Arc::new(repo), Arc::new(generator));

        let err = allocator.allocate(&pending()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::AllocationExhausted {
                attempts: MAX_ALLOCATION_ATTEMPTS
            }
        ));
    }

    #[tokio::test]
    async fn test_mixed_collisions_share_attempt_budget() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .times(MAX_ALLOCATION_ATTEMPTS)
            .returning(|code| Ok(code.starts_with('X')));
        repo.expect_insert()
            .returning(|l| Err(StoreError::DuplicateCode(l.short_code)));

        let allocator = CodeAllocator::new(
            Arc::new(repo),
            Arc::new(generator_yielding(&[
                "XAAAAA", "YAAAAA", "XBBBBB", "YBBBBB", "YCCCCC",
            ])),
        );

        let err = allocator.allocate(&pending()).await.unwrap_err();
        assert!(matches!(err, AppError::AllocationExhausted { .. }));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code().times(1).returning(|_| Ok(false));
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut)));

        let allocator = CodeAllocator::new(
            Arc::new(repo),
            Arc::new(generator_yielding(&["AAAAAA"])),
        );

        let err = allocator.allocate(&pending()).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_existence_check_failure_propagates() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable(sqlx::Error::PoolClosed)));
        repo.expect_insert().times(0);

        let allocator = CodeAllocator::new(
            Arc::new(repo),
            Arc::new(generator_yielding(&["AAAAAA"])),
        );

        let err = allocator.allocate(&pending()).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_reserved_code_is_skipped() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .withf(|code| code == "AbC123")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|l| l.short_code == "AbC123")
            .times(1)
            .returning(|l| Ok(stored(&l)));

        let allocator = CodeAllocator::new(
            Arc::new(repo),
            Arc::new(generator_yielding(&["health", "AbC123"])),
        );

        let link = allocator.allocate(&pending()).await.unwrap();
        assert_eq!(link.short_code, "AbC123");
    }
}
