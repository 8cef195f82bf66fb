use std::sync::Arc;

use crate::error::Result;
use crate::resolver::Resolver;
use async_trait::async_trait;
use keyhole_core::{AccessRecord, ContextTag, ReadRepository, RecordKey};
use tracing::{debug, trace};

/// Service for resolving access codes.
///
/// Uses a read-only repository to fetch records and handles expiration checks.
/// The access code itself is never logged.
#[derive(Debug)]
pub struct ResolverService<R> {
    repository: Arc<R>,
}

impl<R> Clone for ResolverService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ReadRepository> ResolverService<R> {
    /// Creates a new ResolverService with the given repository.
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

#[async_trait]
impl<R: ReadRepository> Resolver for ResolverService<R> {
    async fn resolve(&self, key: &RecordKey) -> Result<Option<AccessRecord>> {
        trace!(context = %key.context, "resolving access code");

        match self.repository.get(key).await? {
            Some(record) if record.is_expired() => {
                debug!(context = %key.context, "access record has expired");
                Ok(None)
            }
            Some(record) => {
                debug!(context = %key.context, "access code resolved");
                Ok(Some(record))
            }
            None => {
                debug!(context = %key.context, "access code not found");
                Ok(None)
            }
        }
    }

    async fn verify_link(&self, link: &str) -> Result<bool> {
        let valid = self.repository.contains_link(link).await?;
        debug!(valid, "verified link");
        Ok(valid)
    }

    async fn contexts(&self) -> Result<Vec<ContextTag>> {
        Ok(self.repository.contexts().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MokaAccessCache;
    use crate::error::ResolveError;
    use crate::repository::CachedRepository;
    use std::time::Duration;
    use async_trait::async_trait;
    use jiff::{SignedDuration, Timestamp};
    use keyhole_core::{AccessCode, Repository, StorageError};
    use keyhole_storage::InMemoryRepository;

    fn key(context: &str, code: &str) -> RecordKey {
        RecordKey::new(
            ContextTag::new_unchecked(context),
            AccessCode::new_unchecked(code),
        )
    }

    async fn setup(records: &[(&str, &str, &str)]) -> ResolverService<InMemoryRepository> {
        let repo = InMemoryRepository::new();
        for (context, code, link) in records {
            repo.insert(&key(context, code), AccessRecord::new(*link))
                .await
                .unwrap();
        }
        ResolverService::new(repo)
    }

    /// A repository whose every call fails, standing in for a broken backend.
    struct FailingRepository;

    #[async_trait]
    impl ReadRepository for FailingRepository {
        async fn get(&self, _key: &RecordKey) -> keyhole_core::repository::Result<Option<AccessRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn exists(&self, _key: &RecordKey) -> keyhole_core::repository::Result<bool> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn contains_link(&self, _link: &str) -> keyhole_core::repository::Result<bool> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn contexts(&self) -> keyhole_core::repository::Result<Vec<ContextTag>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn unlock_registered_code_returns_exact_link() {
        let service = setup(&[("default", "abc123", "https://example.com/x")]).await;

        let record = service.unlock("abc123", None).await.unwrap();
        assert_eq!(record.link, "https://example.com/x");
    }

    #[tokio::test]
    async fn unlock_unregistered_code_is_not_found() {
        let service = setup(&[("default", "abc123", "https://example.com/x")]).await;

        for wrong in ["wrong", "abc1234", "ABC123", "abc123 "] {
            let err = service.unlock(wrong, None).await.unwrap_err();
            assert!(matches!(err, ResolveError::NotFound), "{wrong:?} resolved");
        }
    }

    #[tokio::test]
    async fn unlock_blank_input_is_bad_request() {
        let service = setup(&[]).await;

        for blank in ["", " ", "\t\n  "] {
            let err = service.unlock(blank, None).await.unwrap_err();
            assert!(matches!(err, ResolveError::BadRequest(_)));
        }
    }

    #[tokio::test]
    async fn blank_input_is_rejected_before_lookup() {
        let service = ResolverService::new(FailingRepository);

        let err = service.unlock("   ", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unlock_invalid_context_is_bad_request() {
        let service = setup(&[]).await;

        let err = service.unlock("abc123", Some("not valid")).await.unwrap_err();
        assert!(matches!(err, ResolveError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unlock_uses_context_as_second_dimension() {
        let service = setup(&[
            ("main", "abc123", "https://main.example"),
            ("default", "abc123", "https://default.example"),
        ])
        .await;

        let main = service.unlock("abc123", Some("main")).await.unwrap();
        let default = service.unlock("abc123", None).await.unwrap();
        assert_eq!(main.link, "https://main.example");
        assert_eq!(default.link, "https://default.example");

        let err = service.unlock("abc123", Some("beta")).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound));
    }

    #[tokio::test]
    async fn unlock_is_idempotent() {
        let service = setup(&[("default", "abc123", "https://example.com/x")]).await;

        let first = service.unlock("abc123", None).await.unwrap();
        let second = service.unlock("abc123", None).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn storage_failure_is_surfaced_as_storage_error() {
        let service = ResolverService::new(FailingRepository);

        let err = service.unlock("abc123", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::Storage(_)));
    }

    #[tokio::test]
    async fn resolve_expired_record() {
        let repo = InMemoryRepository::new();
        let k = key("default", "expired");
        let mut record = AccessRecord::new("https://example.com");
        record.expire_at = Some(Timestamp::now() - SignedDuration::from_secs(1));
        repo.insert(&k, record).await.unwrap();
        let service = ResolverService::new(repo);

        assert!(service.resolve(&k).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn verify_link_and_contexts() {
        let service = setup(&[
            ("main", "a", "https://main.example"),
            ("beta", "b", "https://beta.example"),
        ])
        .await;

        assert!(service.verify_link("https://main.example").await.unwrap());
        assert!(!service.verify_link("https://other.example").await.unwrap());

        let contexts = service.contexts().await.unwrap();
        let names: Vec<&str> = contexts.iter().map(ContextTag::as_str).collect();
        assert_eq!(names, vec!["beta", "main"]);
    }

    async fn cached_setup(
        records: &[(&str, &str, AccessRecord)],
    ) -> ResolverService<CachedRepository<InMemoryRepository, MokaAccessCache>> {
        let repo = InMemoryRepository::new();
        for (context, code, record) in records {
            repo.insert(&key(context, code), record.clone()).await.unwrap();
        }
        let cache = MokaAccessCache::with_ttl(100, Duration::from_secs(60));
        ResolverService::new(CachedRepository::new(repo, cache))
    }

    #[tokio::test]
    async fn cached_unlock_returns_exact_link() {
        let service =
            cached_setup(&[("default", "abc123", AccessRecord::new("https://example.com/x"))])
                .await;

        for _ in 0..2 {
            let record = service.unlock("abc123", None).await.unwrap();
            assert_eq!(record.link, "https://example.com/x");
        }
    }

    #[tokio::test]
    async fn cached_unlock_unregistered_code_is_not_found() {
        let service =
            cached_setup(&[("default", "abc123", AccessRecord::new("https://example.com/x"))])
                .await;

        for _ in 0..2 {
            let err = service.unlock("wrong", None).await.unwrap_err();
            assert!(matches!(err, ResolveError::NotFound));
        }
    }

    #[tokio::test]
    async fn cached_record_past_expiry_is_not_found() {
        let mut record = AccessRecord::new("https://example.com/x");
        record.expire_at = Some(Timestamp::now() + SignedDuration::from_millis(200));
        let service = cached_setup(&[("default", "abc123", record)]).await;

        // populates the cache with the still-active record
        assert!(service.unlock("abc123", None).await.is_ok());

        tokio::time::sleep(Duration::from_millis(300)).await;

        let err = service.unlock("abc123", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound));
    }
}
