use async_trait::async_trait;
use keyhole_core::repository::Result;
use keyhole_core::{
    AccessCache, AccessRecord, CacheError, ContextTag, ReadRepository, RecordKey, StorageError,
};
use tracing::trace;

/// A read-only repository decorator that adds caching.
///
/// Composes any [`ReadRepository`] with any [`AccessCache`]. Key lookups go
/// through the cache; link checks and context listings always reach the inner
/// repository.
#[derive(Debug, Clone)]
pub struct CachedRepository<R, C> {
    inner: R,
    cache: C,
}

impl<R: ReadRepository, C: AccessCache> CachedRepository<R, C> {
    pub fn new(inner: R, cache: C) -> Self {
        Self { inner, cache }
    }

    /// Returns a reference to the inner repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Drops the cached lookup result for `key`.
    pub async fn invalidate(&self, key: &RecordKey) -> Result<()> {
        trace!(context = %key.context, "invalidating cache entry");
        Ok(self.cache.del(key).await?)
    }
}

#[async_trait]
impl<R: ReadRepository, C: AccessCache> ReadRepository for CachedRepository<R, C> {
    async fn get(&self, key: &RecordKey) -> Result<Option<AccessRecord>> {
        self.cache
            .get_or_compute(key, move |k| {
                let k = k.clone();
                async move {
                    trace!(context = %k.context, "fetching from inner repository");
                    self.inner
                        .get(&k)
                        .await
                        .map_err(|e| CacheError::Fill(e.to_string()))
                }
            })
            .await
            .map_err(StorageError::from)
    }

    async fn exists(&self, key: &RecordKey) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn contains_link(&self, link: &str) -> Result<bool> {
        self.inner.contains_link(link).await
    }

    async fn contexts(&self) -> Result<Vec<ContextTag>> {
        self.inner.contexts().await
    }
}
