use async_trait::async_trait;
use keyhole_core::{AccessCache, AccessRecord, CacheError, RecordKey};
use moka::future::Cache;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Type alias for cache results.
pub type Result<T> = std::result::Result<T, CacheError>;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-memory cache of lookup results using Moka.
///
/// Both hits and misses are cached so repeated wrong guesses do not reach the
/// backing store. Pair it with a TTL so administratively added records become
/// visible.
#[derive(Debug, Clone)]
pub struct MokaAccessCache {
    cache: Cache<RecordKey, Option<AccessRecord>>,
}

impl MokaAccessCache {
    /// Creates a cache holding at most 10,000 entries and no TTL.
    pub fn new() -> Self {
        CacheConfig::builder().build().into()
    }

    /// Creates a cache whose entries expire `ttl` after insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        CacheConfig::builder()
            .max_capacity(max_capacity)
            .ttl(ttl)
            .build()
            .into()
    }
}

impl Default for MokaAccessCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccessCache for MokaAccessCache {
    async fn get_record(&self, key: &RecordKey) -> Result<Option<Option<AccessRecord>>> {
        let cached = self.cache.get(key).await;
        trace!(context = %key.context, hit = cached.is_some(), "moka lookup");
        Ok(cached)
    }

    async fn set_record(&self, key: &RecordKey, record: Option<AccessRecord>) -> Result<()> {
        self.cache.insert(key.clone(), record).await;
        Ok(())
    }

    async fn del(&self, key: &RecordKey) -> Result<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn get_or_compute<F, Fut>(&self, key: &RecordKey, fetch: F) -> Result<Option<AccessRecord>>
    where
        F: FnOnce(&RecordKey) -> Fut + Send,
        Fut: Future<Output = Result<Option<AccessRecord>>> + Send,
    {
        // try_get_with coalesces concurrent misses for the same key into one fetch.
        let record = self
            .cache
            .try_get_with(key.clone(), async {
                trace!(context = %key.context, "cache miss, fetching");
                fetch(key).await
            })
            .await
            .map_err(|e| e.as_ref().clone())?;

        debug!(context = %key.context, found = record.is_some(), "cache lookup completed");
        Ok(record)
    }
}

/// Configuration for creating a MokaAccessCache with custom settings.
#[derive(Debug, TypedBuilder)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = DEFAULT_MAX_CAPACITY)]
    max_capacity: u64,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
}

impl From<CacheConfig> for MokaAccessCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        MokaAccessCache {
            cache: builder.build(),
        }
    }
}
