use crate::error::CacheError;
use crate::repository::{AccessRecord, RecordKey};
use async_trait::async_trait;
use std::future::Future;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache for access records, keyed by [`RecordKey`].
///
/// Misses are cached too: `get_record` distinguishes "not cached" (`None`)
/// from "cached as missing" (`Some(None)`).
#[async_trait]
pub trait AccessCache: Send + Sync + 'static {
    /// Get the cached lookup result for `key`.
    async fn get_record(&self, key: &RecordKey) -> Result<Option<Option<AccessRecord>>>;

    /// Store a lookup result for `key`.
    async fn set_record(&self, key: &RecordKey, record: Option<AccessRecord>) -> Result<()>;

    /// Remove the cached entry for `key`. Not an error if absent.
    async fn del(&self, key: &RecordKey) -> Result<()>;

    /// Get the cached lookup result for `key`, computing and storing it on a miss.
    async fn get_or_compute<F, Fut>(&self, key: &RecordKey, fetch: F) -> Result<Option<AccessRecord>>
    where
        F: FnOnce(&RecordKey) -> Fut + Send,
        Fut: Future<Output = Result<Option<AccessRecord>>> + Send,
    {
        if let Some(cached) = self.get_record(key).await? {
            return Ok(cached);
        }

        let record = fetch(key).await?;
        self.set_record(key, record.clone()).await?;
        Ok(record)
    }
}
