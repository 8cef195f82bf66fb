use crate::error::{ResolveError, Result};
use async_trait::async_trait;
use keyhole_core::{AccessCode, AccessRecord, ContextTag, RecordKey};

#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Resolves a key to its stored record.
    /// Returns `None` if the key does not exist or the record has expired.
    async fn resolve(&self, key: &RecordKey) -> Result<Option<AccessRecord>>;

    /// Returns true if some active record carries `link`.
    async fn verify_link(&self, link: &str) -> Result<bool>;

    /// Lists the contexts that currently hold records.
    async fn contexts(&self) -> Result<Vec<ContextTag>>;

    /// Validates raw request input and resolves it.
    ///
    /// Invalid input is rejected with `BadRequest` before any lookup; an
    /// unknown code is `NotFound`.
    async fn unlock(&self, password: &str, context: Option<&str>) -> Result<AccessRecord> {
        let code = AccessCode::new(password)?;
        let context = ContextTag::from_request(context)?;
        let key = RecordKey::new(context, code);

        self.resolve(&key).await?.ok_or(ResolveError::NotFound)
    }
}
