use crate::access_code::AccessCode;
use crate::context::ContextTag;
use crate::error::StorageError;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Identity of a stored record: an access code within a context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub context: ContextTag,
    pub code: AccessCode,
}

impl RecordKey {
    pub fn new(context: ContextTag, code: AccessCode) -> Self {
        Self { context, code }
    }
}

/// A stored access record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRecord {
    /// The link unlocked by the access code, returned unaltered.
    pub link: String,
    /// An encrypted or tokenized variant of the link, if the administrator
    /// stored one.
    #[serde(default)]
    pub encrypted_link: Option<String>,
    /// When the record stops resolving, if ever.
    #[serde(default)]
    pub expire_at: Option<Timestamp>,
}

impl AccessRecord {
    /// Creates a record that never expires and has no encrypted variant.
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            encrypted_link: None,
            expire_at: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expire_at
            .is_some_and(|expire_at| Timestamp::now() >= expire_at)
    }

    /// Returns true if `value` is this record's link or its encrypted variant.
    pub fn carries_link(&self, value: &str) -> bool {
        self.link == value || self.encrypted_link.as_deref() == Some(value)
    }
}

/// A read-only view of a repository.
///
/// The resolver only ever reads; records are managed out-of-band through
/// [`Repository`].
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record stored under `key`.
    /// Returns `None` if the key does not exist.
    async fn get(&self, key: &RecordKey) -> Result<Option<AccessRecord>>;

    /// Checks whether a record is stored under `key`.
    async fn exists(&self, key: &RecordKey) -> Result<bool>;

    /// Checks whether any active record carries `link` as its link or
    /// encrypted link.
    async fn contains_link(&self, link: &str) -> Result<bool>;

    /// Lists the distinct contexts that hold at least one record, sorted.
    async fn contexts(&self) -> Result<Vec<ContextTag>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record. Returns `Err(Conflict)` if the key is already taken.
    async fn insert(&self, key: &RecordKey, record: AccessRecord) -> Result<()>;

    /// Deletes the record stored under `key`.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, key: &RecordKey) -> Result<bool>;
}
