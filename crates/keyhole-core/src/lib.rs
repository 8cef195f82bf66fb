//! Core types and traits for the Keyhole link unlock service.
//!
//! This crate provides the shared vocabulary used by the storage backends,
//! the resolver service, the HTTP gateway and the API client.

pub mod access_code;
pub mod cache;
pub mod context;
pub mod error;
pub mod repository;

pub use access_code::AccessCode;
pub use cache::AccessCache;
pub use context::ContextTag;
pub use error::{CacheError, CoreError, StorageError};
pub use repository::{AccessRecord, ReadRepository, RecordKey, Repository};
