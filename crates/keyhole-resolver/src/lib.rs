//! Resolver service mapping access codes to links.
//!
//! [`ResolverService`] reads from any [`ReadRepository`]; wrapping the
//! repository in a [`CachedRepository`] adds a read-through cache without the
//! service noticing.
//!
//! ```rust
//! use keyhole_core::{AccessCode, AccessRecord, ContextTag, RecordKey, Repository};
//! use keyhole_resolver::{CachedRepository, MokaAccessCache, Resolver, ResolverService};
//! use keyhole_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = InMemoryRepository::new();
//! let key = RecordKey::new(ContextTag::default(), AccessCode::new("abc123")?);
//! repo.insert(&key, AccessRecord::new("https://example.com/x")).await?;
//!
//! let service = ResolverService::new(CachedRepository::new(repo, MokaAccessCache::new()));
//! let record = service.unlock("abc123", None).await?;
//! assert_eq!(record.link, "https://example.com/x");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod repository;
pub mod resolver;
pub mod service;

pub use cache::{CacheConfig, MokaAccessCache};
pub use error::{ResolveError, Result};
pub use keyhole_core::ReadRepository;
pub use repository::CachedRepository;
pub use resolver::Resolver;
pub use service::ResolverService;
