//! Cache implementations for the resolver service.

pub mod moka;

pub use self::moka::{CacheConfig, MokaAccessCache};
