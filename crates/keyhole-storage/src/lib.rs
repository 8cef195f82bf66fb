//! Storage backends for access records.

pub mod memory;
pub mod mysql;

pub use keyhole_core::repository::{ReadRepository, Repository, Result};
pub use keyhole_core::StorageError;
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
