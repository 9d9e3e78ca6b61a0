//! Durable key-value storage backing the client session.
//!
//! The store outlives a single process the way browser storage outlives a
//! page: every start reads the session back from it.

pub mod error;
pub mod file;
pub mod keys;
pub mod memory;

use async_trait::async_trait;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
