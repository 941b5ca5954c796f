//! Storage abstraction for persistence.

mod autosave;
mod file;
mod memory;

pub use autosave::AutoSaver;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable key-value text store.
///
/// Calls are synchronous: the editor mutates state inside a single event
/// handler and persists before returning.
pub trait Storage: Send + Sync {
    /// Write `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Read the value under `key`.
    fn read(&self, key: &str) -> StorageResult<String>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if `key` holds a value.
    fn exists(&self, key: &str) -> StorageResult<bool>;

    /// List every stored key.
    fn keys(&self) -> StorageResult<Vec<String>>;
}
