//! Line cache module
//!
//! Holds the latest raw line value per sport. Shared between the ingestion
//! pipeline (writer) and subscription tasks (readers).

mod memory;

pub use memory::MemoryCache;

use async_trait::async_trait;
use thiserror::Error;

/// Cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// No value has been stored under the key yet
    #[error("Key not found: {0}")]
    NotFound(String),
    /// Backend is unreachable or refused the operation
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Key/value store for latest line values
///
/// Implementations must be safe for concurrent readers and writers without
/// external locking.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: f64) -> Result<(), CacheError>;
    /// Latest value stored under `key`
    async fn get_last_value(&self, key: &str) -> Result<f64, CacheError>;
    /// Liveness probe
    async fn ping(&self) -> Result<(), CacheError>;
}
