//! In-process cache implementation

use super::{Cache, CacheError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory cache, last write wins per key
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    values: Arc<RwLock<HashMap<String, f64>>>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    /// Whether nothing has been stored yet
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn set(&self, key: &str, value: f64) -> Result<(), CacheError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_last_value(&self, key: &str) -> Result<f64, CacheError> {
        let values = self.values.read().await;
        values
            .get(key)
            .copied()
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
