use std::sync::Arc;
use std::time::Duration;

use store::{InMemoryStore, KeyValueStore, StoreError};
use thiserror::Error;

use crate::types::AnswerResult;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("cache store failed: {0}")]
    Store(#[from] StoreError),
}

/// Result lists keyed by the verbatim query string, stored as JSON.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<AnswerResult>>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str, results: &[AnswerResult], ttl: Duration) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(results)?;
        self.store.set_with_expiry(key, &bytes, ttl)?;
        Ok(())
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }
}
