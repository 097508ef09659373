//! Key-value storage with per-entry expiry.
//!
//! [`KeyValueStore`] is the seam the result cache writes through. Two
//! backends ship with the crate:
//!
//! - [`InMemoryStore`]: a `RwLock<HashMap>` for tests and single-run processes.
//! - [`RedbStore`]: a redb file so cached results survive restarts.
//!
//! Expired entries read as a miss. They are physically removed only by
//! [`KeyValueStore::purge_expired`].
//!
//! ```
//! use std::time::Duration;
//! use store::{KeyValueStore, StoreConfig};
//!
//! let store = StoreConfig::in_memory().build().unwrap();
//! store.set_with_expiry("greeting", b"hello", Duration::from_secs(60)).unwrap();
//! assert_eq!(store.get("greeting").unwrap().as_deref(), Some(&b"hello"[..]));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use thiserror::Error;

#[cfg(feature = "backend-redb")]
mod redb_store;

#[cfg(feature = "backend-redb")]
pub use redb_store::RedbStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("corrupt entry for key `{0}`")]
    Corrupt(String),
}

impl StoreError {
    pub fn backend<E: fmt::Display>(err: E) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Byte store with a time-to-live on every entry.
pub trait KeyValueStore: Send + Sync {
    /// Fetch a live entry. Missing and expired keys both return `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or overwrite `key`, expiring `ttl` from now.
    fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError>;

    /// Drop expired entries and return how many were removed.
    fn purge_expired(&self) -> Result<usize, StoreError> {
        Ok(0)
    }
}

/// Selects and builds a backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StoreConfig {
    #[default]
    InMemory,
    /// redb database file at `path`, created when missing.
    Redb { path: String },
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        StoreConfig::InMemory
    }

    pub fn redb<P: Into<String>>(path: P) -> Self {
        StoreConfig::Redb { path: path.into() }
    }

    pub fn build(&self) -> Result<Box<dyn KeyValueStore>, StoreError> {
        match self {
            StoreConfig::InMemory => Ok(Box::new(InMemoryStore::new())),
            StoreConfig::Redb { path } => {
                #[cfg(feature = "backend-redb")]
                {
                    Ok(Box::new(RedbStore::open(path)?))
                }
                #[cfg(not(feature = "backend-redb"))]
                {
                    let _ = path;
                    Err(StoreError::backend("redb backend disabled at compile time"))
                }
            }
        }
    }
}

/// Expiry instant, or `None` when the TTL reaches past what `Instant` can hold.
type Expiry = Option<Instant>;

fn is_live(expires_at: &Expiry, now: Instant) -> bool {
    expires_at.is_none_or(|at| at > now)
}

/// In-process store backed by a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, (Vec<u8>, Expiry)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let now = Instant::now();
        Ok(guard
            .get(key)
            .filter(|(_, expires_at)| is_live(expires_at, now))
            .map(|(value, _)| value.clone()))
    }

    fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let expires_at = Instant::now().checked_add(ttl);
        self.entries
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .insert(key.to_string(), (value.to_vec(), expires_at));
        Ok(())
    }

    fn purge_expired(&self) -> Result<usize, StoreError> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let before = guard.len();
        let now = Instant::now();
        guard.retain(|_, (_, expires_at)| is_live(expires_at, now));
        Ok(before - guard.len())
    }
}
