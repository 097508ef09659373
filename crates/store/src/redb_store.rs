//! redb-backed store.
//!
//! Every value is stored as an 8-byte big-endian expiry (milliseconds since
//! the Unix epoch) followed by the payload. Reads compare the expiry against
//! the wall clock, so entries stay expired across restarts.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use tracing::debug;

use crate::{KeyValueStore, StoreError};

const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("faq_cache");
const EXPIRY_LEN: usize = 8;

/// Persistent store in a single redb file.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(StoreError::backend)?;

        let write_txn = db.begin_write().map_err(StoreError::backend)?;
        {
            // Opening the table inside a write transaction creates it.
            let _table = write_txn.open_table(ENTRIES).map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;

        Ok(Self { db: Arc::new(db) })
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

fn encode(value: &[u8], expires_at: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(EXPIRY_LEN + value.len());
    buf.extend_from_slice(&expires_at.to_be_bytes());
    buf.extend_from_slice(value);
    buf
}

fn decode<'a>(key: &str, raw: &'a [u8]) -> Result<(u64, &'a [u8]), StoreError> {
    if raw.len() < EXPIRY_LEN {
        return Err(StoreError::Corrupt(key.to_string()));
    }
    let (head, payload) = raw.split_at(EXPIRY_LEN);
    let mut expiry = [0u8; EXPIRY_LEN];
    expiry.copy_from_slice(head);
    Ok((u64::from_be_bytes(expiry), payload))
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self.db.begin_read().map_err(StoreError::backend)?;
        let table = read_txn.open_table(ENTRIES).map_err(StoreError::backend)?;

        match table.get(key).map_err(StoreError::backend)? {
            Some(guard) => {
                let (expires_at, payload) = decode(key, guard.value())?;
                if expires_at > now_millis() {
                    Ok(Some(payload.to_vec()))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let ttl_millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let expires_at = now_millis().saturating_add(ttl_millis);
        let encoded = encode(value, expires_at);

        let write_txn = self.db.begin_write().map_err(StoreError::backend)?;
        {
            let mut table = write_txn.open_table(ENTRIES).map_err(StoreError::backend)?;
            table
                .insert(key, encoded.as_slice())
                .map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;
        Ok(())
    }

    fn purge_expired(&self) -> Result<usize, StoreError> {
        let now = now_millis();
        let write_txn = self.db.begin_write().map_err(StoreError::backend)?;
        let removed = {
            let mut table = write_txn.open_table(ENTRIES).map_err(StoreError::backend)?;

            let mut expired = Vec::new();
            for entry in table.iter().map_err(StoreError::backend)? {
                let (key, value) = entry.map_err(StoreError::backend)?;
                let key = key.value();
                // Undecodable entries are dropped along with expired ones.
                let stale = decode(key, value.value())
                    .map(|(expires_at, _)| expires_at <= now)
                    .unwrap_or(true);
                if stale {
                    expired.push(key.to_string());
                }
            }

            for key in &expired {
                table.remove(key.as_str()).map_err(StoreError::backend)?;
            }
            expired.len()
        };
        write_txn.commit().map_err(StoreError::backend)?;

        debug!(removed, "redb_expired_purged");
        Ok(removed)
    }
}
