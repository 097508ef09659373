use std::sync::{Mutex, MutexGuard};

use fxhash::FxHashMap;

/// Compact identifier for one distinct token.
pub type TokenId = u32;

/// Append-only registry assigning a [`TokenId`] to every distinct token.
///
/// IDs are handed out from a counter starting at 0 and are never reclaimed,
/// so an ID stays bound to its token for the lifetime of the catalog. Every
/// lookup takes the same lock.
#[derive(Debug, Default)]
pub struct TokenCatalog {
    state: Mutex<CatalogState>,
}

#[derive(Debug, Default)]
struct CatalogState {
    ids: FxHashMap<String, TokenId>,
    next: TokenId,
}

impl TokenCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the ID for `token`, assigning the next free one on first sight.
    pub fn id_for(&self, token: &str) -> TokenId {
        let mut state = self.lock();
        if let Some(&id) = state.ids.get(token) {
            return id;
        }
        let id = state.next;
        state.next += 1;
        state.ids.insert(token.to_string(), id);
        id
    }

    /// Look up an ID without assigning one.
    pub fn get(&self, token: &str) -> Option<TokenId> {
        self.lock().ids.get(token).copied()
    }

    /// Number of distinct tokens seen so far.
    pub fn len(&self) -> usize {
        self.lock().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
