//! Per-line token cache
//!
//! Entries are keyed by [`LineId`] and stamped with the query generation they
//! were computed under. An entry from another generation reads as absent.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::highlights::{HighlightToken, LineId, QueryGeneration};

#[derive(Debug, Clone)]
struct CacheEntry {
    generation: QueryGeneration,
    tokens: Vec<HighlightToken>,
}

#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    entries: HashMap<LineId, CacheEntry>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole entry for `line`
    pub fn store(&mut self, line: LineId, tokens: Vec<HighlightToken>, generation: QueryGeneration) {
        self.entries.insert(line, CacheEntry { generation, tokens });
    }

    /// Tokens for `line` if they were computed under `current`.
    ///
    /// `Some(&[])` means "computed, nothing to highlight"; `None` means the
    /// line was never computed or the entry is stale.
    pub fn fetch(&self, line: LineId, current: QueryGeneration) -> Option<&[HighlightToken]> {
        self.entries
            .get(&line)
            .filter(|entry| entry.generation == current)
            .map(|entry| entry.tokens.as_slice())
    }

    /// Current tokens for `line`, computing and storing them with `compute`
    /// when the entry is missing or stale. Nothing is stored on error.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        line: LineId,
        current: QueryGeneration,
        compute: impl FnOnce() -> Result<Vec<HighlightToken>, E>,
    ) -> Result<&[HighlightToken], E> {
        let entry = match self.entries.entry(line) {
            Entry::Occupied(slot) if slot.get().generation == current => slot.into_mut(),
            Entry::Occupied(mut slot) => {
                slot.insert(CacheEntry {
                    generation: current,
                    tokens: compute()?,
                });
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(CacheEntry {
                generation: current,
                tokens: compute()?,
            }),
        };
        Ok(&entry.tokens)
    }

    /// Drop the entry for one line (its text changed)
    pub fn invalidate(&mut self, line: LineId) {
        self.entries.remove(&line);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every entry not stamped with `current`
    pub fn retain_generation(&mut self, current: QueryGeneration) {
        self.entries.retain(|_, entry| entry.generation == current);
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
