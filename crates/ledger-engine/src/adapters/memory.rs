//! In-memory implementation of the storage port, for tests and embedding.
//!
//! A `BTreeMap` over byte keys gives the ascending lexicographic order the
//! scan contract requires. `commit` applies the whole batch under a single
//! write lock, so readers observe either none or all of an operation's
//! writes. Scans snapshot the matching range at open time; a scan is
//! unaffected by commits that land while it is being drained.

use crate::domain::LedgerError;
use crate::ports::{StateScan, StateStore, WriteBatch};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory [`StateStore`] backed by an ordered map.
pub struct InMemoryStateStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored entries. Test hook.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LedgerError> {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Box<dyn StateScan + '_>, LedgerError> {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        let matches: Vec<(Vec<u8>, Vec<u8>)> = entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Box::new(MemoryScan {
            entries: matches.into_iter(),
        }))
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), LedgerError> {
        let mut entries = self.entries.write().map_err(|_| LedgerError::LockPoisoned)?;
        for (key, value) in batch.into_puts() {
            entries.insert(key, value);
        }
        Ok(())
    }
}

struct MemoryScan {
    entries: std::vec::IntoIter<(Vec<u8>, Vec<u8>)>,
}

impl StateScan for MemoryScan {
    fn next_entry(&mut self) -> Result<Option<(Vec<u8>, Vec<u8>)>, LedgerError> {
        Ok(self.entries.next())
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        // Drops the snapshot; closing twice is a no-op.
        self.entries = Vec::new().into_iter();
        Ok(())
    }
}
