//! # Storage Port
//!
//! The engine's view of its durable key-value collaborator. Exactly three
//! calls are consumed: point get, prefix range-scan, and atomic batch
//! commit (a point put is a one-entry batch).
//!
//! The engine assumes snapshot-consistent reads within one operation and
//! all-or-nothing application of a committed batch. Serializing concurrent
//! operations that touch the same keys is the store's responsibility; the
//! engine itself never locks, retries, or runs background work.

use crate::domain::LedgerError;

/// Ordered buffer of writes applied atomically by [`StateStore::commit`].
///
/// Operations buffer every mutation here and commit once, so a failure
/// anywhere before the commit leaves the store untouched.
#[derive(Debug, Default)]
pub struct WriteBatch {
    puts: Vec<(Vec<u8>, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer one put. Later puts to the same key win.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.puts.push((key, value));
    }

    pub fn len(&self) -> usize {
        self.puts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puts.is_empty()
    }

    /// Consume the batch in buffered order.
    pub fn into_puts(self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.puts
    }
}

/// Transactional key-value storage used by the ledger.
pub trait StateStore: Send + Sync {
    /// Point read of one key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Open a cursor over every entry whose key starts with `prefix`,
    /// in ascending lexicographic byte order. The caller must
    /// [`StateScan::close`] the cursor on every exit path.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Box<dyn StateScan + '_>, LedgerError>;

    /// Apply the whole batch, or none of it.
    fn commit(&self, batch: WriteBatch) -> Result<(), LedgerError>;
}

/// Cursor over a prefix range.
pub trait StateScan {
    /// Next key/value pair, or `None` when the range is exhausted
    /// or the cursor was closed.
    fn next_entry(&mut self) -> Result<Option<(Vec<u8>, Vec<u8>)>, LedgerError>;

    /// Release cursor resources. Idempotent.
    fn close(&mut self) -> Result<(), LedgerError>;
}
