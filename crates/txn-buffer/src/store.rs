//! Committed data and the transactions that stage writes against it.

use crate::error::StorageError;
use crate::membuf::{MemBuffer, DEFAULT_ENTRY_SIZE_LIMIT, DEFAULT_TXN_SIZE_LIMIT};
use std::collections::BTreeMap;
use tracing::debug;

/// In-memory key/value store.
///
/// Only one transaction can be open at a time: [`MemStore::begin`] borrows
/// the store mutably until the transaction is committed or dropped.
#[derive(Debug)]
pub struct MemStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    txn_size_limit: u64,
    entry_size_limit: u64,
    next_ts: u64,
}

impl Default for MemStore {
    fn default() -> Self {
        Self {
            data: BTreeMap::new(),
            txn_size_limit: DEFAULT_TXN_SIZE_LIMIT,
            entry_size_limit: DEFAULT_ENTRY_SIZE_LIMIT,
            next_ts: 1,
        }
    }
}

impl MemStore {
    /// Create an empty store with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cap on staged bytes per transaction.
    pub fn with_txn_size_limit(mut self, limit: u64) -> Self {
        self.txn_size_limit = limit;
        self
    }

    /// Set the cap on a single key/value pair.
    pub fn with_entry_size_limit(mut self, limit: u64) -> Self {
        self.entry_size_limit = limit;
        self
    }

    /// Open a transaction.
    pub fn begin(&mut self) -> Transaction<'_> {
        let start_ts = self.next_ts;
        self.next_ts += 1;
        debug!("Begin transaction start_ts={}", start_ts);

        let buffer = MemBuffer::with_limits(self.txn_size_limit, self.entry_size_limit);
        Transaction {
            store: self,
            buffer,
            start_ts,
        }
    }

    /// Get a committed value.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.data.get(key).map(Vec::as_slice)
    }

    /// Number of committed entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An open transaction. Dropping it without [`commit`](Self::commit)
/// abandons every staged write.
pub struct Transaction<'a> {
    store: &'a mut MemStore,
    buffer: MemBuffer,
    start_ts: u64,
}

impl Transaction<'_> {
    /// Stage `value` under `key`.
    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StorageError> {
        self.buffer.set(key, value)
    }

    /// Stage a delete of `key`.
    pub fn delete(&mut self, key: Vec<u8>) -> Result<(), StorageError> {
        self.buffer.delete(key)
    }

    /// Read `key` as this transaction sees it: staged writes first, then
    /// committed data. Staged deletes read as absent.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        match self.buffer.get(key) {
            Some(value) if value.is_empty() => None,
            Some(value) => Some(value),
            None => self.store.get(key),
        }
    }

    /// Staged writes.
    pub fn buffer(&self) -> &MemBuffer {
        &self.buffer
    }

    /// Staged writes, for in-place manipulation.
    pub fn buffer_mut(&mut self) -> &mut MemBuffer {
        &mut self.buffer
    }

    pub fn start_ts(&self) -> u64 {
        self.start_ts
    }

    /// Apply every staged write to the store. Returns the number of entries
    /// applied.
    pub fn commit(self) -> usize {
        let Transaction {
            store,
            buffer,
            start_ts,
        } = self;

        let staged = buffer.size();
        let entries = buffer.into_entries();
        let applied = entries.len();
        for (key, value) in entries {
            if value.is_empty() {
                store.data.remove(&key);
            } else {
                store.data.insert(key, value);
            }
        }

        debug!(
            "Committed transaction start_ts={}: {} entries, {} bytes",
            start_ts, applied, staged
        );
        applied
    }
}
