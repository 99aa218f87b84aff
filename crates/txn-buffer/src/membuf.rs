//! Staged writes of one transaction.

use crate::error::StorageError;
use std::collections::BTreeMap;

/// Default cap on the staged bytes of one transaction (64 GiB).
pub const DEFAULT_TXN_SIZE_LIMIT: u64 = 64 << 30;

/// Default cap on a single key/value pair (6 MiB).
pub const DEFAULT_ENTRY_SIZE_LIMIT: u64 = 6 << 20;

/// Ordered map of staged `key -> value` writes.
///
/// `size()` is the exact number of key plus value bytes currently staged.
/// An empty value marks a staged delete.
#[derive(Debug, Clone)]
pub struct MemBuffer {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    size: u64,
    size_limit: u64,
    entry_size_limit: u64,
}

impl Default for MemBuffer {
    fn default() -> Self {
        Self::with_limits(DEFAULT_TXN_SIZE_LIMIT, DEFAULT_ENTRY_SIZE_LIMIT)
    }
}

impl MemBuffer {
    /// Create an empty buffer with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with explicit limits.
    pub fn with_limits(size_limit: u64, entry_size_limit: u64) -> Self {
        Self {
            entries: BTreeMap::new(),
            size: 0,
            size_limit,
            entry_size_limit,
        }
    }

    /// Stage `value` under `key`, replacing any earlier staged value.
    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StorageError> {
        let entry_size = (key.len() + value.len()) as u64;
        if entry_size > self.entry_size_limit {
            return Err(StorageError::EntryTooLarge {
                size: entry_size,
                limit: self.entry_size_limit,
            });
        }

        let replaced = self
            .entries
            .get(&key)
            .map_or(0, |old| (key.len() + old.len()) as u64);
        let new_size = self.size - replaced + entry_size;
        if new_size > self.size_limit {
            return Err(StorageError::TxnTooLarge {
                size: new_size,
                limit: self.size_limit,
            });
        }

        self.entries.insert(key, value);
        self.size = new_size;
        Ok(())
    }

    /// Stage a delete of `key`.
    pub fn delete(&mut self, key: Vec<u8>) -> Result<(), StorageError> {
        self.set(key, Vec::new())
    }

    /// Get the staged value for `key`; `Some(&[])` is a staged delete.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Exact staged bytes (keys plus values).
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Staged value bytes only.
    pub fn value_bytes(&self) -> u64 {
        self.entries.values().map(|v| v.len() as u64).sum()
    }

    /// Number of staged entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate staged keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.keys().map(Vec::as_slice)
    }

    /// Iterate staged entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Forget a staged entry entirely. Returns whether it was present.
    pub fn discard(&mut self, key: &[u8]) -> bool {
        match self.entries.remove(key) {
            Some(value) => {
                self.size -= (key.len() + value.len()) as u64;
                true
            }
            None => false,
        }
    }

    /// Drop the value bytes of a staged entry, keeping its key.
    /// Returns whether it was present.
    pub fn truncate_value(&mut self, key: &[u8]) -> bool {
        match self.entries.get_mut(key) {
            Some(value) => {
                self.size -= value.len() as u64;
                *value = Vec::new();
                true
            }
            None => false,
        }
    }

    pub(crate) fn into_entries(self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.entries
    }
}
