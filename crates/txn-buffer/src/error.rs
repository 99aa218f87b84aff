//! Error types for the write buffer.

use crate::table::Handle;
use thiserror::Error;

/// Errors raised by transactional writes.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A single key/value pair exceeds the entry size limit.
    #[error("Entry too large: {size} bytes exceeds limit of {limit} bytes")]
    EntryTooLarge { size: u64, limit: u64 },

    /// The staged writes exceed the transaction size limit.
    #[error("Transaction too large: {size} bytes exceeds limit of {limit} bytes")]
    TxnTooLarge { size: u64, limit: u64 },

    /// Update or remove of a handle with no visible record.
    #[error("Record not found for handle {0}")]
    RecordNotFound(Handle),

    /// Row does not match the table's column count.
    #[error("Row has {actual} values, table has {expected} columns")]
    ColumnCountMismatch { expected: usize, actual: usize },
}
