//! # Transactional write buffer
//!
//! A small in-memory key/value store whose transactions stage every write in
//! a [`MemBuffer`] until commit. The buffer tracks the exact number of staged
//! key and value bytes, which is the quantity membuf-estimate measures.
//!
//! [`Table`] maps generated rows onto the store the way a row-oriented SQL
//! engine does: one record entry per row, plus one entry per index.
//!
//! ## Key layout
//!
//! ```text
//! record:  't' | table_id (8) | "_r" | handle (8)                       -> encoded row
//! unique:  't' | table_id (8) | "_i" | index_id (8) | values            -> handle (8)
//! index:   't' | table_id (8) | "_i" | index_id (8) | values | handle   -> '0'
//! ```
//!
//! Integers in keys are big-endian with the sign bit flipped so byte order
//! matches numeric order. A staged delete is the key with an empty value.
//!
//! ## Limits
//!
//! Every write is checked against a per-entry limit (6 MiB) and a
//! per-transaction buffer limit (64 GiB by default). Exceeding either is a
//! [`StorageError`].

pub mod codec;
mod error;
mod membuf;
mod store;
mod table;

pub use error::StorageError;
pub use membuf::{MemBuffer, DEFAULT_ENTRY_SIZE_LIMIT, DEFAULT_TXN_SIZE_LIMIT};
pub use store::{MemStore, Transaction};
pub use table::{Handle, Table};
