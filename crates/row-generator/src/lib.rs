//! Synthetic row generator for membuf-estimate.
//!
//! This crate provides the [`RowGenerator`], which keeps one counter per
//! column and produces the next value for every column on each call. Integer,
//! byte-string and temporal columns are fully deterministic. Float and decimal
//! columns add a uniform random step to a running total, so their sequences
//! differ between runs unless a seed is supplied through [`RandomSource`].
//!
//! # Architecture
//!
//! ```text
//! TableSchema (CREATE TABLE)
//!        │
//!        ▼
//! ┌──────────────────────────┐
//! │       RowGenerator       │
//! │                          │
//! │  columns[0]: UintCounter │
//! │  columns[1]: ByteCounter │
//! │  columns[i]: ...         │
//! └────────────┬─────────────┘
//!              │
//!              ▼
//!     Row = [Datum; columns]
//! ```
//!
//! # Example
//!
//! ```rust
//! use estimate_core::{Datum, TableSchema};
//! use row_generator::{RandomSource, RowGenerator};
//!
//! let schema = TableSchema::from_sql("CREATE TABLE t (id BIGINT UNSIGNED, tag BINARY(2))").unwrap();
//! let mut generator = RowGenerator::from_schema(&schema, RandomSource::Entropy).unwrap();
//!
//! let row = generator.next_row().unwrap();
//! assert_eq!(row[0], Datum::Uint(1));
//! assert_eq!(row[1], Datum::Bytes(vec![0, 1]));
//! ```
//!
//! # Column rules
//!
//! - unsigned integer: 1, 2, 3, ...
//! - signed integer: 1, -2, 3, -4, ...
//! - float / decimal: running total of uniform `[0, 1)` steps
//! - byte string: big-endian base-256 counter over a fixed buffer, wrapping to zero
//! - duration: one second more per call
//! - date/time: one second more per call, starting at the Unix epoch

pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use generator::{GeneratorError, RandomSource, RowGenerator, RowIterator};
pub use generators::bytes::MAX_BYTES_LENGTH;
pub use generators::ColumnGenerator;
