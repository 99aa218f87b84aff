//! Core types for membuf-estimate.
//!
//! This crate provides the foundational types shared by the generator,
//! the write buffer and the workload driver:
//!
//! - [`ColumnKind`] / [`ColumnSpec`] - Per-column type descriptors
//! - [`Datum`] / [`Row`] - Generated values, one per column
//! - [`TableSchema`] - Columns and indexes loaded from a CREATE TABLE statement
//!
//! # Architecture
//!
//! ```text
//! estimate-core (this crate)
//!    │
//!    ├─── row-generator   (produces Rows from ColumnSpecs)
//!    ├─── txn-buffer      (encodes Rows into staged key/value writes)
//!    └─── workload        (drives both and measures memory)
//! ```
//!
//! # Example
//!
//! ```rust
//! use estimate_core::{ColumnKind, TableSchema};
//!
//! let schema = TableSchema::from_sql(
//!     "CREATE TABLE t (id BIGINT UNSIGNED, name VARCHAR(16), KEY idx_name (name))",
//! ).unwrap();
//!
//! assert_eq!(schema.columns[0].kind, ColumnKind::UnsignedInt);
//! assert_eq!(schema.columns[1].declared_length, Some(16));
//! assert_eq!(schema.indexes.len(), 1);
//! ```

pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use schema::{IndexSpec, SchemaError, TableSchema};
pub use types::{ColumnKind, ColumnSpec};
pub use values::{Datum, Row};
