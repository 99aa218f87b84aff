//! Row-level writes on top of a transaction.

use crate::codec;
use crate::error::StorageError;
use crate::store::Transaction;
use estimate_core::{Datum, IndexSpec, Row, TableSchema};
use std::fmt;
use tracing::trace;

/// Row identifier, allocated by the table in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(i64);

impl Handle {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A table bound to its schema. Every row gets a fresh auto-increment
/// handle; primary keys are maintained as unique indexes.
#[derive(Debug)]
pub struct Table {
    id: i64,
    schema: TableSchema,
    next_handle: i64,
}

impl Table {
    pub fn new(id: i64, schema: TableSchema) -> Self {
        Self {
            id,
            schema,
            next_handle: 1,
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Stage the record and index entries of a new row.
    pub fn add_record(&mut self, txn: &mut Transaction<'_>, row: &Row) -> Result<Handle, StorageError> {
        self.check_width(row)?;

        let handle = Handle::new(self.next_handle);
        self.next_handle += 1;

        txn.set(codec::record_key(self.id, handle), codec::encode_row(row))?;
        for (index_id, index) in self.indexes() {
            let (key, value) = self.index_entry(index_id, index, row, handle);
            txn.set(key, value)?;
        }

        trace!("Added record {} to table {}", handle, self.schema.name);
        Ok(handle)
    }

    /// Stage an update of `handle` from `before` to `after`. Only indexes
    /// covering a column flagged in `touched` are rewritten.
    pub fn update_record(
        &self,
        txn: &mut Transaction<'_>,
        handle: Handle,
        before: &Row,
        after: &Row,
        touched: &[bool],
    ) -> Result<(), StorageError> {
        self.check_width(before)?;
        self.check_width(after)?;
        let record_key = self.existing_record(txn, handle)?;

        for (index_id, index) in self.indexes() {
            let affected = index
                .columns
                .iter()
                .any(|&col| touched.get(col).copied().unwrap_or(false));
            if !affected {
                continue;
            }

            let (old_key, _) = self.index_entry(index_id, index, before, handle);
            txn.delete(old_key)?;
            let (new_key, new_value) = self.index_entry(index_id, index, after, handle);
            txn.set(new_key, new_value)?;
        }

        txn.set(record_key, codec::encode_row(after))?;
        trace!("Updated record {} in table {}", handle, self.schema.name);
        Ok(())
    }

    /// Stage the removal of `handle` and its index entries.
    pub fn remove_record(
        &self,
        txn: &mut Transaction<'_>,
        handle: Handle,
        before: &Row,
    ) -> Result<(), StorageError> {
        self.check_width(before)?;
        let record_key = self.existing_record(txn, handle)?;

        txn.delete(record_key)?;
        for (index_id, index) in self.indexes() {
            let (key, _) = self.index_entry(index_id, index, before, handle);
            txn.delete(key)?;
        }

        trace!("Removed record {} from table {}", handle, self.schema.name);
        Ok(())
    }

    fn indexes(&self) -> impl Iterator<Item = (i64, &IndexSpec)> {
        self.schema
            .indexes
            .iter()
            .enumerate()
            .map(|(pos, index)| (pos as i64 + 1, index))
    }

    fn index_entry(
        &self,
        index_id: i64,
        index: &IndexSpec,
        row: &Row,
        handle: Handle,
    ) -> (Vec<u8>, Vec<u8>) {
        let values: Vec<&Datum> = index.columns.iter().map(|&col| &row[col]).collect();
        if index.unique {
            (
                codec::index_key(self.id, index_id, &values, None),
                codec::handle_value(handle),
            )
        } else {
            (
                codec::index_key(self.id, index_id, &values, Some(handle)),
                b"0".to_vec(),
            )
        }
    }

    fn existing_record(&self, txn: &Transaction<'_>, handle: Handle) -> Result<Vec<u8>, StorageError> {
        let key = codec::record_key(self.id, handle);
        if txn.get(&key).is_none() {
            return Err(StorageError::RecordNotFound(handle));
        }
        Ok(key)
    }

    fn check_width(&self, row: &Row) -> Result<(), StorageError> {
        let expected = self.schema.columns.len();
        if row.len() != expected {
            return Err(StorageError::ColumnCountMismatch {
                expected,
                actual: row.len(),
            });
        }
        Ok(())
    }
}
