//! Error types for workload runs.

use row_generator::GeneratorError;
use thiserror::Error;
use txn_buffer::StorageError;

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum WorkloadError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A column value could not be produced.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// The write buffer rejected a write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
