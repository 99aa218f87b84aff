//! Process exit codes for membuf-estimate.
//!
//! Each failure category gets its own code so scripts can tell a bad schema
//! from a buffer that hit its limit without parsing stderr.

use estimate_core::SchemaError;
use row_generator::GeneratorError;
use txn_buffer::StorageError;
use workload::WorkloadError;

/// Exit codes for membuf-estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report printed
    Success = 0,

    /// Internal or I/O error
    InternalError = 1,

    /// Invalid flags or configuration
    UsageError = 2,

    /// Schema file could not be parsed
    SchemaError = 3,

    /// Write buffer rejected a write
    StorageError = 4,

    /// A column value could not be generated
    GeneratorError = 5,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Pick the exit code for the first categorized error in the chain.
    pub fn for_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<WorkloadError>() {
                return match e {
                    WorkloadError::Config(_) => ExitCode::UsageError,
                    WorkloadError::Generator(_) => ExitCode::GeneratorError,
                    WorkloadError::Storage(_) => ExitCode::StorageError,
                };
            }
            if let Some(e) = cause.downcast_ref::<SchemaError>() {
                return Self::for_schema(e);
            }
            if cause.is::<GeneratorError>() {
                return ExitCode::GeneratorError;
            }
            if cause.is::<StorageError>() {
                return ExitCode::StorageError;
            }
        }
        ExitCode::InternalError
    }

    fn for_schema(err: &SchemaError) -> Self {
        match err {
            SchemaError::IoError(_) => ExitCode::InternalError,
            _ => ExitCode::SchemaError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}
