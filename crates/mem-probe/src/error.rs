//! Error types for memory probing.

use thiserror::Error;

/// Failure to read process memory. Never fatal: the probe logs it and
/// records a zero reading.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The `ps` command ran but did not succeed
    #[error("ps exited with {0}")]
    CommandFailed(std::process::ExitStatus),

    /// Output could not be read as a memory size
    #[error("Cannot parse memory size from '{0}'")]
    Parse(String),

    /// The reader has nothing to report on this platform
    #[error("Process memory unavailable: {0}")]
    Unavailable(String),
}
