//! Configuration types for sampled workloads.

use crate::error::WorkloadError;
use mem_probe::{RssSource, DEFAULT_SETTLE_DELAY};
use row_generator::RandomSource;
use std::fmt;
use std::time::Duration;
use txn_buffer::{DEFAULT_ENTRY_SIZE_LIMIT, DEFAULT_TXN_SIZE_LIMIT};

/// Default target population.
pub const DEFAULT_ROWS: u64 = 1_000_000;

/// Default sampling rate: one row measured for every this many.
pub const DEFAULT_SAMPLE: u64 = 10_000;

/// Which statement kind to replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Insert => "insert",
            Mode::Update => "update",
            Mode::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Optional pass run on the staged writes after measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Isolation {
    #[default]
    None,
    /// Remove every staged entry
    DropKey,
    /// Keep every staged key but empty its value
    DropValue,
}

impl fmt::Display for Isolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Isolation::None => "none",
            Isolation::DropKey => "drop-key",
            Isolation::DropValue => "drop-value",
        };
        f.write_str(name)
    }
}

/// Configuration for one estimation run.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Target population the sample is projected to.
    pub rows: u64,
    /// Sampling rate; `rows / sample` rows are actually written.
    pub sample: u64,
    /// Workload to replay.
    pub mode: Mode,
    /// Post-measurement pass.
    pub isolation: Isolation,
    /// Seed for float and decimal columns (entropy when unset).
    pub seed: Option<u64>,
    /// Wait between reclaiming memory and the post-reclaim snapshot.
    pub settle_delay: Duration,
    /// Process memory reader.
    pub rss_source: RssSource,
    /// Cap on the staged bytes of one transaction.
    pub txn_size_limit: u64,
    /// Cap on a single staged key/value pair.
    pub entry_size_limit: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_SAMPLE)
    }
}

impl WorkloadConfig {
    /// Create a configuration for `rows` rows sampled every `sample` rows.
    pub fn new(rows: u64, sample: u64) -> Self {
        Self {
            rows,
            sample,
            mode: Mode::default(),
            isolation: Isolation::default(),
            seed: None,
            settle_delay: DEFAULT_SETTLE_DELAY,
            rss_source: RssSource::default(),
            txn_size_limit: DEFAULT_TXN_SIZE_LIMIT,
            entry_size_limit: DEFAULT_ENTRY_SIZE_LIMIT,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_isolation(mut self, isolation: Isolation) -> Self {
        self.isolation = isolation;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_rss_source(mut self, source: RssSource) -> Self {
        self.rss_source = source;
        self
    }

    pub fn with_txn_size_limit(mut self, limit: u64) -> Self {
        self.txn_size_limit = limit;
        self
    }

    pub fn with_entry_size_limit(mut self, limit: u64) -> Self {
        self.entry_size_limit = limit;
        self
    }

    /// Number of rows actually written: `rows / sample`, rounded down.
    pub fn sample_rows(&self) -> u64 {
        self.rows.checked_div(self.sample).unwrap_or(0)
    }

    /// Random source for float and decimal columns.
    pub fn random_source(&self) -> RandomSource {
        match self.seed {
            Some(seed) => RandomSource::Seeded(seed),
            None => RandomSource::Entropy,
        }
    }

    /// Reject configurations that would sample nothing.
    pub fn validate(&self) -> Result<(), WorkloadError> {
        if self.sample == 0 {
            return Err(WorkloadError::Config(
                "sample rate must be greater than zero".to_string(),
            ));
        }
        if self.sample_rows() == 0 {
            return Err(WorkloadError::Config(format!(
                "rows ({}) / sample ({}) leaves no rows to sample",
                self.rows, self.sample
            )));
        }
        Ok(())
    }
}
