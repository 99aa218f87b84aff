//! Command-line flags.

use clap::{Parser, ValueEnum};
use mem_probe::RssSource;
use std::path::PathBuf;
use std::time::Duration;
use txn_buffer::{DEFAULT_ENTRY_SIZE_LIMIT, DEFAULT_TXN_SIZE_LIMIT};
use workload::{Isolation, Mode, WorkloadConfig, DEFAULT_ROWS, DEFAULT_SAMPLE};

#[derive(Parser, Debug)]
#[command(name = "membuf-estimate")]
#[command(version)]
#[command(about = "Estimate the write-buffer memory cost of insert/update/delete workloads")]
#[command(
    long_about = "Replays a sampled workload against an in-memory transactional write buffer \
                  and projects the measured memory cost to the full row count.\n\n\
                  FLOAT and DECIMAL columns are generated from random increments and differ \
                  between runs unless --seed is given."
)]
pub struct Cli {
    /// File containing exactly one CREATE TABLE statement (MySQL dialect)
    #[arg(short, long, value_name = "PATH", env = "MEMBUF_SCHEMA")]
    pub schema: PathBuf,

    /// Number of rows to estimate for
    #[arg(long, env = "MEMBUF_ROWS", default_value_t = DEFAULT_ROWS)]
    pub rows: u64,

    /// Sample every n rows; rows / sample rows are actually written
    #[arg(long, env = "MEMBUF_SAMPLE", default_value_t = DEFAULT_SAMPLE)]
    pub sample: u64,

    /// Workload to replay
    #[arg(long, value_enum, env = "MEMBUF_MODE", default_value_t = ModeArg::Insert)]
    pub mode: ModeArg,

    /// After measuring, drop every staged entry and report the buffer left
    #[arg(long, conflicts_with = "drop_value")]
    pub drop_key: bool,

    /// After measuring, empty every staged value and report the buffer left
    #[arg(long)]
    pub drop_value: bool,

    /// Seed for FLOAT/DECIMAL columns (non-reproducible when unset)
    #[arg(long, env = "MEMBUF_SEED")]
    pub seed: Option<u64>,

    /// Milliseconds to wait after reclaiming memory before the second snapshot
    #[arg(long, env = "MEMBUF_SETTLE_MS", default_value_t = 1000)]
    pub settle_ms: u64,

    /// Where to read process resident memory from
    #[arg(long, value_enum, env = "MEMBUF_RSS_SOURCE", default_value_t = RssSourceArg::Auto)]
    pub rss_source: RssSourceArg,

    /// Cap on the bytes staged by one transaction
    #[arg(long, env = "MEMBUF_TXN_SIZE_LIMIT", default_value_t = DEFAULT_TXN_SIZE_LIMIT)]
    pub txn_size_limit: u64,

    /// Cap on the bytes of one staged key/value pair
    #[arg(long, env = "MEMBUF_ENTRY_SIZE_LIMIT", default_value_t = DEFAULT_ENTRY_SIZE_LIMIT)]
    pub entry_size_limit: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Insert fresh rows
    Insert,
    /// Update every column of committed rows
    Update,
    /// Delete committed rows
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RssSourceArg {
    /// Best reader for this platform
    Auto,
    /// /proc/self/status
    Proc,
    /// ps -o rss=
    Ps,
    /// sysinfo crate
    Sysinfo,
    /// Do not measure process memory
    None,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Insert => Mode::Insert,
            ModeArg::Update => Mode::Update,
            ModeArg::Delete => Mode::Delete,
        }
    }
}

impl From<RssSourceArg> for RssSource {
    fn from(arg: RssSourceArg) -> Self {
        match arg {
            RssSourceArg::Auto => RssSource::Auto,
            RssSourceArg::Proc => RssSource::Proc,
            RssSourceArg::Ps => RssSource::Ps,
            RssSourceArg::Sysinfo => RssSource::Sysinfo,
            RssSourceArg::None => RssSource::None,
        }
    }
}

impl Cli {
    /// Isolation pass selected by the drop flags. clap rejects both at once.
    pub fn isolation(&self) -> Isolation {
        if self.drop_key {
            Isolation::DropKey
        } else if self.drop_value {
            Isolation::DropValue
        } else {
            Isolation::None
        }
    }

    /// Build the (not yet validated) workload configuration.
    pub fn to_config(&self) -> WorkloadConfig {
        WorkloadConfig::new(self.rows, self.sample)
            .with_mode(self.mode.into())
            .with_isolation(self.isolation())
            .with_seed(self.seed)
            .with_settle_delay(Duration::from_millis(self.settle_ms))
            .with_rss_source(self.rss_source.into())
            .with_txn_size_limit(self.txn_size_limit)
            .with_entry_size_limit(self.entry_size_limit)
    }
}
