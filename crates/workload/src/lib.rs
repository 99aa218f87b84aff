//! Sampled workload driver for membuf-estimate.
//!
//! Ties the row generator, the transactional write buffer and the memory
//! probe together:
//! 1. Write `rows / sample` generated rows inside one transaction
//!    (update and delete first commit a setup batch to act on)
//! 2. Snapshot memory around the write loop, then again after reclaiming
//!    free memory and settling
//! 3. Project the sampled cost to the full population
//!
//! # Example
//!
//! ```ignore
//! use estimate_core::TableSchema;
//! use workload::{Mode, WorkloadConfig, WorkloadDriver};
//!
//! let schema = TableSchema::from_file("sbtest.sql")?;
//! let config = WorkloadConfig::new(1_000_000, 10_000).with_mode(Mode::Update);
//!
//! let mut driver = WorkloadDriver::new(config, schema)?;
//! let report = driver.run().await?;
//! println!("{}", report.summary());
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod report;

pub use config::{Isolation, Mode, WorkloadConfig, DEFAULT_ROWS, DEFAULT_SAMPLE};
pub use driver::WorkloadDriver;
pub use error::WorkloadError;
pub use metrics::PhaseTiming;
pub use report::{readable_size, IsolationReport, MemoryReport, PhaseReport};
