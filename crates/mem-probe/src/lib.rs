//! # Memory probing
//!
//! Snapshots of heap and process memory, the signed differences between
//! them, and the linear projection from a sampled difference to a full
//! population.
//!
//! ```text
//! MemProbe::capture() ──► MemStage ─┐
//!                                   ├─► MemStage::diff() ──► MemDiff ──► sample_to_total()
//! MemProbe::capture() ──► MemStage ─┘
//! ```
//!
//! A [`MemStage`] combines allocator counters (see [`alloc`]) with the
//! resident set size from a [`ProcessMemoryReader`]. Readers are pluggable:
//! `/proc/self/status`, `ps`, `sysinfo`, or none.
//!
//! ## Example
//!
//! ```
//! use mem_probe::{sample_to_total, MemProbe, RssSource};
//!
//! let probe = MemProbe::from_source(RssSource::None);
//! let before = probe.capture();
//! let data = vec![0u8; 1 << 16];
//! let after = probe.capture();
//! let diff = before.diff(&after);
//! drop(data);
//!
//! assert_eq!(diff.process, 0);
//! assert_eq!(sample_to_total(diff.alloc, 10, 10), diff.alloc);
//! ```

pub mod alloc;
mod error;
mod extrapolate;
mod probe;
mod process;
mod stage;

pub use alloc::{AllocatorStats, TrackingAllocator};
pub use error::ProbeError;
pub use extrapolate::{per_row_estimate, sample_to_total, sample_to_total_bytes};
pub use probe::{MemProbe, DEFAULT_SETTLE_DELAY};
pub use process::{
    parse_ps_rss, parse_vm_rss, NullReader, ProcStatusReader, ProcessMemoryReader, PsReader,
    RssSource, SysinfoReader,
};
pub use stage::{MemDiff, MemStage};
