//! Point-in-time memory readings and their differences.

use crate::alloc::AllocatorStats;
use crate::extrapolate::sample_to_total;

/// Memory at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemStage {
    pub allocator: AllocatorStats,
    pub process_resident_bytes: u64,
}

/// Signed change between two [`MemStage`]s. Negative fields mean memory was
/// given back between the readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemDiff {
    /// Change in bytes allocated by the program
    pub alloc: i64,

    /// Change in bytes reserved by the allocator
    pub sys: i64,

    /// Change in process resident memory
    pub process: i64,
}

fn delta(earlier: u64, later: u64) -> i64 {
    (i128::from(later) - i128::from(earlier)).clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

impl MemStage {
    /// `later - self`, field by field.
    pub fn diff(&self, later: &MemStage) -> MemDiff {
        MemDiff {
            alloc: delta(self.allocator.allocated, later.allocator.allocated),
            sys: delta(self.allocator.reserved, later.allocator.reserved),
            process: delta(self.process_resident_bytes, later.process_resident_bytes),
        }
    }
}

impl MemDiff {
    /// Scale a diff measured over `sample_rows` rows to `n` rows.
    pub fn sample_to_total(&self, n: u64, sample_rows: u64) -> MemDiff {
        MemDiff {
            alloc: sample_to_total(self.alloc, n, sample_rows),
            sys: sample_to_total(self.sys, n, sample_rows),
            process: sample_to_total(self.process, n, sample_rows),
        }
    }
}
