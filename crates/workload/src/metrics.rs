//! Timing collected during a sampled phase.

use std::time::Duration;

/// Wall-clock time spent writing the sampled rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTiming {
    /// Number of rows written.
    pub rows: u64,
    /// Duration of the write loop.
    pub elapsed: Duration,
}

impl PhaseTiming {
    pub fn new(rows: u64, elapsed: Duration) -> Self {
        Self { rows, elapsed }
    }

    /// Average time per row.
    pub fn per_row(&self) -> Duration {
        if self.rows == 0 {
            return Duration::ZERO;
        }
        let nanos = self.elapsed.as_nanos() / u128::from(self.rows);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.rows as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}
