//! Human-readable phase reports.

use crate::config::{Isolation, Mode};
use crate::metrics::PhaseTiming;
use mem_probe::{sample_to_total_bytes, MemDiff};
use std::time::Duration;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with 1024-based units and two decimals, e.g.
/// `1.50KB`. Values past the petabyte range stay in `PB`. Negative counts
/// keep their sign.
pub fn readable_size(bytes: i128) -> String {
    let sign = if bytes < 0 { "-" } else { "" };
    let mut value = bytes.unsigned_abs() as f64;
    let mut unit = UNITS[0];
    for (i, name) in UNITS.iter().enumerate() {
        unit = name;
        if value < 1024.0 || i == UNITS.len() - 1 {
            break;
        }
        value /= 1024.0;
    }
    format!("{sign}{value:.2}{unit}")
}

fn size(bytes: impl Into<i128>) -> String {
    readable_size(bytes.into())
}

/// Memory cost of one measurement, sampled and projected to the full
/// population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryReport {
    /// `insert`, `insert-gc`, ...
    pub label: String,
    /// Target population.
    pub rows: u64,
    /// Rows actually written.
    pub sample_rows: u64,
    /// Measured difference.
    pub sampled: MemDiff,
    /// Staged buffer bytes.
    pub buffer_bytes: u64,
    /// `sampled` projected to `rows`.
    pub total: MemDiff,
    /// `buffer_bytes` projected to `rows`.
    pub total_buffer_bytes: u64,
}

impl MemoryReport {
    pub fn new(
        label: impl Into<String>,
        sampled: MemDiff,
        buffer_bytes: u64,
        rows: u64,
        sample_rows: u64,
    ) -> Self {
        Self {
            label: label.into(),
            rows,
            sample_rows,
            sampled,
            buffer_bytes,
            total: sampled.sample_to_total(rows, sample_rows),
            total_buffer_bytes: sample_to_total_bytes(buffer_bytes, rows, sample_rows),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {} rows with {} rows sampled\n\
             sampled alloc: {}, sys: {}, process: {}, membuffer: {}\n\
             total alloc: {}, sys: {}, process: {}, membuffer: {}",
            self.label,
            self.rows,
            self.sample_rows,
            size(self.sampled.alloc),
            size(self.sampled.sys),
            size(self.sampled.process),
            size(self.buffer_bytes),
            size(self.total.alloc),
            size(self.total.sys),
            size(self.total.process),
            size(self.total_buffer_bytes),
        )
    }
}

/// Result of a drop-key or drop-value pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolationReport {
    pub isolation: Isolation,
    /// Keys visited by the pass.
    pub keys: usize,
    /// Duration of the pass.
    pub elapsed: Duration,
    /// Staged entries left afterwards.
    pub entries_after: usize,
    /// Staged bytes left afterwards.
    pub size_after: u64,
    /// Staged value bytes left afterwards.
    pub value_bytes_after: u64,
}

impl IsolationReport {
    pub fn summary(&self) -> String {
        format!(
            "{} over {} keys cost {:?}, membuffer: {} in {} entries, values: {}",
            self.isolation,
            self.keys,
            self.elapsed,
            size(self.size_after),
            self.entries_after,
            size(self.value_bytes_after),
        )
    }
}

/// Everything measured for one workload phase.
#[derive(Debug, Clone)]
pub struct PhaseReport {
    pub mode: Mode,
    /// Target population.
    pub rows: u64,
    pub timing: PhaseTiming,
    /// Measured right after the write loop.
    pub immediate: MemoryReport,
    /// Measured after reclaiming free memory and settling.
    pub settled: MemoryReport,
    /// Per-row buffer cost times population, in bytes.
    pub estimate: u64,
    pub isolation: Option<IsolationReport>,
}

impl PhaseReport {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "sample {} lines cost {:?}, {:?} per row, {:.0} rows/s\n",
            self.timing.rows,
            self.timing.elapsed,
            self.timing.per_row(),
            self.timing.rows_per_second()
        );
        summary.push_str(&self.immediate.summary());
        summary.push('\n');
        summary.push_str(&self.settled.summary());
        summary.push('\n');

        if let Some(isolation) = &self.isolation {
            summary.push_str(&isolation.summary());
            summary.push('\n');
        }

        summary.push_str(&format!(
            "{} {} rows with memory cost: {}({} bytes)",
            self.mode,
            self.rows,
            size(self.estimate),
            self.estimate
        ));
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_size_units() {
        assert_eq!(readable_size(0), "0.00B");
        assert_eq!(readable_size(1023), "1023.00B");
        assert_eq!(readable_size(1024), "1.00KB");
        assert_eq!(readable_size(1536), "1.50KB");
        assert_eq!(readable_size(1 << 20), "1.00MB");
        assert_eq!(readable_size(1 << 40), "1.00TB");
        assert_eq!(readable_size(1 << 50), "1.00PB");
    }

    #[test]
    fn test_readable_size_clamps_at_pb() {
        assert_eq!(readable_size(1 << 60), "1024.00PB");
    }

    #[test]
    fn test_readable_size_negative() {
        assert_eq!(readable_size(-1024), "-1.00KB");
        assert_eq!(readable_size(-5), "-5.00B");
    }

    #[test]
    fn test_memory_report_projection() {
        let diff = MemDiff {
            alloc: 2048,
            sys: -1024,
            process: 0,
        };
        let report = MemoryReport::new("insert", diff, 1234, 1000, 10);

        assert_eq!(report.total.alloc, 204_800);
        assert_eq!(report.total.sys, -102_400);
        assert_eq!(report.total_buffer_bytes, 123_400);

        let text = report.summary();
        assert!(text.starts_with("insert 1000 rows with 10 rows sampled\n"));
        assert!(text.contains("sampled alloc: 2.00KB, sys: -1.00KB, process: 0.00B, membuffer: 1.21KB"));
        assert!(text.contains("total alloc: 200.00KB, sys: -100.00KB"));
    }

    #[test]
    fn test_phase_summary_includes_isolation() {
        let memory = MemoryReport::new("delete", MemDiff::default(), 100, 100, 10);
        let report = PhaseReport {
            mode: Mode::Delete,
            rows: 100,
            timing: PhaseTiming::new(10, Duration::from_millis(1)),
            immediate: memory.clone(),
            settled: MemoryReport {
                label: "delete-gc".to_string(),
                ..memory
            },
            estimate: 1000,
            isolation: Some(IsolationReport {
                isolation: Isolation::DropKey,
                keys: 20,
                elapsed: Duration::from_micros(5),
                entries_after: 0,
                size_after: 0,
                value_bytes_after: 0,
            }),
        };

        let text = report.summary();
        assert!(text.starts_with("sample 10 lines cost 1ms, 100µs per row, 10000 rows/s\n"));
        assert!(text.contains("\ndelete-gc 100 rows with 10 rows sampled\n"));
        assert!(text.contains("drop-key over 20 keys"));
        assert!(text.ends_with("delete 100 rows with memory cost: 1000.00B(1000 bytes)"));
    }
}
