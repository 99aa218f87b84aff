//! Linear projection from a sample to a full population.

/// `value * n / sample_rows`, computed in 128 bits and saturated to `i64`.
///
/// A `sample_rows` of zero has nothing to scale and yields zero.
pub fn sample_to_total(value: i64, n: u64, sample_rows: u64) -> i64 {
    if sample_rows == 0 {
        return 0;
    }
    let scaled = i128::from(value) * i128::from(n) / i128::from(sample_rows);
    scaled.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Unsigned variant for byte counts.
pub fn sample_to_total_bytes(value: u64, n: u64, sample_rows: u64) -> u64 {
    if sample_rows == 0 {
        return 0;
    }
    let scaled = u128::from(value) * u128::from(n) / u128::from(sample_rows);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Per-row cost times population: `(value / sample_rows) * n`. Truncates the
/// per-row figure first, so it can be lower than [`sample_to_total_bytes`].
pub fn per_row_estimate(value: u64, n: u64, sample_rows: u64) -> u64 {
    if sample_rows == 0 {
        return 0;
    }
    (value / sample_rows).saturating_mul(n)
}
