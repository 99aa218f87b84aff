//! Row generator producing one value per column per call.

use crate::generators::ColumnGenerator;
use estimate_core::{ColumnSpec, Row, TableSchema};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Column type has no generation rule
    #[error("Column '{column}' has unsupported type: {type_name}")]
    UnsupportedType { column: String, type_name: String },

    /// Declared length is longer than any value the write buffer accepts
    #[error("Column '{column}' declares length {length}, which is too large")]
    LengthTooLarge { column: String, length: u64 },

    /// Running float total has no exact decimal representation
    #[error("Value {0} cannot be represented as a decimal")]
    DecimalOutOfRange(f64),

    /// Duration or time cursor stepped past the representable range
    #[error("Time cursor overflowed")]
    TimeOverflow,
}

/// Source of randomness for float and decimal columns.
///
/// `Entropy` matches the tool's default behavior: every run draws different
/// increments, so float/decimal values are not reproducible. `Seeded` gives
/// each such column its own RNG derived from the seed and the column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomSource {
    #[default]
    Entropy,
    Seeded(u64),
}

impl RandomSource {
    /// Build the RNG for the column at `index`.
    pub fn rng_for_column(&self, index: usize) -> StdRng {
        match self {
            Self::Entropy => StdRng::from_entropy(),
            Self::Seeded(seed) => {
                StdRng::seed_from_u64(seed.wrapping_add((index as u64).wrapping_mul(0x9E3779B97F4A7C15)))
            }
        }
    }
}

/// Generator holding the counter state of every column of one table.
///
/// Column states are addressed by column index and never shared; each
/// `next_row` call advances every column exactly once.
pub struct RowGenerator {
    /// Per-column generators in schema order
    columns: Vec<ColumnGenerator>,
    /// Number of rows produced so far
    rows_generated: u64,
}

impl RowGenerator {
    /// Create a generator for the given columns.
    ///
    /// Fails if any column has a type without a generation rule, so no row
    /// is ever produced for an unsupported schema.
    pub fn new(columns: &[ColumnSpec], random: RandomSource) -> Result<Self, GeneratorError> {
        let columns = columns
            .iter()
            .enumerate()
            .map(|(index, spec)| ColumnGenerator::for_column(spec, index, &random))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Created row generator for {} columns ({:?})", columns.len(), random);

        Ok(Self {
            columns,
            rows_generated: 0,
        })
    }

    /// Create a generator for every column of a table schema.
    pub fn from_schema(schema: &TableSchema, random: RandomSource) -> Result<Self, GeneratorError> {
        Self::new(&schema.columns, random)
    }

    /// Generate the next row.
    pub fn next_row(&mut self) -> Result<Row, GeneratorError> {
        let row = self
            .columns
            .iter_mut()
            .map(ColumnGenerator::next_value)
            .collect::<Result<Row, _>>()?;
        self.rows_generated += 1;
        Ok(row)
    }

    /// Generate `count` rows lazily.
    pub fn rows(&mut self, count: u64) -> RowIterator<'_> {
        RowIterator {
            generator: self,
            remaining: count,
        }
    }

    /// Number of rows produced so far.
    pub fn rows_generated(&self) -> u64 {
        self.rows_generated
    }

    /// Number of columns per row.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Iterator that lazily generates rows.
pub struct RowIterator<'a> {
    generator: &'a mut RowGenerator,
    remaining: u64,
}

impl Iterator for RowIterator<'_> {
    type Item = Result<Row, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.next_row())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use estimate_core::{ColumnKind, Datum};

    fn test_schema() -> TableSchema {
        TableSchema::from_sql(
            "CREATE TABLE t (
                id BIGINT UNSIGNED,
                delta INT,
                score DOUBLE,
                tag BINARY(2),
                created DATETIME
            )",
        )
        .unwrap()
    }

    #[test]
    fn test_generate_single_row() {
        let mut generator = RowGenerator::from_schema(&test_schema(), RandomSource::Entropy).unwrap();

        let row = generator.next_row().unwrap();

        assert_eq!(row.len(), 5);
        assert_eq!(row[0], Datum::Uint(1));
        assert_eq!(row[1], Datum::Int(1));
        assert!(matches!(row[2], Datum::Float(f) if (0.0..1.0).contains(&f)));
        assert_eq!(row[3], Datum::Bytes(vec![0, 1]));
        assert!(matches!(row[4], Datum::Time(_)));
    }

    #[test]
    fn test_columns_advance_independently() {
        let mut generator = RowGenerator::from_schema(&test_schema(), RandomSource::Entropy).unwrap();

        let rows: Vec<Row> = generator.rows(4).collect::<Result<_, _>>().unwrap();

        let ids: Vec<u64> = rows.iter().filter_map(|r| r[0].as_u64()).collect();
        let deltas: Vec<i64> = rows.iter().filter_map(|r| r[1].as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(deltas, vec![1, -2, 3, -4]);
        assert_eq!(generator.rows_generated(), 4);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let schema = test_schema();
        let mut gen1 = RowGenerator::from_schema(&schema, RandomSource::Seeded(42)).unwrap();
        let mut gen2 = RowGenerator::from_schema(&schema, RandomSource::Seeded(42)).unwrap();

        for _ in 0..10 {
            assert_eq!(gen1.next_row().unwrap(), gen2.next_row().unwrap());
        }
    }

    #[test]
    fn test_unsupported_column_rejected_upfront() {
        let columns = vec![
            ColumnSpec::new("id", ColumnKind::UnsignedInt),
            ColumnSpec::new("doc", ColumnKind::Unsupported("JSON".to_string())),
        ];

        let result = RowGenerator::new(&columns, RandomSource::Entropy);
        assert!(matches!(
            result,
            Err(GeneratorError::UnsupportedType { ref column, .. }) if column == "doc"
        ));
    }

    #[test]
    fn test_row_iterator_size() {
        let mut generator = RowGenerator::from_schema(&test_schema(), RandomSource::Entropy).unwrap();

        let iter = generator.rows(7);
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.count(), 7);
        assert_eq!(generator.column_count(), 5);
    }
}
