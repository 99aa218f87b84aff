//! Per-column value generators.
//!
//! Each column kind maps to exactly one counter type. [`ColumnGenerator`]
//! is the single dispatch point between them.

pub mod bytes;
pub mod numeric;
pub mod temporal;

use crate::generator::{GeneratorError, RandomSource};
use estimate_core::{ColumnKind, ColumnSpec, Datum};

use bytes::{ByteCounter, MAX_BYTES_LENGTH};
use numeric::{DecimalAccumulator, FloatAccumulator, IntCounter, UintCounter};
use temporal::{DurationCursor, TimeCursor};

/// Counter state of one column, selected by its kind.
#[derive(Debug, Clone)]
pub enum ColumnGenerator {
    Uint(UintCounter),
    Int(IntCounter),
    Float(FloatAccumulator),
    Decimal(DecimalAccumulator),
    Bytes(ByteCounter),
    Duration(DurationCursor),
    Time(TimeCursor),
}

impl ColumnGenerator {
    /// Build the generator for the column at `index`.
    pub fn for_column(
        spec: &ColumnSpec,
        index: usize,
        random: &RandomSource,
    ) -> Result<Self, GeneratorError> {
        let generator = match &spec.kind {
            ColumnKind::UnsignedInt => Self::Uint(UintCounter::default()),
            ColumnKind::SignedInt => Self::Int(IntCounter::default()),
            ColumnKind::Float => Self::Float(FloatAccumulator::new(random.rng_for_column(index))),
            ColumnKind::Decimal => {
                Self::Decimal(DecimalAccumulator::new(random.rng_for_column(index)))
            }
            ColumnKind::Bytes => {
                let declared = spec.declared_length.unwrap_or(0);
                let length = usize::try_from(declared)
                    .ok()
                    .filter(|_| declared <= MAX_BYTES_LENGTH)
                    .ok_or_else(|| GeneratorError::LengthTooLarge {
                        column: spec.name.clone(),
                        length: declared,
                    })?;
                Self::Bytes(ByteCounter::new(length))
            }
            ColumnKind::Duration => Self::Duration(DurationCursor::default()),
            ColumnKind::DateTime => Self::Time(TimeCursor::default()),
            ColumnKind::Unsupported(type_name) => {
                return Err(GeneratorError::UnsupportedType {
                    column: spec.name.clone(),
                    type_name: type_name.clone(),
                })
            }
        };
        Ok(generator)
    }

    /// Advance this column and return its next value.
    pub fn next_value(&mut self) -> Result<Datum, GeneratorError> {
        match self {
            Self::Uint(counter) => Ok(counter.next_value()),
            Self::Int(counter) => Ok(counter.next_value()),
            Self::Float(acc) => Ok(acc.next_value()),
            Self::Decimal(acc) => acc.next_value(),
            Self::Bytes(counter) => Ok(counter.next_value()),
            Self::Duration(cursor) => cursor.next_value(),
            Self::Time(cursor) => cursor.next_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_kind() {
        let random = RandomSource::Seeded(1);
        let cases = [
            (ColumnKind::UnsignedInt, "Uint"),
            (ColumnKind::SignedInt, "Int"),
            (ColumnKind::Float, "Float"),
            (ColumnKind::Decimal, "Decimal"),
            (ColumnKind::Bytes, "Bytes"),
            (ColumnKind::Duration, "Duration"),
            (ColumnKind::DateTime, "Time"),
        ];

        for (index, (kind, expected)) in cases.into_iter().enumerate() {
            let spec = ColumnSpec::new("c", kind);
            let mut generator = ColumnGenerator::for_column(&spec, index, &random).unwrap();
            let value = generator.next_value().unwrap();
            assert!(
                format!("{value:?}").starts_with(expected),
                "expected {expected}, got {value:?}"
            );
        }
    }

    #[test]
    fn test_bytes_without_length_uses_one_byte() {
        let spec = ColumnSpec::new("c", ColumnKind::Bytes);
        let mut generator = ColumnGenerator::for_column(&spec, 0, &RandomSource::Entropy).unwrap();

        assert_eq!(generator.next_value().unwrap(), Datum::Bytes(vec![1]));
    }

    #[test]
    fn test_bytes_length_limit() {
        let spec = ColumnSpec::new("c", ColumnKind::Bytes).with_length(MAX_BYTES_LENGTH);
        assert!(ColumnGenerator::for_column(&spec, 0, &RandomSource::Entropy).is_ok());

        let spec = ColumnSpec::new("blob", ColumnKind::Bytes).with_length(4_294_967_295);
        let result = ColumnGenerator::for_column(&spec, 0, &RandomSource::Entropy);
        assert!(matches!(
            result,
            Err(GeneratorError::LengthTooLarge { ref column, length: 4_294_967_295 }) if column == "blob"
        ));
    }

    #[test]
    fn test_unsupported_kind_errors() {
        let spec = ColumnSpec::new("c", ColumnKind::Unsupported("GEOMETRY".to_string()));
        let result = ColumnGenerator::for_column(&spec, 0, &RandomSource::Entropy);

        assert!(matches!(result, Err(GeneratorError::UnsupportedType { .. })));
    }
}
