//! Numeric value generators.

use crate::generator::GeneratorError;
use estimate_core::Datum;
use rand::rngs::StdRng;
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Emits 1, 2, 3, ...
#[derive(Debug, Clone, Default)]
pub struct UintCounter {
    value: u64,
}

impl UintCounter {
    pub fn next_value(&mut self) -> Datum {
        self.value = self.value.wrapping_add(1);
        Datum::Uint(self.value)
    }
}

/// Emits 1, -2, 3, -4, ...
#[derive(Debug, Clone, Default)]
pub struct IntCounter {
    value: i64,
}

impl IntCounter {
    pub fn next_value(&mut self) -> Datum {
        self.value = self.value.wrapping_add(1);
        if self.value % 2 == 0 {
            Datum::Int(self.value.wrapping_neg())
        } else {
            Datum::Int(self.value)
        }
    }
}

/// Running total of uniform `[0, 1)` steps.
#[derive(Debug, Clone)]
pub struct FloatAccumulator {
    total: f64,
    rng: StdRng,
}

impl FloatAccumulator {
    pub fn new(rng: StdRng) -> Self {
        Self { total: 0.0, rng }
    }

    pub fn next_value(&mut self) -> Datum {
        self.total += self.rng.gen::<f64>();
        Datum::Float(self.total)
    }
}

/// Same walk as [`FloatAccumulator`], emitted as an exact decimal.
#[derive(Debug, Clone)]
pub struct DecimalAccumulator {
    total: f64,
    rng: StdRng,
}

impl DecimalAccumulator {
    pub fn new(rng: StdRng) -> Self {
        Self { total: 0.0, rng }
    }

    pub fn next_value(&mut self) -> Result<Datum, GeneratorError> {
        self.total += self.rng.gen::<f64>();
        Decimal::from_f64(self.total)
            .map(Datum::Decimal)
            .ok_or(GeneratorError::DecimalOutOfRange(self.total))
    }
}
