//! Duration and timestamp generators.

use crate::generator::GeneratorError;
use chrono::{DateTime, TimeDelta, Utc};
use estimate_core::Datum;

/// Amount every temporal cursor advances per call.
fn step() -> TimeDelta {
    TimeDelta::seconds(1)
}

/// Emits 1s, 2s, 3s, ...
#[derive(Debug, Clone)]
pub struct DurationCursor {
    elapsed: TimeDelta,
}

impl Default for DurationCursor {
    fn default() -> Self {
        Self {
            elapsed: TimeDelta::zero(),
        }
    }
}

impl DurationCursor {
    pub fn next_value(&mut self) -> Result<Datum, GeneratorError> {
        self.elapsed = self
            .elapsed
            .checked_add(&step())
            .ok_or(GeneratorError::TimeOverflow)?;
        Ok(Datum::Duration(self.elapsed))
    }
}

/// Emits the Unix epoch plus 1s, 2s, 3s, ...
#[derive(Debug, Clone)]
pub struct TimeCursor {
    at: DateTime<Utc>,
}

impl Default for TimeCursor {
    fn default() -> Self {
        Self {
            at: DateTime::UNIX_EPOCH,
        }
    }
}

impl TimeCursor {
    pub fn next_value(&mut self) -> Result<Datum, GeneratorError> {
        self.at = self
            .at
            .checked_add_signed(step())
            .ok_or(GeneratorError::TimeOverflow)?;
        Ok(Datum::Time(self.at))
    }
}
