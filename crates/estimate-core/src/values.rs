//! Generated values.
//!
//! A [`Row`] is an ordered list of [`Datum`]s in schema column order. Rows are
//! produced fresh by the generator and handed by reference to the write
//! buffer, which encodes them into key/value bytes.

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

/// A single typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// Signed integer
    Int(i64),

    /// Unsigned integer
    Uint(u64),

    /// 64-bit floating point
    Float(f64),

    /// Exact decimal
    Decimal(Decimal),

    /// Raw bytes (character and binary columns)
    Bytes(Vec<u8>),

    /// Time-of-day / interval value
    Duration(TimeDelta),

    /// Point in time
    Time(DateTime<Utc>),
}

impl Datum {
    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(u) => Some(*u),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// One generated row, values in schema column order.
pub type Row = Vec<Datum>;
