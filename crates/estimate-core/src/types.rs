//! Column type descriptors.
//!
//! `ColumnKind` is the closed set of value shapes the row generator knows how
//! to produce. SQL types outside that set are kept as
//! [`ColumnKind::Unsupported`] so the schema still loads and the generator can
//! reject the column with a precise error.

use std::fmt;

/// Value shape of a column, derived from its SQL type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Signed integer of any width (TINYINT .. BIGINT)
    SignedInt,

    /// Unsigned integer of any width (TINYINT UNSIGNED .. BIGINT UNSIGNED)
    UnsignedInt,

    /// FLOAT, REAL, DOUBLE
    Float,

    /// DECIMAL / NUMERIC
    Decimal,

    /// CHAR, VARCHAR, BINARY, VARBINARY, BLOB and TEXT families
    Bytes,

    /// TIME
    Duration,

    /// DATE, DATETIME, TIMESTAMP
    DateTime,

    /// Any other SQL type, carrying its rendered name
    Unsupported(String),
}

impl ColumnKind {
    /// Whether the generator has a rule for this kind.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignedInt => f.write_str("signed integer"),
            Self::UnsignedInt => f.write_str("unsigned integer"),
            Self::Float => f.write_str("float"),
            Self::Decimal => f.write_str("decimal"),
            Self::Bytes => f.write_str("byte string"),
            Self::Duration => f.write_str("duration"),
            Self::DateTime => f.write_str("date/time"),
            Self::Unsupported(name) => write!(f, "unsupported type {name}"),
        }
    }
}

/// Immutable per-column descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,

    /// Value shape
    pub kind: ColumnKind,

    /// Declared length, e.g. `16` for `VARCHAR(16)`
    pub declared_length: Option<u64>,

    /// Whether the column was declared UNSIGNED
    pub unsigned: bool,
}

impl ColumnSpec {
    /// Create a new column spec without a declared length.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        let unsigned = kind == ColumnKind::UnsignedInt;
        Self {
            name: name.into(),
            kind,
            declared_length: None,
            unsigned,
        }
    }

    /// Set the declared length.
    pub fn with_length(mut self, length: u64) -> Self {
        self.declared_length = Some(length);
        self
    }
}
