//! Table schema loaded from a single CREATE TABLE statement.
//!
//! The statement is parsed with the MySQL dialect of `sqlparser`. Only the
//! parts that influence generated data and staged writes are kept: column
//! kinds and lengths, plus the primary, unique and secondary keys whose
//! entries the write buffer maintains next to each record.

use crate::types::{ColumnKind, ColumnSpec};
use sqlparser::ast::{CharacterLength, ColumnDef, ColumnOption, DataType, Ident, Statement, TableConstraint};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::{Parser, ParserError};
use std::fs;
use std::path::Path;
use tracing::debug;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema loading.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing SQL
    #[error("Failed to parse SQL: {0}")]
    ParseError(#[from] ParserError),

    /// Input did not contain exactly one statement
    #[error("Unexpected count of SQL statements {0}")]
    StatementCount(usize),

    /// The statement is not a CREATE TABLE
    #[error("Only CREATE TABLE is supported, got: {0}")]
    NotCreateTable(String),

    /// CREATE TABLE without column definitions (e.g. CREATE TABLE .. LIKE)
    #[error("Table '{0}' defines no columns")]
    NoColumns(String),

    /// An index references a column the table does not define
    #[error("Index '{index}' references unknown column '{column}'")]
    UnknownIndexColumn { index: String, column: String },
}

// ============================================================================
// Schema Types
// ============================================================================

/// An index the write buffer maintains alongside each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    /// Index name (`PRIMARY` for the primary key)
    pub name: String,

    /// Indexed columns, as positions into [`TableSchema::columns`]
    pub columns: Vec<usize>,

    /// Whether the index enforces uniqueness
    pub unique: bool,

    /// Whether this is the primary key
    pub primary: bool,
}

/// Columns and indexes of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name
    pub name: String,

    /// Columns in declaration order
    pub columns: Vec<ColumnSpec>,

    /// Primary, unique and secondary keys in declaration order
    pub indexes: Vec<IndexSpec>,
}

impl TableSchema {
    /// Load a schema from a file containing one CREATE TABLE statement.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let sql = fs::read_to_string(path)?;
        Self::from_sql(&sql)
    }

    /// Parse a schema from SQL text containing one CREATE TABLE statement.
    pub fn from_sql(sql: &str) -> Result<Self, SchemaError> {
        let mut statements = Parser::parse_sql(&MySqlDialect {}, sql)?;
        if statements.len() != 1 {
            return Err(SchemaError::StatementCount(statements.len()));
        }

        let create = match statements.remove(0) {
            Statement::CreateTable(create) => create,
            other => return Err(SchemaError::NotCreateTable(statement_keyword(&other))),
        };

        let name = create.name.to_string();
        if create.columns.is_empty() {
            return Err(SchemaError::NoColumns(name));
        }

        let columns: Vec<ColumnSpec> = create.columns.iter().map(column_spec).collect();

        let mut indexes = Vec::new();
        for (position, column) in create.columns.iter().enumerate() {
            for option in &column.options {
                if let ColumnOption::Unique { is_primary, .. } = &option.option {
                    indexes.push(IndexSpec {
                        name: if *is_primary {
                            "PRIMARY".to_string()
                        } else {
                            column.name.value.clone()
                        },
                        columns: vec![position],
                        unique: true,
                        primary: *is_primary,
                    });
                }
            }
        }

        for constraint in &create.constraints {
            let (index_name, idents, unique, primary) = match constraint {
                TableConstraint::PrimaryKey { columns, .. } => {
                    ("PRIMARY".to_string(), columns, true, true)
                }
                TableConstraint::Unique { name, columns, .. } => {
                    (index_name_or_first(name, columns), columns, true, false)
                }
                TableConstraint::Index { name, columns, .. } => {
                    (index_name_or_first(name, columns), columns, false, false)
                }
                // Foreign keys, checks and fulltext indexes stage nothing
                _ => continue,
            };

            let positions = idents
                .iter()
                .map(|ident| {
                    find_column(&columns, &ident.value).ok_or_else(|| {
                        SchemaError::UnknownIndexColumn {
                            index: index_name.clone(),
                            column: ident.value.clone(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            indexes.push(IndexSpec {
                name: index_name,
                columns: positions,
                unique,
                primary,
            });
        }

        debug!(
            "Loaded schema for table '{}': {} columns, {} indexes",
            name,
            columns.len(),
            indexes.len()
        );

        Ok(Self {
            name,
            columns,
            indexes,
        })
    }

    /// Get the column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Columns whose SQL type the generator cannot serve.
    pub fn unsupported_columns(&self) -> Vec<&ColumnSpec> {
        self.columns
            .iter()
            .filter(|c| !c.kind.is_supported())
            .collect()
    }
}

// ============================================================================
// Type Mapping
// ============================================================================

fn column_spec(column: &ColumnDef) -> ColumnSpec {
    let (kind, declared_length) = column_kind(&column.data_type);
    let spec = ColumnSpec::new(column.name.value.clone(), kind);
    match declared_length {
        Some(length) => spec.with_length(length),
        None => spec,
    }
}

fn column_kind(data_type: &DataType) -> (ColumnKind, Option<u64>) {
    match data_type {
        DataType::TinyInt(_)
        | DataType::SmallInt(_)
        | DataType::MediumInt(_)
        | DataType::Int(_)
        | DataType::Integer(_)
        | DataType::BigInt(_) => (ColumnKind::SignedInt, None),

        DataType::UnsignedTinyInt(_)
        | DataType::UnsignedSmallInt(_)
        | DataType::UnsignedMediumInt(_)
        | DataType::UnsignedInt(_)
        | DataType::UnsignedInteger(_)
        | DataType::UnsignedBigInt(_) => (ColumnKind::UnsignedInt, None),

        DataType::Float(_)
        | DataType::Real { .. }
        | DataType::Double { .. }
        | DataType::DoublePrecision { .. } => (ColumnKind::Float, None),

        DataType::Decimal { .. } | DataType::Numeric { .. } => (ColumnKind::Decimal, None),

        DataType::Char(length)
        | DataType::Character(length)
        | DataType::Varchar(length)
        | DataType::CharacterVarying(length)
        | DataType::CharVarying(length) => (ColumnKind::Bytes, character_length(length)),

        DataType::Binary(length) | DataType::Varbinary(length) | DataType::Blob(length) => {
            (ColumnKind::Bytes, *length)
        }

        DataType::Text { .. } => (ColumnKind::Bytes, None),

        DataType::Time { .. } => (ColumnKind::Duration, None),

        DataType::Date { .. } | DataType::Datetime { .. } | DataType::Timestamp { .. } => {
            (ColumnKind::DateTime, None)
        }

        other => (kind_from_type_name(&other.to_string()), None),
    }
}

fn character_length(length: &Option<CharacterLength>) -> Option<u64> {
    match length {
        Some(CharacterLength::IntegerLength { length, .. }) => Some(*length),
        _ => None,
    }
}

/// Fallback for MySQL spellings without a dedicated `DataType` variant.
fn kind_from_type_name(rendered: &str) -> ColumnKind {
    let base = rendered
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or(rendered)
        .to_ascii_uppercase();

    match base.as_str() {
        "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT"
        | "NVARCHAR" | "NCHAR" => ColumnKind::Bytes,
        "DEC" | "FIXED" => ColumnKind::Decimal,
        _ => ColumnKind::Unsupported(rendered.to_string()),
    }
}

fn find_column(columns: &[ColumnSpec], name: &str) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(name))
}

fn index_name_or_first(name: &Option<Ident>, columns: &[Ident]) -> String {
    match (name, columns.first()) {
        (Some(name), _) => name.value.clone(),
        (None, Some(first)) => first.value.clone(),
        (None, None) => String::new(),
    }
}

fn statement_keyword(statement: &Statement) -> String {
    let rendered = statement.to_string();
    rendered
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}
