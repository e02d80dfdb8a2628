//! Column access errors

use std::fmt;
use super::types::ConversionError;

/// Errors raised while reading or writing a cell through a column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnError {
    /// The record has no stored cell at the column's position
    MissingCell {
        column: String,
        index: usize,
    },
    /// The stored or written value does not fit the column type
    TypeMismatch {
        column: String,
        source: ConversionError,
    },
    /// No column with this name or position exists on the table
    NoSuchColumn {
        table: String,
        column: String,
    },
    /// The column does not accept writes
    ReadOnly {
        column: String,
    },
    /// The row's origin table has no column by this name
    NotOnSource {
        column: String,
        table: String,
    },
    /// The combined row has no record for the source behind this column
    AbsentRecord {
        column: String,
        table: String,
    },
    /// A formula could not be evaluated
    Formula {
        column: String,
        message: String,
    },
    /// Formula references nest too deeply (usually a self-reference)
    FormulaDepth {
        column: String,
    },
}

impl ColumnError {
    /// True for failures of a write that the table cannot carry out.
    pub fn is_write_error(&self) -> bool {
        matches!(
            self,
            ColumnError::ReadOnly { .. }
                | ColumnError::NotOnSource { .. }
                | ColumnError::AbsentRecord { .. }
        )
    }
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnError::MissingCell { column, index } => {
                write!(f, "Record has no cell {} for column '{}'", index, column)
            }
            ColumnError::TypeMismatch { column, source } => {
                write!(f, "Column '{}': {}", column, source)
            }
            ColumnError::NoSuchColumn { table, column } => {
                write!(f, "Table '{}' has no column '{}'", table, column)
            }
            ColumnError::ReadOnly { column } => {
                write!(f, "Column '{}' is read-only", column)
            }
            ColumnError::NotOnSource { column, table } => {
                write!(f, "Column '{}' is not on source table '{}'", column, table)
            }
            ColumnError::AbsentRecord { column, table } => {
                write!(
                    f,
                    "Cannot write '{}': no matching record in table '{}'",
                    column, table
                )
            }
            ColumnError::Formula { column, message } => {
                write!(f, "Formula for '{}' failed: {}", column, message)
            }
            ColumnError::FormulaDepth { column } => {
                write!(f, "Formula for '{}' references itself", column)
            }
        }
    }
}

impl std::error::Error for ColumnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ColumnError::TypeMismatch { source, .. } => Some(source),
            _ => None,
        }
    }
}
