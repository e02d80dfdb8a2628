//! Selection error types

use std::fmt;
use super::join_type::JoinType;

/// Errors raised before any build starts, when a table selection cannot be
/// joined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Nothing was selected
    NoTablesSelected,
    /// A key-based join needs at least two sources
    TooFewTables {
        join_type: JoinType,
        selected: usize,
    },
    /// A requested table is not in the catalog
    UnknownTable(String),
    /// A source's key column count differs from the first source's
    KeyArityMismatch {
        table: String,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTablesSelected => write!(f, "no tables selected to join"),
            Self::TooFewTables { join_type, selected } => {
                write!(
                    f,
                    "{} join needs at least two tables, {} selected",
                    join_type, selected
                )
            }
            Self::UnknownTable(name) => write!(f, "no table named '{}'", name),
            Self::KeyArityMismatch { table, expected, found } => {
                write!(
                    f,
                    "table '{}' has {} key columns, expected {}",
                    table, found, expected
                )
            }
        }
    }
}

impl std::error::Error for SelectionError {}
