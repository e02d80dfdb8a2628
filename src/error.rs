//! Error types for tabjoin

use std::fmt;
use crate::model::ColumnError;

/// Errors that can occur while loading a catalog or request
#[derive(Debug)]
pub enum ParseError {
    /// IO error reading file
    Io {
        path: String,
        source: std::io::Error,
    },
    /// YAML deserialization error
    Yaml {
        source: serde_yaml::Error,
    },
    /// Well-formed YAML describing an unusable table
    Invalid {
        table: String,
        message: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            ParseError::Yaml { source } => {
                write!(f, "Invalid YAML: {}", source)
            }
            ParseError::Invalid { table, message } => {
                write!(f, "Invalid table '{}': {}", table, message)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io { source, .. } => Some(source),
            ParseError::Yaml { source } => Some(source),
            ParseError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io {
            path: String::new(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        ParseError::Yaml { source: err }
    }
}

/// Errors that abort a join or concatenation build.
///
/// Nothing is published when a build fails.
#[derive(Debug)]
pub enum BuildError {
    /// A key column could not produce a display string for a record
    KeyComputation {
        table: String,
        row: usize,
        column: String,
        source: ColumnError,
    },
    /// A source's key column count differs from the first source's
    KeyArity {
        table: String,
        expected: usize,
        found: usize,
    },
    /// The build was cancelled before it completed
    Cancelled,
    /// No Tokio runtime was available to run the build in the background
    NoRuntime,
    /// The background task panicked or was aborted
    TaskFailed(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::KeyComputation { table, row, column, source } => {
                write!(
                    f,
                    "Cannot compute key of row {} in table '{}' (column '{}'): {}",
                    row, table, column, source
                )
            }
            BuildError::KeyArity { table, expected, found } => {
                write!(
                    f,
                    "Table '{}' has {} key columns, expected {}",
                    table, found, expected
                )
            }
            BuildError::Cancelled => write!(f, "Build cancelled"),
            BuildError::NoRuntime => {
                write!(f, "Background builds need a running Tokio runtime")
            }
            BuildError::TaskFailed(msg) => write!(f, "Background build failed: {}", msg),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::KeyComputation { source, .. } => Some(source),
            _ => None,
        }
    }
}
