//! Join types offered by the join command

use std::fmt;
use std::str::FromStr;
use serde::Deserialize;
use crate::join::JoinPolicy;

/// How the selected tables are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    Outer,
    Full,
    Diff,
    /// Row-wise union instead of a key join
    Append,
}

impl JoinType {
    pub const ALL: [JoinType; 5] = [
        JoinType::Inner,
        JoinType::Outer,
        JoinType::Full,
        JoinType::Diff,
        JoinType::Append,
    ];

    /// Policy for key-based joins; `None` for append
    pub fn policy(&self) -> Option<JoinPolicy> {
        match self {
            JoinType::Inner => Some(JoinPolicy::Inner),
            JoinType::Outer => Some(JoinPolicy::Outer),
            JoinType::Full => Some(JoinPolicy::Full),
            JoinType::Diff => Some(JoinPolicy::Diff),
            JoinType::Append => None,
        }
    }

    /// Smallest selection the join type accepts
    pub fn min_tables(&self) -> usize {
        match self {
            JoinType::Append => 1,
            _ => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Outer => "outer",
            JoinType::Full => "full",
            JoinType::Diff => "diff",
            JoinType::Append => "append",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized join type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseJoinTypeError(pub String);

impl fmt::Display for ParseJoinTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown join type '{}'", self.0)
    }
}

impl std::error::Error for ParseJoinTypeError {}

impl FromStr for JoinType {
    type Err = ParseJoinTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        JoinType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| ParseJoinTypeError(s.to_string()))
    }
}
