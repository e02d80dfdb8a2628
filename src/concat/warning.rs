//! Column-name collision diagnostics

use std::fmt;

/// Where the repeated column name was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// A later source reuses a name registered by an earlier source
    AcrossSources,
    /// One source has several columns with the same name
    WithinSource,
    /// A source column uses the origin column's name and is renamed
    /// `<table>_<column>`
    Reserved,
}

/// Non-fatal notice that several source columns share one output column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollisionWarning {
    pub column: String,
    /// Table that registered the name first
    pub first_table: String,
    /// Table whose column collided
    pub table: String,
    pub kind: CollisionKind,
}

impl fmt::Display for NameCollisionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CollisionKind::AcrossSources => write!(
                f,
                "column \"{}\" of {} merged with the one from {}",
                self.column, self.table, self.first_table
            ),
            CollisionKind::WithinSource => write!(
                f,
                "{} has multiple columns named \"{}\"",
                self.table, self.column
            ),
            CollisionKind::Reserved => write!(
                f,
                "column \"{}\" of {} is reserved, shown as \"{}_{}\"",
                self.column, self.table, self.table, self.column
            ),
        }
    }
}
