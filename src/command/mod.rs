//! Join command (verb module)
//!
//! The single user-facing action: join the selected tables with a chosen
//! join type. Selection is validated synchronously; the build itself runs
//! through the returned `DerivedTable`.

mod catalog;
mod error;
mod join_type;

pub use catalog::Catalog;
pub use error::SelectionError;
pub use join_type::{JoinType, ParseJoinTypeError};

use std::sync::Arc;
use serde::Deserialize;
use crate::derived::DerivedTable;
use crate::error::ParseError;
use crate::model::{RecordRef, Table};

/// Name the join action is registered under
pub const JOIN_COMMAND: &str = "join-tables";

/// Validate `selected` and create the derived table joining them.
///
/// Nothing is built yet; call `build` or `spawn_build` on the result.
pub fn join_selected<R>(
    selected: Vec<Arc<Table<R>>>,
    join_type: JoinType,
) -> Result<Arc<DerivedTable<R>>, SelectionError>
where
    R: Clone + Send + Sync + 'static,
{
    let derived = DerivedTable::new(selected, join_type)?;
    tracing::debug!(command = JOIN_COMMAND, table = %derived.name(), %join_type, "selection accepted");
    Ok(Arc::new(derived))
}

/// A join request naming catalog tables
///
/// ```yaml
/// tables: [orders, customers]
/// join: inner
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinRequest {
    pub tables: Vec<String>,
    pub join: JoinType,
}

impl JoinRequest {
    pub fn new(tables: impl IntoIterator<Item = impl Into<String>>, join: JoinType) -> Self {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
            join,
        }
    }

    /// Parse a request from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        serde_yaml::from_str(yaml).map_err(ParseError::from)
    }

    /// Resolve the named tables in `catalog` and create the derived table
    pub fn execute(&self, catalog: &Catalog) -> Result<Arc<DerivedTable<RecordRef>>, SelectionError> {
        if self.tables.is_empty() {
            return Err(SelectionError::NoTablesSelected);
        }
        let selected = catalog.select(&self.tables)?;
        join_selected(selected, self.join)
    }
}
