//! Columns of a concatenated table.
//!
//! Every union row remembers the table it came from; output columns resolve
//! per row against that origin table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use crate::model::{Column, ColumnError, DataType, Table, TableId, Value};

/// A row of a concatenated table: the source table and one of its rows
pub struct UnionRow<R> {
    origin: Arc<Table<R>>,
    record: R,
}

impl<R> UnionRow<R> {
    pub fn new(origin: Arc<Table<R>>, record: R) -> Self {
        Self { origin, record }
    }

    pub fn origin(&self) -> &Arc<Table<R>> {
        &self.origin
    }

    pub fn record(&self) -> &R {
        &self.record
    }
}

impl<R: Clone> Clone for UnionRow<R> {
    fn clone(&self) -> Self {
        Self {
            origin: Arc::clone(&self.origin),
            record: self.record.clone(),
        }
    }
}

impl<R> fmt::Debug for UnionRow<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionRow")
            .field("origin", &self.origin.name())
            .finish_non_exhaustive()
    }
}

/// Synthetic column naming each row's source table
#[derive(Debug, Clone)]
pub struct OriginColumn {
    name: String,
}

impl OriginColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<R: Send + Sync> Column<UnionRow<R>> for OriginColumn {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_type(&self) -> DataType {
        DataType::String
    }

    fn value(&self, row: &UnionRow<R>) -> Result<Value, ColumnError> {
        Ok(Value::String(row.origin.name().to_string()))
    }
}

/// An output column resolving, per row, to the same-named column of the
/// row's origin table.
///
/// The mapping is filled while the union is built and frozen afterwards.
#[derive(Debug, Clone)]
pub struct DispatchingColumn {
    name: String,
    data_type: DataType,
    by_table: HashMap<TableId, usize>,
}

impl DispatchingColumn {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            by_table: HashMap::new(),
        }
    }

    /// Map `table` to its column at position `column`.
    ///
    /// Returns the previous position if the table was already mapped.
    pub fn register(&mut self, table: TableId, column: usize) -> Option<usize> {
        self.by_table.insert(table, column)
    }

    /// Position of this column on `table`, if that table has it
    pub fn column_for(&self, table: TableId) -> Option<usize> {
        self.by_table.get(&table).copied()
    }

    /// Number of source tables with this column
    pub fn source_count(&self) -> usize {
        self.by_table.len()
    }
}

impl<R: Send + Sync> Column<UnionRow<R>> for DispatchingColumn {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn value(&self, row: &UnionRow<R>) -> Result<Value, ColumnError> {
        match self.column_for(row.origin.id()) {
            Some(col) => row.origin.value(&row.record, col),
            None => Ok(Value::Null),
        }
    }

    fn display(&self, row: &UnionRow<R>) -> Result<String, ColumnError> {
        match self.column_for(row.origin.id()) {
            Some(col) => row.origin.display(&row.record, col),
            None => Ok(String::new()),
        }
    }

    fn set_value(&self, row: &UnionRow<R>, value: Value) -> Result<(), ColumnError> {
        match self.column_for(row.origin.id()) {
            Some(col) => row.origin.set_value(&row.record, col, value),
            None => Err(ColumnError::NotOnSource {
                column: self.name.clone(),
                table: row.origin.name().to_string(),
            }),
        }
    }
}
