//! Columns of a joined table.
//!
//! Each column reads through a combined row into the record of one source,
//! using that source's own column, so values and writes reach the original
//! records.

use std::fmt;
use std::sync::Arc;
use crate::model::{Column, ColumnError, DataType, Table, Value};
use super::plan::CombinedRow;

/// Key column of a joined table.
///
/// Displays the key part itself; the typed value comes from the first source
/// that matched the row.
pub struct KeyColumn<R> {
    name: String,
    data_type: DataType,
    position: usize,
    sources: Vec<Arc<Table<R>>>,
}

impl<R> KeyColumn<R> {
    /// Key column for part `position` of the key, reading source key columns
    pub fn new(name: impl Into<String>, data_type: DataType, position: usize, sources: Vec<Arc<Table<R>>>) -> Self {
        Self {
            name: name.into(),
            data_type,
            position,
            sources,
        }
    }
}

impl<R> fmt::Debug for KeyColumn<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyColumn")
            .field("name", &self.name)
            .field("position", &self.position)
            .finish()
    }
}

impl<R: Send + Sync> Column<CombinedRow<R>> for KeyColumn<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn value(&self, row: &CombinedRow<R>) -> Result<Value, ColumnError> {
        let Some((slot, record)) = row.first_present() else {
            return Ok(Value::Null);
        };
        let Some(source) = self.sources.get(slot) else {
            return Ok(Value::Null);
        };
        match source.key_columns().get(self.position) {
            Some(&col) => source.value(record, col),
            None => Ok(Value::Null),
        }
    }

    fn display(&self, row: &CombinedRow<R>) -> Result<String, ColumnError> {
        Ok(row.key().part(self.position).unwrap_or_default().to_string())
    }
}

/// A source column seen through slot `slot` of each combined row
pub struct SubrowColumn<R> {
    name: String,
    data_type: DataType,
    slot: usize,
    source: Arc<Table<R>>,
    column: usize,
}

impl<R> SubrowColumn<R> {
    pub fn new(name: impl Into<String>, slot: usize, source: Arc<Table<R>>, column: usize) -> Self {
        let data_type = source
            .column(column)
            .map(|c| c.data_type())
            .unwrap_or_default();
        Self {
            name: name.into(),
            data_type,
            slot,
            source,
            column,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn source(&self) -> &Arc<Table<R>> {
        &self.source
    }
}

impl<R> fmt::Debug for SubrowColumn<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubrowColumn")
            .field("name", &self.name)
            .field("slot", &self.slot)
            .field("source", &self.source.name())
            .field("column", &self.column)
            .finish()
    }
}

impl<R: Send + Sync> Column<CombinedRow<R>> for SubrowColumn<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn value(&self, row: &CombinedRow<R>) -> Result<Value, ColumnError> {
        match row.slot(self.slot) {
            Some(record) => self.source.value(record, self.column),
            None => Ok(Value::Null),
        }
    }

    fn display(&self, row: &CombinedRow<R>) -> Result<String, ColumnError> {
        match row.slot(self.slot) {
            Some(record) => self.source.display(record, self.column),
            None => Ok(String::new()),
        }
    }

    fn set_value(&self, row: &CombinedRow<R>, value: Value) -> Result<(), ColumnError> {
        match row.slot(self.slot) {
            Some(record) => self.source.set_value(record, self.column, value),
            None => Err(ColumnError::AbsentRecord {
                column: self.name.clone(),
                table: self.source.name().to_string(),
            }),
        }
    }
}
