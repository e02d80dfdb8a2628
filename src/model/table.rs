//! Tables: ordered rows plus ordered columns

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use super::column::Column;
use super::error::ColumnError;
use super::formula::ComputedColumn;
use super::types::{DataType, Value};

/// Formula references deeper than this are treated as cycles
const MAX_FORMULA_DEPTH: usize = 32;

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u64);

impl TableId {
    fn next() -> Self {
        TableId(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How a table column produces its values
#[derive(Debug)]
pub enum ColumnKind<R> {
    /// Plain accessor over the row
    Accessor(Arc<dyn Column<R>>),
    /// Formula over other columns of the same table
    Computed(Arc<ComputedColumn>),
}

impl<R> Clone for ColumnKind<R> {
    fn clone(&self) -> Self {
        match self {
            ColumnKind::Accessor(c) => ColumnKind::Accessor(Arc::clone(c)),
            ColumnKind::Computed(c) => ColumnKind::Computed(Arc::clone(c)),
        }
    }
}

/// A column as attached to a table
#[derive(Debug)]
pub struct TableColumn<R> {
    pub kind: ColumnKind<R>,
    pub hidden: bool,
}

impl<R> Clone for TableColumn<R> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            hidden: self.hidden,
        }
    }
}

impl<R> TableColumn<R> {
    pub fn name(&self) -> &str {
        match &self.kind {
            ColumnKind::Accessor(c) => c.name(),
            ColumnKind::Computed(c) => &c.name,
        }
    }

    pub fn data_type(&self) -> DataType {
        match &self.kind {
            ColumnKind::Accessor(c) => c.data_type(),
            ColumnKind::Computed(c) => c.data_type,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.kind, ColumnKind::Computed(_))
    }
}

/// An ordered collection of rows with an ordered column list.
///
/// `R` is the row type: `RecordRef` for source tables, combined rows for
/// joins, origin-tagged rows for unions.
pub struct Table<R> {
    id: TableId,
    name: String,
    columns: Vec<TableColumn<R>>,
    keys: Vec<usize>,
    rows: Vec<R>,
}

impl<R> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("columns", &self.columns.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("keys", &self.keys)
            .field("rows", &self.rows.len())
            .finish()
    }
}

impl<R> Table<R> {
    pub fn builder(name: impl Into<String>) -> TableBuilder<R> {
        TableBuilder::new(name)
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    pub fn columns(&self) -> &[TableColumn<R>] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&TableColumn<R>> {
        self.columns.get(index)
    }

    /// Position of the first column named `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Positions of the key columns, in key order
    pub fn key_columns(&self) -> &[usize] {
        &self.keys
    }

    pub fn is_key(&self, index: usize) -> bool {
        self.keys.contains(&index)
    }

    /// Positions of all columns that are not hidden
    pub fn visible_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&i| !self.columns[i].hidden)
            .collect()
    }

    /// Positions of visible columns that are not keys
    pub fn non_key_visible_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&i| !self.columns[i].hidden && !self.is_key(i))
            .collect()
    }

    /// Typed value of column `col` for `row`
    pub fn value(&self, row: &R, col: usize) -> Result<Value, ColumnError> {
        self.value_at_depth(row, col, 0)
    }

    /// Typed value of the column named `name` for `row`
    pub fn value_by_name(&self, row: &R, name: &str) -> Result<Value, ColumnError> {
        let col = self.require_column(name)?;
        self.value(row, col)
    }

    /// Canonical display string of column `col` for `row`
    pub fn display(&self, row: &R, col: usize) -> Result<String, ColumnError> {
        match &self.column_at(col)?.kind {
            ColumnKind::Accessor(c) => c.display(row),
            ColumnKind::Computed(c) => {
                let value = self.value(row, col)?;
                c.data_type
                    .format(&value)
                    .map_err(|source| ColumnError::TypeMismatch {
                        column: c.name.clone(),
                        source,
                    })
            }
        }
    }

    /// Write `value` into `row` through column `col`
    pub fn set_value(&self, row: &R, col: usize, value: Value) -> Result<(), ColumnError> {
        match &self.column_at(col)?.kind {
            ColumnKind::Accessor(c) => c.set_value(row, value),
            ColumnKind::Computed(c) => Err(ColumnError::ReadOnly {
                column: c.name.clone(),
            }),
        }
    }

    /// Value of the named column on the row at `row_index`
    pub fn cell(&self, row_index: usize, name: &str) -> Result<Value, ColumnError> {
        let row = self.rows.get(row_index).ok_or_else(|| ColumnError::NoSuchColumn {
            table: self.name.clone(),
            column: format!("{} (row {} out of range)", name, row_index),
        })?;
        self.value_by_name(row, name)
    }

    /// Display strings of the named column, one per row
    pub fn column_display(&self, name: &str) -> Result<Vec<String>, ColumnError> {
        let col = self.require_column(name)?;
        self.rows.iter().map(|row| self.display(row, col)).collect()
    }

    fn value_at_depth(&self, row: &R, col: usize, depth: usize) -> Result<Value, ColumnError> {
        match &self.column_at(col)?.kind {
            ColumnKind::Accessor(c) => c.value(row),
            ColumnKind::Computed(c) => {
                if depth >= MAX_FORMULA_DEPTH {
                    return Err(ColumnError::FormulaDepth {
                        column: c.name.clone(),
                    });
                }
                c.evaluate(&|name: &str| {
                    let referenced = self.require_column(name)?;
                    self.value_at_depth(row, referenced, depth + 1)
                })
            }
        }
    }

    fn column_at(&self, col: usize) -> Result<&TableColumn<R>, ColumnError> {
        self.columns.get(col).ok_or_else(|| ColumnError::NoSuchColumn {
            table: self.name.clone(),
            column: format!("#{}", col),
        })
    }

    fn require_column(&self, name: &str) -> Result<usize, ColumnError> {
        self.column_index(name).ok_or_else(|| ColumnError::NoSuchColumn {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }
}

/// Incremental constructor for `Table`
pub struct TableBuilder<R> {
    name: String,
    columns: Vec<TableColumn<R>>,
    keys: Vec<usize>,
    rows: Vec<R>,
}

impl<R> TableBuilder<R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            keys: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a plain accessor column
    pub fn column(mut self, column: Arc<dyn Column<R>>) -> Self {
        self.columns.push(TableColumn {
            kind: ColumnKind::Accessor(column),
            hidden: false,
        });
        self
    }

    /// Append an accessor column and designate it as the next key column
    pub fn key_column(mut self, column: Arc<dyn Column<R>>) -> Self {
        self.keys.push(self.columns.len());
        self.column(column)
    }

    /// Append a computed column
    pub fn computed(mut self, column: Arc<ComputedColumn>) -> Self {
        self.columns.push(TableColumn {
            kind: ColumnKind::Computed(column),
            hidden: false,
        });
        self
    }

    /// Append a prepared column as-is
    pub fn table_column(mut self, column: TableColumn<R>) -> Self {
        self.columns.push(column);
        self
    }

    /// Hide the most recently added column
    pub fn hidden(mut self) -> Self {
        if let Some(last) = self.columns.last_mut() {
            last.hidden = true;
        }
        self
    }

    /// Designate the most recently added column as the next key column
    pub fn as_key(mut self) -> Self {
        if !self.columns.is_empty() {
            let last = self.columns.len() - 1;
            if !self.keys.contains(&last) {
                self.keys.push(last);
            }
        }
        self
    }

    pub fn row(mut self, row: R) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = R>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn build(self) -> Table<R> {
        Table {
            id: TableId::next(),
            name: self.name,
            columns: self.columns,
            keys: self.keys,
            rows: self.rows,
        }
    }
}
