//! Column capability trait and the stored-field column

use std::fmt;
use super::error::ColumnError;
use super::record::RecordRef;
use super::types::{DataType, Value};

/// A column over rows of type `R`.
///
/// Columns expose three capabilities: a typed value, the canonical display
/// string (used for join keys), and an optional write.
pub trait Column<R>: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn data_type(&self) -> DataType;

    /// Typed value of this column for `row`
    fn value(&self, row: &R) -> Result<Value, ColumnError>;

    /// Write `value` into `row`
    fn set_value(&self, _row: &R, _value: Value) -> Result<(), ColumnError> {
        Err(ColumnError::ReadOnly {
            column: self.name().to_string(),
        })
    }

    /// Canonical display string for `row`
    fn display(&self, row: &R) -> Result<String, ColumnError> {
        let value = self.value(row)?;
        self.data_type()
            .format(&value)
            .map_err(|source| ColumnError::TypeMismatch {
                column: self.name().to_string(),
                source,
            })
    }
}

/// A column reading one stored cell of a record
#[derive(Debug, Clone)]
pub struct FieldColumn {
    name: String,
    index: usize,
    data_type: DataType,
}

impl FieldColumn {
    pub fn new(name: impl Into<String>, index: usize, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            index,
            data_type,
        }
    }

    /// Position of the cell inside each record
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Column<RecordRef> for FieldColumn {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn value(&self, row: &RecordRef) -> Result<Value, ColumnError> {
        row.get(self.index).ok_or_else(|| ColumnError::MissingCell {
            column: self.name.clone(),
            index: self.index,
        })
    }

    fn set_value(&self, row: &RecordRef, value: Value) -> Result<(), ColumnError> {
        let value = self
            .data_type
            .coerce(value)
            .map_err(|source| ColumnError::TypeMismatch {
                column: self.name.clone(),
                source,
            })?;
        if row.set(self.index, value) {
            Ok(())
        } else {
            Err(ColumnError::MissingCell {
                column: self.name.clone(),
                index: self.index,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_field_column_reads_and_writes_through_record() {
        let col = FieldColumn::new("qty", 1, DataType::Int);
        let rec = Record::new(vec![Value::from("a"), Value::Int(3)]);

        assert_eq!(col.value(&rec).unwrap(), Value::Int(3));
        col.set_value(&rec, Value::from("7")).unwrap();
        assert_eq!(rec.get(1), Some(Value::Int(7)));
        assert_eq!(col.display(&rec).unwrap(), "7");
    }

    #[test]
    fn test_field_column_missing_cell() {
        let col = FieldColumn::new("qty", 4, DataType::Int);
        let rec = Record::new(vec![Value::Int(1)]);
        assert!(matches!(col.display(&rec), Err(ColumnError::MissingCell { index: 4, .. })));
    }

    #[test]
    fn test_field_column_rejects_bad_write() {
        let col = FieldColumn::new("qty", 0, DataType::Int);
        let rec = Record::new(vec![Value::Int(1)]);
        let err = col.set_value(&rec, Value::from("many")).unwrap_err();
        assert!(matches!(err, ColumnError::TypeMismatch { .. }));

        let err = col.set_value(&rec, Value::Float(1e20)).unwrap_err();
        assert!(matches!(err, ColumnError::TypeMismatch { .. }));
        assert_eq!(rec.get(0), Some(Value::Int(1)));
    }
}
