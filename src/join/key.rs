//! Join keys

use std::fmt;
use crate::error::BuildError;
use crate::model::Table;

/// Tuple of display strings, one per key column.
///
/// Two records share a key iff their tuples are equal as strings, so an int
/// `2` and a string `"2"` match while a float `2.00` does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Key(Vec<String>);

impl Key {
    pub fn new(parts: Vec<String>) -> Self {
        Key(parts)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn part(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Key {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Key(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Compute the key of `row` (at `row_index` in `table`) from the table's key columns.
pub fn extract_key<R>(table: &Table<R>, row: &R, row_index: usize) -> Result<Key, BuildError> {
    table
        .key_columns()
        .iter()
        .map(|&col| {
            table
                .display(row, col)
                .map_err(|source| BuildError::KeyComputation {
                    table: table.name().to_string(),
                    row: row_index,
                    column: table
                        .column(col)
                        .map(|c| c.name().to_string())
                        .unwrap_or_default(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::model::{DataType, FieldColumn, Record, RecordRef, Value};

    fn table(id_type: DataType, ids: Vec<Value>) -> Table<RecordRef> {
        Table::builder("t")
            .key_column(Arc::new(FieldColumn::new("id", 0, id_type)))
            .key_column(Arc::new(FieldColumn::new("region", 1, DataType::String)))
            .rows(ids.into_iter().map(|id| Record::new(vec![id, Value::from("eu")])))
            .build()
    }

    #[test]
    fn test_key_uses_display_strings_in_key_order() {
        let t = table(DataType::Int, vec![Value::Int(7)]);
        let key = extract_key(&t, t.row(0).unwrap(), 0).unwrap();
        assert_eq!(key, ["7", "eu"].into_iter().collect::<Key>());
        assert_eq!(key.to_string(), "(7, eu)");
    }

    #[test]
    fn test_equal_display_means_equal_key_across_types() {
        let ints = table(DataType::Int, vec![Value::Int(2)]);
        let strings = table(DataType::String, vec![Value::from("2")]);
        let floats = table(DataType::Float, vec![Value::Float(2.0)]);

        let a = extract_key(&ints, ints.row(0).unwrap(), 0).unwrap();
        let b = extract_key(&strings, strings.row(0).unwrap(), 0).unwrap();
        let c = extract_key(&floats, floats.row(0).unwrap(), 0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_key_failure_carries_context() {
        let t = table(DataType::Int, vec![Value::Int(1), Value::from("x")]);
        let err = extract_key(&t, t.row(1).unwrap(), 1).unwrap_err();
        match err {
            BuildError::KeyComputation { table, row, column, .. } => {
                assert_eq!((table.as_str(), row, column.as_str()), ("t", 1, "id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
