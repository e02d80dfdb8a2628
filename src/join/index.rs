//! Per-source key index

use std::collections::HashMap;
use crate::error::BuildError;
use crate::model::Table;
use crate::task::BuildContext;
use super::key::{extract_key, Key};

/// Records of one source grouped by key.
///
/// Buckets keep source row order. The index is a snapshot; it is not
/// maintained when the source changes afterwards.
#[derive(Debug)]
pub struct SourceIndex<R> {
    buckets: HashMap<Key, Vec<R>>,
    row_keys: Vec<Key>,
}

impl<R: Clone> SourceIndex<R> {
    /// Index every record of `table`, one checkpoint per record.
    pub fn build(table: &Table<R>, ctx: &BuildContext) -> Result<Self, BuildError> {
        let mut buckets: HashMap<Key, Vec<R>> = HashMap::new();
        let mut row_keys = Vec::with_capacity(table.row_count());

        for (i, row) in table.rows().iter().enumerate() {
            let key = extract_key(table, row, i)?;
            buckets.entry(key.clone()).or_default().push(row.clone());
            row_keys.push(key);
            ctx.checkpoint()?;
        }

        tracing::debug!(
            table = table.name(),
            rows = row_keys.len(),
            keys = buckets.len(),
            "source indexed"
        );
        Ok(Self { buckets, row_keys })
    }
}

impl<R> SourceIndex<R> {
    /// Records sharing `key`, in source order
    pub fn get(&self, key: &Key) -> Option<&[R]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn bucket_size(&self, key: &Key) -> usize {
        self.buckets.get(key).map_or(0, Vec::len)
    }

    /// Key of every source row, by row position
    pub fn row_keys(&self) -> &[Key] {
        &self.row_keys
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::model::{DataType, FieldColumn, Record, RecordRef, Value};

    #[test]
    fn test_buckets_preserve_row_order() {
        let t: Table<RecordRef> = Table::builder("t")
            .key_column(Arc::new(FieldColumn::new("k", 0, DataType::String)))
            .column(Arc::new(FieldColumn::new("n", 1, DataType::Int)))
            .rows(
                [("a", 1), ("b", 2), ("a", 3)]
                    .into_iter()
                    .map(|(k, n)| Record::new(vec![Value::from(k), Value::Int(n)])),
            )
            .build();

        let index = SourceIndex::build(&t, &BuildContext::detached()).unwrap();
        let a: Key = ["a"].into_iter().collect();
        let bucket: Vec<Value> = index
            .get(&a)
            .unwrap()
            .iter()
            .map(|r| r.get(1).unwrap())
            .collect();

        assert_eq!(bucket, vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(index.key_count(), 2);
        assert_eq!(index.bucket_size(&["zz"].into_iter().collect()), 0);
        assert_eq!(index.row_keys()[1], ["b"].into_iter().collect::<Key>());
    }
}
