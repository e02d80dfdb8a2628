//! Join planning: index every source, then expand each distinct key into
//! the cross product of its per-source buckets.

use std::collections::HashSet;
use std::sync::Arc;
use itertools::Itertools;
use crate::error::BuildError;
use crate::model::Table;
use crate::task::{BuildContext, BuildPhase};
use super::index::SourceIndex;
use super::key::Key;

/// One candidate output row: a key plus one slot per source.
///
/// `None` is the absence marker: that source has no record with this key.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow<R> {
    key: Key,
    slots: Vec<Option<R>>,
}

impl<R> CombinedRow<R> {
    pub fn new(key: Key, slots: Vec<Option<R>>) -> Self {
        Self { key, slots }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn slots(&self) -> &[Option<R>] {
        &self.slots
    }

    /// Record from source `index`, if that source matched
    pub fn slot(&self, index: usize) -> Option<&R> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// True when every source contributed a record
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Index and record of the first source that matched
    pub fn first_present(&self) -> Option<(usize, &R)> {
        self.slots
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.as_ref().map(|r| (i, r)))
    }
}

/// All combined rows of one key, in cross-product order
#[derive(Debug, Clone)]
pub struct KeyGroup<R> {
    pub key: Key,
    pub rows: Vec<CombinedRow<R>>,
}

/// Key groups in the order keys were first seen
#[derive(Debug, Clone)]
pub struct JoinPlan<R> {
    groups: Vec<KeyGroup<R>>,
}

impl<R> JoinPlan<R> {
    pub fn groups(&self) -> &[KeyGroup<R>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<KeyGroup<R>> {
        self.groups
    }

    pub fn key_count(&self) -> usize {
        self.groups.len()
    }

    /// Total combined rows before filtering
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}

/// Plan the join of `sources`.
///
/// Keys are visited source by source, record by record; the first sighting
/// of a key expands it against every source, so each key is expanded once.
/// Progress runs over `2 × Σ rows`: one pass to index, one to expand.
pub fn plan_join<R: Clone>(sources: &[Arc<Table<R>>], ctx: &BuildContext) -> Result<JoinPlan<R>, BuildError> {
    let total_rows: usize = sources.iter().map(|t| t.row_count()).sum();
    ctx.progress().start(BuildPhase::Planning, total_rows * 2);

    let mut indexes = Vec::with_capacity(sources.len());
    for table in sources {
        indexes.push(SourceIndex::build(table, ctx)?);
    }

    let mut seen: HashSet<Key> = HashSet::new();
    let mut groups = Vec::new();

    for index in &indexes {
        for key in index.row_keys() {
            if seen.insert(key.clone()) {
                let rows = expand_key(key, &indexes);
                groups.push(KeyGroup {
                    key: key.clone(),
                    rows,
                });
            }
            ctx.checkpoint()?;
        }
    }

    let plan = JoinPlan { groups };
    tracing::debug!(
        keys = plan.key_count(),
        combined_rows = plan.row_count(),
        "join keys expanded"
    );
    Ok(plan)
}

/// Cross product, in source order, of each source's bucket for `key`
fn expand_key<R: Clone>(key: &Key, indexes: &[SourceIndex<R>]) -> Vec<CombinedRow<R>> {
    indexes
        .iter()
        .map(|index| match index.get(key) {
            Some(bucket) => bucket.iter().cloned().map(Some).collect::<Vec<_>>(),
            None => vec![None],
        })
        .multi_cartesian_product()
        .map(|slots| CombinedRow::new(key.clone(), slots))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataType, FieldColumn, Record, RecordRef, Value};

    fn table(name: &str, rows: &[(i64, &str)]) -> Arc<Table<RecordRef>> {
        Arc::new(
            Table::builder(name)
                .key_column(Arc::new(FieldColumn::new("id", 0, DataType::Int)))
                .column(Arc::new(FieldColumn::new("v", 1, DataType::String)))
                .rows(
                    rows.iter()
                        .map(|(id, v)| Record::new(vec![Value::Int(*id), Value::from(*v)])),
                )
                .build(),
        )
    }

    fn values(row: &CombinedRow<RecordRef>) -> Vec<Option<Value>> {
        row.slots()
            .iter()
            .map(|s| s.as_ref().and_then(|r| r.get(1)))
            .collect()
    }

    #[test]
    fn test_keys_expand_in_first_seen_order() {
        let a = table("a", &[(2, "a2"), (1, "a1")]);
        let b = table("b", &[(3, "b3"), (1, "b1")]);
        let plan = plan_join(&[a, b], &BuildContext::detached()).unwrap();

        let keys: Vec<String> = plan.groups().iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["(2)", "(1)", "(3)"]);
        assert_eq!(plan.row_count(), 3);
    }

    #[test]
    fn test_duplicate_keys_multiply_in_product_order() {
        let a = table("a", &[(1, "x"), (1, "y")]);
        let b = table("b", &[(1, "p"), (1, "q"), (2, "r")]);
        let plan = plan_join(&[a, b], &BuildContext::detached()).unwrap();

        let first = &plan.groups()[0];
        let rows: Vec<_> = first.rows.iter().map(values).collect();
        let s = |v: &str| Some(Value::from(v));
        assert_eq!(
            rows,
            vec![
                vec![s("x"), s("p")],
                vec![s("x"), s("q")],
                vec![s("y"), s("p")],
                vec![s("y"), s("q")],
            ]
        );
        assert_eq!(plan.groups()[1].rows.len(), 1);
        assert!(!plan.groups()[1].rows[0].is_complete());
        assert_eq!(plan.groups()[1].rows[0].first_present().map(|(i, _)| i), Some(1));
    }

    #[test]
    fn test_progress_covers_both_passes() {
        let ctx = BuildContext::detached();
        let a = table("a", &[(1, "x"), (2, "y")]);
        let b = table("b", &[(2, "z")]);
        plan_join(&[a, b], &ctx).unwrap();

        let progress = ctx.progress().snapshot();
        assert_eq!(progress.phase, BuildPhase::Planning);
        assert_eq!((progress.completed, progress.total), (6, 6));
    }
}
