//! Derived tables
//!
//! A `DerivedTable` is created from a validated selection and a join type.
//! Its content is produced by a build, run either on the caller's thread or
//! in the background, and becomes visible only once a build completes. At
//! most one build is in flight: starting a new one cancels the previous, and
//! a superseded build never publishes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::{Mutex, RwLock};
use crate::command::{JoinType, SelectionError};
use crate::concat::{concat_name, concat_tables, ConcatOutput, NameCollisionWarning, UnionRow};
use crate::error::BuildError;
use crate::join::{build_joined_table, joined_name, CombinedRow, JoinPolicy};
use crate::model::{ColumnError, Table, Value};
use crate::task::{BuildContext, BuildTask, CancelHandle};

/// What a derived table is built from
#[derive(Debug)]
pub enum DerivedSpec<R> {
    Join {
        sources: Vec<Arc<Table<R>>>,
        policy: JoinPolicy,
    },
    Concat {
        sources: Vec<Arc<Table<R>>>,
    },
}

impl<R> DerivedSpec<R>
where
    R: Clone + Send + Sync + 'static,
{
    pub fn sources(&self) -> &[Arc<Table<R>>] {
        match self {
            DerivedSpec::Join { sources, .. } | DerivedSpec::Concat { sources } => sources,
        }
    }

    /// Run the build described by this spec
    pub fn build(&self, ctx: &BuildContext) -> Result<DerivedOutput<R>, BuildError> {
        match self {
            DerivedSpec::Join { sources, policy } => {
                build_joined_table(sources, *policy, ctx).map(DerivedOutput::Joined)
            }
            DerivedSpec::Concat { sources } => {
                concat_tables(sources, ctx).map(DerivedOutput::Concatenated)
            }
        }
    }
}

/// Published content of a derived table
#[derive(Debug)]
pub enum DerivedOutput<R> {
    Joined(Table<CombinedRow<R>>),
    Concatenated(ConcatOutput<R>),
}

impl<R> DerivedOutput<R> {
    pub fn name(&self) -> &str {
        match self {
            DerivedOutput::Joined(t) => t.name(),
            DerivedOutput::Concatenated(c) => c.table.name(),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            DerivedOutput::Joined(t) => t.row_count(),
            DerivedOutput::Concatenated(c) => c.table.row_count(),
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        match self {
            DerivedOutput::Joined(t) => t.column_names(),
            DerivedOutput::Concatenated(c) => c.table.column_names(),
        }
    }

    /// Name collisions met while building; always empty for joins
    pub fn warnings(&self) -> &[NameCollisionWarning] {
        match self {
            DerivedOutput::Joined(_) => &[],
            DerivedOutput::Concatenated(c) => &c.warnings,
        }
    }

    pub fn as_joined(&self) -> Option<&Table<CombinedRow<R>>> {
        match self {
            DerivedOutput::Joined(t) => Some(t),
            DerivedOutput::Concatenated(_) => None,
        }
    }

    pub fn as_concatenated(&self) -> Option<&Table<UnionRow<R>>> {
        match self {
            DerivedOutput::Joined(_) => None,
            DerivedOutput::Concatenated(c) => Some(&c.table),
        }
    }

    /// Value of the named column on the row at `row_index`
    pub fn cell(&self, row_index: usize, column: &str) -> Result<Value, ColumnError> {
        match self {
            DerivedOutput::Joined(t) => t.cell(row_index, column),
            DerivedOutput::Concatenated(c) => c.table.cell(row_index, column),
        }
    }

    /// Display strings of the named column, one per row
    pub fn column_display(&self, column: &str) -> Result<Vec<String>, ColumnError> {
        match self {
            DerivedOutput::Joined(t) => t.column_display(column),
            DerivedOutput::Concatenated(c) => c.table.column_display(column),
        }
    }
}

/// A table derived from other tables by a join or a concatenation
#[derive(Debug)]
pub struct DerivedTable<R> {
    name: String,
    join_type: JoinType,
    spec: DerivedSpec<R>,
    published: RwLock<Option<Arc<DerivedOutput<R>>>>,
    /// Bumped by every build; only the build holding the latest value publishes
    generation: AtomicU64,
    in_flight: Mutex<Option<CancelHandle>>,
}

impl<R> DerivedTable<R>
where
    R: Clone + Send + Sync + 'static,
{
    /// Validate the selection and create an unbuilt derived table.
    ///
    /// Fails on an empty selection, on a single table for a key join, and
    /// when the sources of a key join disagree on their key column count.
    pub fn new(sources: Vec<Arc<Table<R>>>, join_type: JoinType) -> Result<Self, SelectionError> {
        if sources.is_empty() {
            return Err(SelectionError::NoTablesSelected);
        }
        if sources.len() < join_type.min_tables() {
            return Err(SelectionError::TooFewTables {
                join_type,
                selected: sources.len(),
            });
        }

        let spec = match join_type.policy() {
            Some(policy) => {
                check_key_arity(&sources)?;
                DerivedSpec::Join { sources, policy }
            }
            None => DerivedSpec::Concat { sources },
        };
        let name = match &spec {
            DerivedSpec::Join { sources, .. } => joined_name(sources),
            DerivedSpec::Concat { sources } => concat_name(sources),
        };

        Ok(Self {
            name,
            join_type,
            spec,
            published: RwLock::new(None),
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn spec(&self) -> &DerivedSpec<R> {
        &self.spec
    }

    /// Last published content, if any build has completed
    pub fn output(&self) -> Option<Arc<DerivedOutput<R>>> {
        self.published.read().clone()
    }

    pub fn is_built(&self) -> bool {
        self.published.read().is_some()
    }

    /// Build on the current thread and publish the result.
    ///
    /// Cancels any background build still in flight.
    pub fn build(&self) -> Result<Arc<DerivedOutput<R>>, BuildError> {
        let generation = {
            let mut in_flight = self.in_flight.lock();
            if let Some(previous) = in_flight.take() {
                previous.cancel();
            }
            self.next_generation()
        };
        self.build_with(generation, &BuildContext::detached())
    }

    /// Start a background build, superseding any build still in flight.
    ///
    /// Needs a running Tokio runtime.
    pub fn spawn_build(self: &Arc<Self>) -> Result<BuildTask<Arc<DerivedOutput<R>>>, BuildError> {
        let mut in_flight = self.in_flight.lock();
        let generation = self.next_generation();
        let this = Arc::clone(self);
        let task = BuildTask::spawn(move |ctx| this.build_with(generation, ctx))?;

        if let Some(previous) = in_flight.replace(task.cancel_handle()) {
            tracing::debug!(table = %self.name, "superseding in-flight build");
            previous.cancel();
        }
        Ok(task)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn build_with(&self, generation: u64, ctx: &BuildContext) -> Result<Arc<DerivedOutput<R>>, BuildError> {
        let output = Arc::new(self.spec.build(ctx)?);

        let mut published = self.published.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(table = %self.name, generation, "discarding superseded build");
            return Err(BuildError::Cancelled);
        }
        *published = Some(Arc::clone(&output));
        Ok(output)
    }
}

fn check_key_arity<R>(sources: &[Arc<Table<R>>]) -> Result<(), SelectionError> {
    let Some(first) = sources.first() else {
        return Ok(());
    };
    let expected = first.key_columns().len();
    match sources[1..].iter().find(|t| t.key_columns().len() != expected) {
        Some(table) => Err(SelectionError::KeyArityMismatch {
            table: table.name().to_string(),
            expected,
            found: table.key_columns().len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataType, FieldColumn, Record, RecordRef};

    fn keyed(name: &str, keys: usize) -> Arc<Table<RecordRef>> {
        let mut builder = Table::<RecordRef>::builder(name);
        for i in 0..keys {
            builder = builder.key_column(Arc::new(FieldColumn::new(format!("k{}", i), i, DataType::Int)));
        }
        let cells = (0..keys as i64).map(Value::Int).collect();
        Arc::new(builder.row(Record::new(cells)).build())
    }

    #[test]
    fn test_selection_rules() {
        let a = keyed("A", 1);
        assert_eq!(
            DerivedTable::new(Vec::<Arc<Table<RecordRef>>>::new(), JoinType::Append).unwrap_err(),
            SelectionError::NoTablesSelected
        );
        assert_eq!(
            DerivedTable::new(vec![a.clone()], JoinType::Inner).unwrap_err(),
            SelectionError::TooFewTables { join_type: JoinType::Inner, selected: 1 }
        );
        assert!(DerivedTable::new(vec![a], JoinType::Append).is_ok());
    }

    #[test]
    fn test_key_arity_checked_for_joins_only() {
        let a = keyed("A", 1);
        let b = keyed("B", 2);
        let err = DerivedTable::new(vec![a.clone(), b.clone()], JoinType::Full).unwrap_err();
        assert_eq!(
            err,
            SelectionError::KeyArityMismatch { table: "B".into(), expected: 1, found: 2 }
        );
        assert!(DerivedTable::new(vec![a, b], JoinType::Append).is_ok());
    }

    #[test]
    fn test_build_publishes() {
        let a = keyed("A", 1);
        let derived = DerivedTable::new(vec![a.clone(), a], JoinType::Inner).unwrap();
        assert_eq!(derived.name(), "A+A");
        assert!(derived.output().is_none());

        let output = derived.build().unwrap();
        assert_eq!(output.row_count(), 1);
        assert!(Arc::ptr_eq(&output, &derived.output().unwrap()));
    }
}
