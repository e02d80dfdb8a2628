//! Assemble a joined table from planned, filtered rows

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use crate::error::BuildError;
use crate::model::{Table, TableBuilder};
use crate::task::BuildContext;
use super::columns::{KeyColumn, SubrowColumn};
use super::filter::{filter_join, JoinPolicy};
use super::plan::{plan_join, CombinedRow};

/// Name of a joined table: source names joined by `+`
pub fn joined_name<R>(sources: &[Arc<Table<R>>]) -> String {
    sources.iter().map(|t| t.name()).collect::<Vec<_>>().join("+")
}

/// Build the joined table of `sources` under `policy`.
///
/// Output columns are the first source's key columns, then each source's
/// visible non-key columns in source order. A name used more than once among
/// them is qualified as `<table>_<column>`. The output's key columns are its
/// own keys, so the result can itself be joined.
pub fn build_joined_table<R>(
    sources: &[Arc<Table<R>>],
    policy: JoinPolicy,
    ctx: &BuildContext,
) -> Result<Table<CombinedRow<R>>, BuildError>
where
    R: Clone + Send + Sync + 'static,
{
    let name = joined_name(sources);
    check_key_arity(sources)?;
    let key_arity = sources.first().map_or(0, |t| t.key_columns().len());
    if key_arity == 0 {
        tracing::warn!(table = %name, "sources have no key columns; every record shares one key");
    }
    tracing::info!(table = %name, %policy, sources = sources.len(), "join build started");

    let plan = plan_join(sources, ctx)?;
    let rows = filter_join(policy, plan, ctx)?;

    let mut builder: TableBuilder<CombinedRow<R>> = Table::builder(name.as_str());
    if let Some(first) = sources.first() {
        for (position, &col) in first.key_columns().iter().enumerate() {
            if let Some(key_col) = first.column(col) {
                builder = builder.key_column(Arc::new(KeyColumn::new(
                    key_col.name(),
                    key_col.data_type(),
                    position,
                    sources.to_vec(),
                )));
            }
        }
    }
    for (slot, source, col, column_name) in register_columns(sources) {
        builder = builder.column(Arc::new(SubrowColumn::new(
            column_name,
            slot,
            Arc::clone(source),
            col,
        )));
    }

    let table = builder.rows(rows).build();
    tracing::info!(table = %name, rows = table.row_count(), "join build finished");
    Ok(table)
}

fn check_key_arity<R>(sources: &[Arc<Table<R>>]) -> Result<(), BuildError> {
    let Some(first) = sources.first() else {
        return Ok(());
    };
    let expected = first.key_columns().len();
    for table in &sources[1..] {
        let found = table.key_columns().len();
        if found != expected {
            return Err(BuildError::KeyArity {
                table: table.name().to_string(),
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Non-key output columns as `(slot, source, column, output name)`
fn register_columns<R>(sources: &[Arc<Table<R>>]) -> Vec<(usize, &Arc<Table<R>>, usize, String)> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut uses: HashMap<&str, usize> = HashMap::new();

    if let Some(first) = sources.first() {
        for &col in first.key_columns() {
            if let Some(c) = first.column(col) {
                taken.insert(c.name().to_string());
                *uses.entry(c.name()).or_default() += 1;
            }
        }
    }
    for source in sources {
        for col in source.non_key_visible_columns() {
            if let Some(c) = source.column(col) {
                *uses.entry(c.name()).or_default() += 1;
            }
        }
    }

    let mut registered = Vec::new();
    for (slot, source) in sources.iter().enumerate() {
        for col in source.non_key_visible_columns() {
            let Some(c) = source.column(col) else { continue };
            let base = if uses.get(c.name()).copied().unwrap_or(0) > 1 {
                format!("{}_{}", source.name(), c.name())
            } else {
                c.name().to_string()
            };
            let mut candidate = base.clone();
            let mut n = 2;
            while taken.contains(&candidate) {
                candidate = format!("{}_{}", base, n);
                n += 1;
            }
            taken.insert(candidate.clone());
            registered.push((slot, source, col, candidate));
        }
    }
    registered
}
