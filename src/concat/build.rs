//! Row-wise concatenation of tables

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use crate::error::BuildError;
use crate::model::{ColumnKind, ComputedColumn, Table, TableBuilder, TableColumn, TableId};
use crate::task::{BuildContext, BuildPhase};
use super::dispatch::{DispatchingColumn, OriginColumn, UnionRow};
use super::warning::{CollisionKind, NameCollisionWarning};

/// Name of the synthetic column naming each row's source
pub const ORIGIN_COLUMN: &str = "origin";

/// A concatenated table plus the name collisions met while building it
#[derive(Debug)]
pub struct ConcatOutput<R> {
    pub table: Table<UnionRow<R>>,
    pub warnings: Vec<NameCollisionWarning>,
}

/// Name of a concatenated table: source names joined by `&`
pub fn concat_name<R>(sources: &[Arc<Table<R>>]) -> String {
    sources.iter().map(|t| t.name()).collect::<Vec<_>>().join("&")
}

/// Concatenate `sources` row-wise.
///
/// Rows come source by source in original order. Columns are the origin
/// column followed by one column per distinct visible column name, in order
/// of first appearance. A source column named like the origin column is
/// shown as `<table>_<column>`.
pub fn concat_tables<R>(sources: &[Arc<Table<R>>], ctx: &BuildContext) -> Result<ConcatOutput<R>, BuildError>
where
    R: Clone + Send + Sync + 'static,
{
    let name = concat_name(sources);
    tracing::info!(table = %name, sources = sources.len(), "concat build started");

    let total: usize = sources.iter().map(|t| t.row_count()).sum();
    ctx.progress().start(BuildPhase::Concatenating, total);

    let mut rows = Vec::with_capacity(total);
    for source in sources {
        for record in source.rows() {
            rows.push(UnionRow::new(Arc::clone(source), record.clone()));
            ctx.checkpoint()?;
        }
    }

    let mut registry = ColumnRegistry::default();
    for source in sources {
        for col in source.visible_columns() {
            registry.register(source, col);
        }
    }
    let (columns, warnings) = registry.finish();

    let mut builder: TableBuilder<UnionRow<R>> =
        Table::builder(name.as_str()).column(Arc::new(OriginColumn::new(ORIGIN_COLUMN)));
    for column in columns {
        builder = builder.table_column(column);
    }
    let table = builder.rows(rows).build();

    tracing::info!(
        table = %name,
        rows = table.row_count(),
        columns = table.columns().len(),
        collisions = warnings.len(),
        "concat build finished"
    );
    Ok(ConcatOutput { table, warnings })
}

/// How a registered output name resolves
#[derive(Debug)]
enum Resolution {
    Dispatch(DispatchingColumn),
    /// First definition was a formula; it is reused as-is
    Computed(Arc<ComputedColumn>),
}

#[derive(Debug)]
struct Registered {
    first_table: String,
    tables: HashSet<TableId>,
    resolution: Resolution,
}

/// Registers source columns by name, in order of first appearance
#[derive(Debug, Default)]
struct ColumnRegistry {
    entries: Vec<Registered>,
    by_name: HashMap<String, usize>,
    warnings: Vec<NameCollisionWarning>,
}

impl ColumnRegistry {
    fn register<R>(&mut self, table: &Table<R>, col: usize) {
        let Some(column) = table.column(col) else { return };
        let name = if column.name() == ORIGIN_COLUMN {
            self.reserved(table, column.name())
        } else {
            column.name().to_string()
        };

        let Some(&slot) = self.by_name.get(&name) else {
            let resolution = match &column.kind {
                ColumnKind::Computed(formula) if formula.name == name => {
                    Resolution::Computed(Arc::clone(formula))
                }
                ColumnKind::Computed(formula) => Resolution::Computed(Arc::new(ComputedColumn {
                    name: name.clone(),
                    ..ComputedColumn::clone(formula)
                })),
                ColumnKind::Accessor(_) => {
                    let mut dispatch = DispatchingColumn::new(name.clone(), column.data_type());
                    dispatch.register(table.id(), col);
                    Resolution::Dispatch(dispatch)
                }
            };
            self.by_name.insert(name, self.entries.len());
            self.entries.push(Registered {
                first_table: table.name().to_string(),
                tables: HashSet::from([table.id()]),
                resolution,
            });
            return;
        };

        let entry = &mut self.entries[slot];
        let kind = if entry.tables.insert(table.id()) {
            CollisionKind::AcrossSources
        } else {
            CollisionKind::WithinSource
        };
        if let Resolution::Dispatch(dispatch) = &mut entry.resolution {
            dispatch.register(table.id(), col);
        }

        let warning = NameCollisionWarning {
            column: name,
            first_table: entry.first_table.clone(),
            table: table.name().to_string(),
            kind,
        };
        tracing::warn!(%warning, "column name collision");
        self.warnings.push(warning);
    }

    /// Output name for a source column that shadows the origin column
    fn reserved<R>(&mut self, table: &Table<R>, column: &str) -> String {
        let warning = NameCollisionWarning {
            column: column.to_string(),
            first_table: table.name().to_string(),
            table: table.name().to_string(),
            kind: CollisionKind::Reserved,
        };
        tracing::warn!(%warning, "column name collision");
        self.warnings.push(warning);
        format!("{}_{}", table.name(), column)
    }

    fn finish<R: Send + Sync + 'static>(self) -> (Vec<TableColumn<UnionRow<R>>>, Vec<NameCollisionWarning>) {
        let columns = self
            .entries
            .into_iter()
            .map(|entry| {
                let kind = match entry.resolution {
                    Resolution::Dispatch(dispatch) => ColumnKind::Accessor(Arc::new(dispatch) as _),
                    Resolution::Computed(formula) => ColumnKind::Computed(formula),
                };
                TableColumn { kind, hidden: false }
            })
            .collect();
        (columns, self.warnings)
    }
}
