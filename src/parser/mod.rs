//! Catalog parser (verb module)
//!
//! Transforms YAML catalog files into source tables.

use std::path::Path;
use std::sync::Arc;
use crate::command::Catalog;
use crate::error::ParseError;
use crate::model::{ComputedColumn, FieldColumn, Record, RecordRef, SourceTable, Table, TableBuilder, Value};
use crate::schema::{CatalogDef, TableDef};

/// Parse a catalog from a YAML file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Catalog, ParseError> {
    let path_str = path.as_ref().display().to_string();
    let contents = std::fs::read_to_string(&path).map_err(|e| ParseError::Io {
        path: path_str,
        source: e,
    })?;
    parse_str(&contents)
}

/// Parse a catalog from a YAML string
pub fn parse_str(yaml: &str) -> Result<Catalog, ParseError> {
    let def: CatalogDef = serde_yaml::from_str(yaml)?;
    build_catalog(def)
}

/// Build tables from already-deserialized definitions
pub fn build_catalog(def: CatalogDef) -> Result<Catalog, ParseError> {
    let mut catalog = Catalog::new();
    for table_def in def.tables {
        if catalog.contains(&table_def.name) {
            return Err(invalid(&table_def.name, "table defined more than once"));
        }
        let table = build_table(table_def)?;
        tracing::debug!(table = %table.name(), rows = table.row_count(), "table loaded");
        catalog.insert(table);
    }
    Ok(catalog)
}

/// Build one source table.
///
/// Stored columns take consecutive cell positions. Every cell is coerced to
/// its column's type; rows longer than the stored column count are rejected.
pub fn build_table(def: TableDef) -> Result<SourceTable, ParseError> {
    if def.columns.is_empty() {
        return Err(invalid(&def.name, "no columns"));
    }

    let mut builder: TableBuilder<RecordRef> = Table::builder(def.name.as_str());
    let mut stored = Vec::new();
    for column in &def.columns {
        builder = match &column.formula {
            Some(formula) => {
                if column.key {
                    return Err(invalid(
                        &def.name,
                        format!("computed column '{}' cannot be a key", column.name),
                    ));
                }
                builder.computed(Arc::new(ComputedColumn::new(
                    column.name.as_str(),
                    column.data_type,
                    formula.clone(),
                )))
            }
            None => {
                let field = Arc::new(FieldColumn::new(column.name.as_str(), stored.len(), column.data_type));
                stored.push(column.data_type);
                if column.key {
                    builder.key_column(field)
                } else {
                    builder.column(field)
                }
            }
        };
        if column.hidden {
            builder = builder.hidden();
        }
    }

    for (row_index, cells) in def.rows.into_iter().enumerate() {
        if cells.len() > stored.len() {
            return Err(invalid(
                &def.name,
                format!(
                    "row {} has {} cells, expected at most {}",
                    row_index,
                    cells.len(),
                    stored.len()
                ),
            ));
        }
        let cells = cells
            .into_iter()
            .zip(&stored)
            .map(|(cell, data_type)| {
                data_type
                    .coerce(cell)
                    .map_err(|e| invalid(&def.name, format!("row {}: {}", row_index, e)))
            })
            .collect::<Result<Vec<Value>, _>>()?;
        builder = builder.row(Record::new(cells));
    }

    Ok(builder.build())
}

fn invalid(table: &str, message: impl Into<String>) -> ParseError {
    ParseError::Invalid {
        table: table.to_string(),
        message: message.into(),
    }
}
