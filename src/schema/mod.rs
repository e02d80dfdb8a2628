//! Catalog file definitions (noun module)
//!
//! Serde shapes of the YAML catalog. The parser turns these into tables.
//!
//! ```yaml
//! tables:
//!   - name: orders
//!     columns:
//!       - name: id
//!         type: int
//!         key: true
//!       - name: amount
//!         type: float
//!       - name: doubled
//!         type: float
//!         formula: { multiply: [amount, 2] }
//!     rows:
//!       - [1, 9.5]
//!       - [2, 3]
//! ```

use serde::Deserialize;
use crate::model::{DataType, FormulaArg, Value};

/// Root of a catalog file
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDef {
    #[serde(default)]
    pub tables: Vec<TableDef>,
}

/// One table: its columns and stored rows
#[derive(Debug, Clone, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    /// Cells in stored-column order; formula columns have no cell
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl TableDef {
    /// Columns backed by a stored cell
    pub fn stored_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.is_computed())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: DataType,
    /// Part of the table's key
    #[serde(default)]
    pub key: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Makes this a computed column
    #[serde(default)]
    pub formula: Option<FormulaArg>,
}

impl ColumnDef {
    pub fn is_computed(&self) -> bool {
        self.formula.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_columns_skip_formulas() {
        let def: TableDef = serde_yaml::from_str(
            r#"
name: sales
columns:
  - { name: id, type: int, key: true }
  - { name: total, type: float, formula: { add: [net, tax] } }
  - { name: net, type: float }
  - { name: tax, type: float, hidden: true }
"#,
        )
        .unwrap();

        let stored: Vec<&str> = def.stored_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(stored, vec!["id", "net", "tax"]);
        assert!(def.columns[1].is_computed());
        assert!(def.columns[0].key && def.columns[3].hidden);
        assert!(def.rows.is_empty());
    }
}
