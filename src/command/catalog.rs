//! Named source tables available to the join command

use std::collections::HashMap;
use std::sync::Arc;
use crate::model::SourceTable;
use super::error::SelectionError;

/// Source tables by name, in insertion order
#[derive(Debug, Default)]
pub struct Catalog {
    tables: Vec<Arc<SourceTable>>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `table`, replacing any table of the same name.
    ///
    /// Returns the replaced table.
    pub fn insert(&mut self, table: SourceTable) -> Option<Arc<SourceTable>> {
        let name = table.name().to_string();
        let table = Arc::new(table);
        match self.by_name.get(&name) {
            Some(&i) => Some(std::mem::replace(&mut self.tables[i], table)),
            None => {
                self.by_name.insert(name, self.tables.len());
                self.tables.push(table);
                None
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<SourceTable>> {
        self.by_name.get(name).map(|&i| &self.tables[i])
    }

    /// Table names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name()).collect()
    }

    pub fn tables(&self) -> &[Arc<SourceTable>] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Resolve `names` in order. A name may repeat (self-join).
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Arc<SourceTable>>, SelectionError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .cloned()
                    .ok_or_else(|| SelectionError::UnknownTable(name.to_string()))
            })
            .collect()
    }
}
