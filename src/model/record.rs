//! Shared records

use std::sync::Arc;
use parking_lot::RwLock;
use super::types::Value;

/// A record of stored cells.
///
/// Records are shared (`RecordRef`) between the table that owns them and any
/// derived table built from it, so writes through a derived column land in
/// the original record.
#[derive(Debug, Default)]
pub struct Record {
    cells: RwLock<Vec<Value>>,
}

/// Handle to a shared record
pub type RecordRef = Arc<Record>;

impl Record {
    pub fn new(cells: Vec<Value>) -> RecordRef {
        Arc::new(Self {
            cells: RwLock::new(cells),
        })
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.cells.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.read().is_empty()
    }

    /// Clone of the cell at `index`, if stored
    pub fn get(&self, index: usize) -> Option<Value> {
        self.cells.read().get(index).cloned()
    }

    /// Overwrite the cell at `index`; returns false if the record is too short
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.cells.write().get_mut(index) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Snapshot of all stored cells
    pub fn cells(&self) -> Vec<Value> {
        self.cells.read().clone()
    }
}
