//! Shared test utilities for integration tests

#![allow(dead_code)]

use std::sync::Arc;
use parking_lot::Mutex;
use tabjoin::model::{DataType, FieldColumn};
use tabjoin::{parser, Catalog, Column, ColumnError, Record, RecordRef, SourceTable, Table, Value};
use tokio::sync::oneshot;

/// Install a log subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Load a test fixture from the tests/test_data directory
pub fn load_fixture(name: &str) -> Catalog {
    init_tracing();
    let path = format!("tests/test_data/{}", name);
    parser::parse_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Look up a fixture table by name
pub fn table(catalog: &Catalog, name: &str) -> Arc<SourceTable> {
    catalog
        .get(name)
        .cloned()
        .unwrap_or_else(|| panic!("Table '{}' not in fixture", name))
}

/// A table keyed by an int `id` column with one string column, built in code
pub fn keyed_table(name: &str, value_column: &str, rows: &[(i64, &str)]) -> Arc<SourceTable> {
    init_tracing();
    let records = rows
        .iter()
        .map(|(id, v)| Record::new(vec![Value::Int(*id), Value::from(*v)]));
    Arc::new(
        Table::<RecordRef>::builder(name)
            .key_column(Arc::new(FieldColumn::new("id", 0, DataType::Int)))
            .column(Arc::new(FieldColumn::new(value_column, 1, DataType::String)))
            .rows(records)
            .build(),
    )
}

/// A large single-column table for background build tests
pub fn numbered_table(name: &str, rows: i64) -> Arc<SourceTable> {
    init_tracing();
    Arc::new(
        Table::<RecordRef>::builder(name)
            .key_column(Arc::new(FieldColumn::new("id", 0, DataType::Int)))
            .rows((0..rows).map(|i| Record::new(vec![Value::Int(i)])))
            .build(),
    )
}

/// Display strings of `column`, panicking with context on failure
pub fn display<R>(table: &Table<R>, column: &str) -> Vec<String> {
    table
        .column_display(column)
        .unwrap_or_else(|e| panic!("Cannot display column '{}': {}", column, e))
}

/// Int key column whose first display call blocks until released
#[derive(Debug)]
pub struct GatedColumn {
    inner: FieldColumn,
    started: Mutex<Option<oneshot::Sender<()>>>,
    resume: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedColumn {
    fn wait_once(&self) {
        let Some(started) = self.started.lock().take() else {
            return;
        };
        started.send(()).ok();
        if let Some(resume) = self.resume.lock().take() {
            resume.blocking_recv().ok();
        }
    }
}

impl Column<RecordRef> for GatedColumn {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn data_type(&self) -> DataType {
        self.inner.data_type()
    }

    fn value(&self, row: &RecordRef) -> Result<Value, ColumnError> {
        self.inner.value(row)
    }

    fn display(&self, row: &RecordRef) -> Result<String, ColumnError> {
        self.wait_once();
        self.inner.display(row)
    }
}

/// Test side of a `GatedColumn`
pub struct Gate {
    started: oneshot::Receiver<()>,
    resume: oneshot::Sender<()>,
}

impl Gate {
    /// Wait until a build is blocked on the gate
    pub async fn started(&mut self) {
        (&mut self.started).await.expect("gated column dropped");
    }

    /// Let the blocked build continue
    pub fn release(self) {
        self.resume.send(()).ok();
    }
}

/// A table keyed by `id` whose first key computation waits on the returned gate
pub fn gated_table(name: &str, ids: &[i64]) -> (Arc<SourceTable>, Gate) {
    init_tracing();
    let (started_tx, started_rx) = oneshot::channel();
    let (resume_tx, resume_rx) = oneshot::channel();
    let key = GatedColumn {
        inner: FieldColumn::new("id", 0, DataType::Int),
        started: Mutex::new(Some(started_tx)),
        resume: Mutex::new(Some(resume_rx)),
    };
    let table = Table::<RecordRef>::builder(name)
        .key_column(Arc::new(key))
        .rows(ids.iter().map(|id| Record::new(vec![Value::Int(*id)])))
        .build();
    (
        Arc::new(table),
        Gate {
            started: started_rx,
            resume: resume_tx,
        },
    )
}
