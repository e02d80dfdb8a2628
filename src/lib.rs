//! tabjoin - Join and concatenate in-memory tables
//!
//! This library provides:
//! - Table model types (records, typed columns, computed columns)
//! - Catalog parsing from YAML
//! - Key-based joins with inner, outer, full and diff semantics
//! - Row-wise concatenation with per-row column dispatch
//! - Background builds with progress reporting and cancellation
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `model/` - tables, records, columns, values
//! - `schema/` - catalog file definitions
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML → Catalog
//! - `join/` - Tables + JoinPolicy → joined Table (index, plan, filter, assemble)
//! - `concat/` - Tables → concatenated Table
//! - `task/` - run a build off the caller's thread
//! - `derived` - selection + join type → published derived table
//! - `command/` - the `join-tables` action and join requests
//!
//! # Example
//!
//! ```ignore
//! use tabjoin::{parser, JoinRequest, JoinType};
//!
//! let catalog = parser::parse_file("catalog.yaml")?;
//! let derived = JoinRequest::new(["orders", "customers"], JoinType::Inner).execute(&catalog)?;
//! let task = derived.spawn_build()?;
//! let output = task.wait().await?;
//! println!("{} rows", output.row_count());
//! ```

pub mod model;
pub mod schema;
pub mod parser;
pub mod join;
pub mod concat;
pub mod task;
pub mod derived;
pub mod command;
pub mod error;

// Re-export commonly used types
pub use model::{Column, ColumnError, DataType, Record, RecordRef, SourceTable, Table, Value};
pub use join::{build_joined_table, CombinedRow, JoinPolicy};
pub use concat::{concat_tables, NameCollisionWarning, UnionRow};
pub use task::{BuildContext, BuildPhase, BuildProgress, BuildTask};
pub use derived::{DerivedOutput, DerivedTable};
pub use command::{join_selected, Catalog, JoinRequest, JoinType, SelectionError};
pub use error::{BuildError, ParseError};
