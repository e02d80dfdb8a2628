//! Row-wise concatenation (verb module)
//!
//! Every source row is appended, tagged with its origin table. Output
//! columns are unified by name: each resolves per row to the same-named
//! column of that row's origin.

mod build;
mod dispatch;
mod warning;

pub use build::{concat_name, concat_tables, ConcatOutput, ORIGIN_COLUMN};
pub use dispatch::{DispatchingColumn, OriginColumn, UnionRow};
pub use warning::{CollisionKind, NameCollisionWarning};
