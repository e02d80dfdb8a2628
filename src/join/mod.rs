//! Key-based join (verb module)
//!
//! Sources are indexed by key, every distinct key is expanded into the cross
//! product of its per-source buckets, and a join policy decides which of
//! those combined rows reach the output table.

mod build;
mod columns;
mod filter;
mod index;
mod key;
mod plan;

pub use build::{build_joined_table, joined_name};
pub use columns::{KeyColumn, SubrowColumn};
pub use filter::{filter_join, JoinPolicy};
pub use index::SourceIndex;
pub use key::{extract_key, Key};
pub use plan::{plan_join, CombinedRow, JoinPlan, KeyGroup};
