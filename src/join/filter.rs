//! Join policies

use std::fmt;
use crate::error::BuildError;
use crate::task::{BuildContext, BuildPhase};
use super::plan::{CombinedRow, JoinPlan};

/// Which combined rows survive into a join's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinPolicy {
    /// Rows with a record from every source
    Inner,
    /// Rows with a record from the first source
    Outer,
    /// Every row
    Full,
    /// Rows missing a record from at least one source
    Diff,
}

impl JoinPolicy {
    pub fn keeps<R>(&self, row: &CombinedRow<R>) -> bool {
        match self {
            JoinPolicy::Full => true,
            JoinPolicy::Inner => row.is_complete(),
            JoinPolicy::Outer => row.slot(0).is_some(),
            JoinPolicy::Diff => !row.is_complete(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinPolicy::Inner => "inner",
            JoinPolicy::Outer => "outer",
            JoinPolicy::Full => "full",
            JoinPolicy::Diff => "diff",
        }
    }
}

impl fmt::Display for JoinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply `policy` group by group, keeping key order and in-group order.
pub fn filter_join<R>(
    policy: JoinPolicy,
    plan: JoinPlan<R>,
    ctx: &BuildContext,
) -> Result<Vec<CombinedRow<R>>, BuildError> {
    ctx.progress().start(BuildPhase::Filtering, plan.key_count());
    let candidates = plan.row_count();

    let mut kept = Vec::new();
    for group in plan.into_groups() {
        kept.extend(group.rows.into_iter().filter(|row| policy.keeps(row)));
        ctx.checkpoint()?;
    }

    tracing::debug!(%policy, candidates, kept = kept.len(), "join policy applied");
    Ok(kept)
}
