//! Change detection and copy plan generation

mod compare;
mod plan;

pub use compare::{needs_update, MTIME_TOLERANCE};
pub use plan::{compare_trees, plan_sync, TreeComparison};
