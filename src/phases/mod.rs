//! Phase tree and decision plan.
//!
//! The builder compiles declared phases into a [`GamePhase`] tree. When the
//! decision plan is enabled the tree is also flattened into a
//! [`DecisionPlan`] so runtime evaluation never walks the tree.

mod phase;
mod plan;

pub use phase::{GamePhase, LeafPhase, PhaseId};
pub use plan::{Candidates, DecisionPlan, PlanEntry};
