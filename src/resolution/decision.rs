//! Diagnostic records of rule selection. Never used for control flow.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::phases::{LeafPhase, PhaseId};
use crate::rules::{RuleId, RulePriority};

use super::ConflictResolution;

/// Identity of one candidate rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleMetadata {
    pub rule: RuleId,
    pub phase: PhaseId,
    pub priority: RulePriority,
    /// Position of the owning leaf in the decision plan.
    pub plan_index: usize,
}

impl RuleMetadata {
    /// Metadata for the rule of a leaf phase.
    #[must_use]
    pub fn of(phase: &LeafPhase) -> Self {
        Self {
            rule: phase.rule().id().clone(),
            phase: phase.id().clone(),
            priority: phase.rule().priority(),
            plan_index: phase.ordinal(),
        }
    }
}

impl fmt::Display for RuleMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:?})", self.phase, self.rule, self.priority)
    }
}

/// Outcome of conflict resolution for one event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDecision {
    pub strategy: ConflictResolution,
    /// Applied rules, in application order.
    pub selected: SmallVec<[RuleMetadata; 1]>,
    /// Valid candidates that were not applied.
    pub rejected: Vec<RuleMetadata>,
    pub reason: String,
}

impl RuleDecision {
    /// Decision for a lone candidate; no strategy consulted.
    #[must_use]
    pub fn single(strategy: ConflictResolution, candidate: RuleMetadata) -> Self {
        let mut selected = SmallVec::new();
        selected.push(candidate);
        Self {
            strategy,
            selected,
            rejected: Vec::new(),
            reason: "single candidate".to_string(),
        }
    }

    /// First applied rule.
    #[must_use]
    pub fn winner(&self) -> Option<&RuleMetadata> {
        self.selected.first()
    }

    /// Ids of the applied rules.
    pub fn selected_rules(&self) -> impl Iterator<Item = &RuleId> {
        self.selected.iter().map(|m| &m.rule)
    }
}

impl fmt::Display for RuleDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: ", self.strategy)?;
        for (i, selected) in self.selected.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{selected}")?;
        }
        write!(f, " ({}; {} rejected)", self.reason, self.rejected.len())
    }
}
