//! Conflict resolution.
//!
//! When several decision-plan entries are valid for one event, the
//! configured strategy picks what applies:
//!
//! - **FirstWins** (default): earliest in plan order
//! - **LastWins**: latest in plan order (override/layering)
//! - **HighestPriority**: highest [`RulePriority`](crate::rules::RulePriority), ties to the earliest
//! - **Exclusive**: more than one candidate is an error
//! - **ApplyAll**: every candidate, highest priority first, plan order
//!   within a priority
//!
//! A lone candidate is always selected without consulting the strategy.
//!
//! ```
//! use tabletop_engine::resolution::{ConflictResolution, RuleMetadata};
//! use tabletop_engine::rules::RulePriority;
//!
//! let candidate = |rule: &str, priority, plan_index| RuleMetadata {
//!     rule: rule.into(),
//!     phase: "play".into(),
//!     priority,
//!     plan_index,
//! };
//! let candidates = vec![
//!     candidate("base", RulePriority::Normal, 0),
//!     candidate("house-rule", RulePriority::High, 1),
//! ];
//!
//! let decision = ConflictResolution::HighestPriority.select(candidates).unwrap();
//! assert_eq!(decision.winner().unwrap().rule.as_str(), "house-rule");
//! assert_eq!(decision.rejected.len(), 1);
//! ```

mod decision;

pub use decision::{RuleDecision, RuleMetadata};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Strategy selecting among simultaneously valid rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictResolution {
    #[default]
    FirstWins,
    LastWins,
    HighestPriority,
    Exclusive,
    ApplyAll,
}

/// Several candidates under [`ConflictResolution::Exclusive`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExclusiveConflict {
    pub candidates: Vec<RuleMetadata>,
}

impl ConflictResolution {
    /// Select among `candidates`, given in plan order.
    ///
    /// # Errors
    ///
    /// `Exclusive` with more than one candidate.
    pub fn select(self, mut candidates: Vec<RuleMetadata>) -> Result<RuleDecision, ExclusiveConflict> {
        if candidates.len() == 1 {
            return Ok(RuleDecision::single(self, candidates.remove(0)));
        }

        let (winner, reason) = match self {
            ConflictResolution::FirstWins => (0, "first in plan order"),
            ConflictResolution::LastWins => (candidates.len().saturating_sub(1), "last in plan order"),
            ConflictResolution::HighestPriority => {
                let mut best = 0;
                for (i, candidate) in candidates.iter().enumerate() {
                    if candidate.priority > candidates[best].priority {
                        best = i;
                    }
                }
                (best, "highest priority, earliest on ties")
            }
            ConflictResolution::Exclusive => {
                if candidates.len() > 1 {
                    return Err(ExclusiveConflict { candidates });
                }
                (0, "exclusive")
            }
            ConflictResolution::ApplyAll => {
                // stable: plan order within a priority
                candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
                return Ok(RuleDecision {
                    strategy: self,
                    selected: candidates.into_iter().collect(),
                    rejected: Vec::new(),
                    reason: "apply all by priority".to_string(),
                });
            }
        };

        if candidates.is_empty() {
            return Ok(RuleDecision {
                strategy: self,
                selected: SmallVec::new(),
                rejected: Vec::new(),
                reason: "no candidates".to_string(),
            });
        }

        let chosen = candidates.remove(winner);
        let mut selected = SmallVec::new();
        selected.push(chosen);
        Ok(RuleDecision {
            strategy: self,
            selected,
            rejected: candidates,
            reason: reason.to_string(),
        })
    }

    /// True for strategies that may apply more than one rule per event.
    #[must_use]
    pub fn applies_many(self) -> bool {
        matches!(self, ConflictResolution::ApplyAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RulePriority;

    fn candidate(rule: &str, priority: RulePriority, plan_index: usize) -> RuleMetadata {
        RuleMetadata {
            rule: rule.into(),
            phase: "phase".into(),
            priority,
            plan_index,
        }
    }

    fn three() -> Vec<RuleMetadata> {
        vec![
            candidate("a", RulePriority::Low, 0),
            candidate("b", RulePriority::Highest, 1),
            candidate("c", RulePriority::Low, 2),
        ]
    }

    fn winner(strategy: ConflictResolution, candidates: Vec<RuleMetadata>) -> String {
        strategy.select(candidates).unwrap().winner().unwrap().rule.to_string()
    }

    #[test]
    fn test_first_and_last_wins() {
        assert_eq!(winner(ConflictResolution::FirstWins, three()), "a");
        assert_eq!(winner(ConflictResolution::LastWins, three()), "c");

        let decision = ConflictResolution::FirstWins.select(three()).unwrap();
        let rejected: Vec<_> = decision.rejected.iter().map(|m| m.rule.as_str()).collect();
        assert_eq!(rejected, vec!["b", "c"]);
    }

    #[test]
    fn test_highest_priority() {
        assert_eq!(winner(ConflictResolution::HighestPriority, three()), "b");

        let tied = vec![
            candidate("x", RulePriority::High, 0),
            candidate("y", RulePriority::High, 1),
        ];
        assert_eq!(winner(ConflictResolution::HighestPriority, tied), "x");
    }

    #[test]
    fn test_exclusive() {
        let conflict = ConflictResolution::Exclusive.select(three()).unwrap_err();
        assert_eq!(conflict.candidates.len(), 3);

        let single = vec![candidate("only", RulePriority::Normal, 4)];
        assert_eq!(winner(ConflictResolution::Exclusive, single), "only");
    }

    #[test]
    fn test_apply_all_order() {
        let decision = ConflictResolution::ApplyAll.select(three()).unwrap();
        let order: Vec<_> = decision.selected_rules().map(|r| r.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert!(decision.rejected.is_empty());
        assert!(ConflictResolution::ApplyAll.applies_many());
    }

    #[test]
    fn test_single_candidate_bypasses_strategy() {
        let decision = ConflictResolution::LastWins
            .select(vec![candidate("solo", RulePriority::Lowest, 0)])
            .unwrap();
        assert_eq!(decision.reason, "single candidate");
        assert_eq!(decision.selected.len(), 1);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ConflictResolution::ApplyAll).unwrap();
        assert_eq!(json, "\"ApplyAll\"");
        let parsed: ConflictResolution = serde_json::from_str("\"HighestPriority\"").unwrap();
        assert_eq!(parsed, ConflictResolution::HighestPriority);
    }
}
