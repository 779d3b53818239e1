//! Decision plan: the phase tree flattened once at compile time.
//!
//! Entries keep exact depth-first declaration order; conflict resolution
//! observes that order, so flattening never reorders. Each entry records
//! whether its applicability check can be skipped (constant valid) and the
//! event type its rule accepts.
//!
//! ## Event-type index
//!
//! With indexing on, entries are bucketed by accepted event type. Lookup
//! merges the matching bucket with the untyped entries by position, so the
//! candidate order is identical to a full scan.

use std::any::TypeId;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::rules::{EventType, GameEvent};

use super::phase::{GamePhase, LeafPhase};

/// One flattened leaf.
#[derive(Clone, Debug)]
pub struct PlanEntry {
    index: usize,
    phase: Arc<LeafPhase>,
    always_active: bool,
    event_type: Option<EventType>,
}

impl PlanEntry {
    /// Position in the plan.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn phase(&self) -> &Arc<LeafPhase> {
        &self.phase
    }

    /// True when the applicability condition is constant valid.
    #[must_use]
    pub fn always_active(&self) -> bool {
        self.always_active
    }

    #[must_use]
    pub fn event_type(&self) -> Option<EventType> {
        self.event_type
    }
}

/// Flat, ordered list of leaf phases.
#[derive(Clone, Debug, Default)]
pub struct DecisionPlan {
    entries: Vec<PlanEntry>,
    by_event_type: FxHashMap<TypeId, Vec<usize>>,
    untyped: Vec<usize>,
}

impl DecisionPlan {
    /// Flatten `root`. With `index_event_types` off every entry is scanned
    /// for every event.
    #[must_use]
    pub fn compile(root: &GamePhase, index_event_types: bool) -> Self {
        let mut plan = Self::default();

        for (index, phase) in root.leaves().into_iter().enumerate() {
            let event_type = phase.rule().event_type();
            match event_type {
                Some(accepted) if index_event_types => {
                    plan.by_event_type.entry(accepted.id()).or_default().push(index);
                }
                _ => plan.untyped.push(index),
            }
            plan.entries.push(PlanEntry {
                index,
                phase: Arc::clone(phase),
                always_active: phase.condition().is_always_valid(),
                event_type,
            });
        }

        plan
    }

    #[must_use]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct indexed event types.
    #[must_use]
    pub fn indexed_types(&self) -> usize {
        self.by_event_type.len()
    }

    /// Entries that may accept `event`, in plan order.
    pub fn candidates_for<'a>(&'a self, event: &dyn GameEvent) -> Candidates<'a> {
        let typed = self
            .by_event_type
            .get(&event.event_type_id())
            .map_or(&[][..], Vec::as_slice);
        Candidates {
            entries: &self.entries,
            typed,
            untyped: &self.untyped,
        }
    }
}

/// Merge of the typed bucket and the untyped entries by plan position.
#[derive(Clone, Debug)]
pub struct Candidates<'a> {
    entries: &'a [PlanEntry],
    typed: &'a [usize],
    untyped: &'a [usize],
}

impl<'a> Iterator for Candidates<'a> {
    type Item = &'a PlanEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let index = match (self.typed.first(), self.untyped.first()) {
            (Some(&t), Some(&u)) if t < u => {
                self.typed = &self.typed[1..];
                t
            }
            (_, Some(&u)) => {
                self.untyped = &self.untyped[1..];
                u
            }
            (Some(&t), None) => {
                self.typed = &self.typed[1..];
                t
            }
            (None, None) => return None,
        };
        Some(&self.entries[index])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.typed.len() + self.untyped.len();
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::StateCondition;
    use crate::phases::phase::tests::sample_tree;
    use crate::phases::PhaseId;
    use crate::rules::{EndTurnEvent, EventRule, RollDiceEvent};

    fn leaf(id: &str, ordinal: usize, rule: EventRule) -> GamePhase {
        GamePhase::Leaf(Arc::new(LeafPhase::new(
            PhaseId::new(id),
            ordinal,
            StateCondition::always(),
            rule,
        )))
    }

    fn mixed_tree() -> GamePhase {
        GamePhase::Group {
            id: "root".into(),
            children: vec![
                leaf("roll", 0, EventRule::on::<RollDiceEvent>("roll")),
                leaf("any", 1, EventRule::new("any")),
                GamePhase::Group {
                    id: "turn".into(),
                    children: vec![
                        leaf("end", 2, EventRule::on::<EndTurnEvent>("end")),
                        leaf("reroll", 3, EventRule::on::<RollDiceEvent>("reroll")),
                    ],
                },
                leaf("fallback", 4, EventRule::new("fallback")),
            ],
        }
    }

    fn candidate_ids(plan: &DecisionPlan, event: &dyn GameEvent) -> Vec<String> {
        plan.candidates_for(event)
            .map(|entry| entry.phase().id().to_string())
            .collect()
    }

    #[test]
    fn test_flatten_preserves_order() {
        let plan = DecisionPlan::compile(&sample_tree(), true);
        let ids: Vec<_> = plan.entries().iter().map(|e| e.phase().id().as_str()).collect();
        assert_eq!(ids, vec!["setup", "move", "end", "scoring"]);
        assert!(plan.entries().iter().enumerate().all(|(i, e)| e.index() == i));
    }

    #[test]
    fn test_always_active_flag() {
        let plan = DecisionPlan::compile(&sample_tree(), true);
        let flags: Vec<_> = plan.entries().iter().map(PlanEntry::always_active).collect();
        assert_eq!(flags, vec![false, true, false, false]);
    }

    #[test]
    fn test_index_merges_in_plan_order() {
        let plan = DecisionPlan::compile(&mixed_tree(), true);
        assert_eq!(plan.indexed_types(), 2);
        assert_eq!(
            candidate_ids(&plan, &RollDiceEvent::new()),
            vec!["roll", "any", "reroll", "fallback"]
        );
        assert_eq!(candidate_ids(&plan, &EndTurnEvent), vec!["any", "end", "fallback"]);
    }

    #[test]
    fn test_unindexed_scans_everything() {
        let plan = DecisionPlan::compile(&mixed_tree(), false);
        assert_eq!(plan.indexed_types(), 0);
        assert_eq!(plan.candidates_for(&EndTurnEvent).count(), 5);
    }

    #[test]
    fn test_empty_plan() {
        let plan = DecisionPlan::compile(
            &GamePhase::Group {
                id: "root".into(),
                children: Vec::new(),
            },
            true,
        );
        assert!(plan.is_empty());
        assert_eq!(plan.candidates_for(&EndTurnEvent).count(), 0);
    }
}
