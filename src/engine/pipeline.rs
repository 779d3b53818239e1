//! Event evaluation.
//!
//! 1. Collect candidates: active plan entries (or the active leaf in
//!    tree-walk mode) whose rule is valid for the event.
//! 2. No candidate and no rejection: ignored.
//! 3. No candidate but some rule answered invalid: rejected, carrying the
//!    first invalid response in plan order.
//! 4. Otherwise conflict resolution selects the rules to apply and their
//!    mutators run in order, threading the state.
//!
//! Rules answering *ignore* never reject an event, and a rejection only
//! surfaces when no other rule accepted the event.

use std::sync::Arc;

use crate::conditions::ConditionResponse;
use crate::core::GameState;
use crate::error::{EngineError, InvalidGameEvent};
use crate::phases::LeafPhase;
use crate::resolution::{RuleDecision, RuleMetadata};
use crate::rules::GameEvent;

use super::runtime::GameEngine;

/// Result of evaluating one event.
pub(crate) enum Evaluation {
    Ignored,
    Applied { state: GameState, decision: RuleDecision },
}

#[derive(Default)]
struct Scan<'a> {
    candidates: Vec<RuleMetadata>,
    rejection: Option<(&'a LeafPhase, ConditionResponse)>,
}

impl<'a> Scan<'a> {
    fn consider(&mut self, engine: &GameEngine, phase: &'a LeafPhase, state: &GameState, event: &dyn GameEvent) {
        let response = phase.rule().check(engine, state, event);
        engine.observer.rule_evaluated(phase, event, &response);

        if response.is_valid() {
            self.candidates.push(RuleMetadata::of(phase));
        } else if response.is_invalid() && self.rejection.is_none() {
            self.rejection = Some((phase, response));
        }
    }
}

impl GameEngine {
    pub(crate) fn evaluate(
        &self,
        state: &Arc<GameState>,
        event: &Arc<dyn GameEvent>,
    ) -> Result<Evaluation, EngineError> {
        let observer = self.observer.as_ref();
        let mut scan = Scan::default();

        match self.plan() {
            Some(plan) => {
                for entry in plan.candidates_for(event.as_ref()) {
                    let phase = entry.phase().as_ref();
                    if !entry.always_active() {
                        let applicability = phase.condition().evaluate(self, state);
                        if !applicability.is_valid() {
                            observer.phase_inactive(phase, &applicability);
                            continue;
                        }
                    }
                    scan.consider(self, phase, state, event.as_ref());
                }
            }
            None => {
                if let Some(phase) = self.phases().active_leaf(self, state) {
                    scan.consider(self, phase, state, event.as_ref());
                }
            }
        }

        if scan.candidates.is_empty() {
            return match scan.rejection {
                None => {
                    observer.event_ignored(event.as_ref());
                    Ok(Evaluation::Ignored)
                }
                Some((phase, response)) => {
                    let rejection = InvalidGameEvent {
                        event: Arc::clone(event),
                        response,
                        phase: phase.id().clone(),
                        rule: phase.rule().id().clone(),
                        state: Arc::clone(state),
                    };
                    observer.event_rejected(&rejection);
                    Err(rejection.into())
                }
            };
        }

        let decision = self
            .config()
            .conflict_resolution
            .select(scan.candidates)
            .map_err(|conflict| EngineError::RuleConflict {
                event: Arc::clone(event),
                rules: conflict.candidates.iter().map(|c| c.rule.clone()).collect(),
                phases: conflict.candidates.iter().map(|c| c.phase.clone()).collect(),
            })?;
        observer.decision_made(event.as_ref(), &decision);

        let mut next = GameState::clone(state);
        for selected in &decision.selected {
            if let Some(phase) = self.leaves().get(selected.plan_index) {
                next = phase.rule().apply(self, &next, event.as_ref());
                observer.rule_applied(event.as_ref(), selected);
            }
        }

        Ok(Evaluation::Applied { state: next, decision })
    }
}
