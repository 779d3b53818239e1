//! Evaluation observers.
//!
//! Observers see every step of event evaluation for logging and telemetry.
//! They are called synchronously and never affect control flow.

use tracing::trace;

use crate::conditions::ConditionResponse;
use crate::error::InvalidGameEvent;
use crate::phases::LeafPhase;
use crate::resolution::{RuleDecision, RuleMetadata};
use crate::rules::GameEvent;

/// Hooks into event evaluation. Every method defaults to a no-op.
pub trait EvaluationObserver: Send + Sync {
    /// A plan entry was skipped because its phase does not apply.
    fn phase_inactive(&self, _phase: &LeafPhase, _response: &ConditionResponse) {}

    /// A rule's condition was evaluated.
    fn rule_evaluated(&self, _phase: &LeafPhase, _event: &dyn GameEvent, _response: &ConditionResponse) {}

    /// No rule had an opinion; the progress is unchanged.
    fn event_ignored(&self, _event: &dyn GameEvent) {}

    /// A rule rejected the event.
    fn event_rejected(&self, _rejection: &InvalidGameEvent) {}

    /// Conflict resolution picked the rules to apply.
    fn decision_made(&self, _event: &dyn GameEvent, _decision: &RuleDecision) {}

    /// A selected rule's mutators ran.
    fn rule_applied(&self, _event: &dyn GameEvent, _rule: &RuleMetadata) {}
}

/// Does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl EvaluationObserver for NoopObserver {}

/// Emits `trace!` events. Default observer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl EvaluationObserver for TracingObserver {
    fn phase_inactive(&self, phase: &LeafPhase, response: &ConditionResponse) {
        trace!(phase = %phase.id(), %response, "phase inactive");
    }

    fn rule_evaluated(&self, phase: &LeafPhase, event: &dyn GameEvent, response: &ConditionResponse) {
        trace!(
            phase = %phase.id(),
            rule = %phase.rule().id(),
            event = event.name(),
            %response,
            "rule evaluated"
        );
    }

    fn event_ignored(&self, event: &dyn GameEvent) {
        trace!(event = event.name(), "event ignored");
    }

    fn event_rejected(&self, rejection: &InvalidGameEvent) {
        trace!(%rejection, "event rejected");
    }

    fn decision_made(&self, event: &dyn GameEvent, decision: &RuleDecision) {
        trace!(event = event.name(), %decision, "decision made");
    }

    fn rule_applied(&self, event: &dyn GameEvent, rule: &RuleMetadata) {
        trace!(event = event.name(), %rule, "rule applied");
    }
}
