//! Error types.
//!
//! Ignored events are not errors: [`GameProgress::handle_event`] returns the
//! same progress (see [`GameProgress::is_same`]). Errors cover build-time
//! failures, rejected events and exclusive-resolution conflicts.
//!
//! [`GameProgress::handle_event`]: crate::engine::GameProgress::handle_event
//! [`GameProgress::is_same`]: crate::engine::GameProgress::is_same

use std::sync::Arc;

use thiserror::Error;

use crate::conditions::ConditionResponse;
use crate::core::GameState;
use crate::phases::PhaseId;
use crate::rules::{GameEvent, RuleId};

/// Malformed definitions found by [`GameBuilder::compile`](crate::game::GameBuilder::compile).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("duplicate {kind} identifier `{id}`")]
    DuplicateIdentifier { kind: &'static str, id: String },

    #[error("unknown {kind} `{id}` referenced by {referenced_by}")]
    UnknownIdentifier {
        kind: &'static str,
        id: String,
        referenced_by: String,
    },

    #[error("invalid starting state: {detail}")]
    InvalidStartingState { detail: String },
}

impl BuildError {
    pub(crate) fn duplicate(kind: &'static str, id: impl ToString) -> Self {
        BuildError::DuplicateIdentifier {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn unknown(kind: &'static str, id: impl ToString, referenced_by: impl Into<String>) -> Self {
        BuildError::UnknownIdentifier {
            kind,
            id: id.to_string(),
            referenced_by: referenced_by.into(),
        }
    }

    pub(crate) fn starting_state(detail: impl Into<String>) -> Self {
        BuildError::InvalidStartingState { detail: detail.into() }
    }
}

/// A matched rule's condition rejected the event.
#[derive(Debug, Error)]
#[error("{} rejected by rule `{rule}` in phase `{phase}`: {response}", .event.name())]
pub struct InvalidGameEvent {
    pub event: Arc<dyn GameEvent>,
    pub response: ConditionResponse,
    pub phase: PhaseId,
    pub rule: RuleId,
    /// State before any mutation; unchanged by the rejection.
    pub state: Arc<GameState>,
}

/// Runtime failures of the event pipeline.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidEvent(Box<InvalidGameEvent>),

    #[error("{} matched {} rules under exclusive resolution: {}", .event.name(), .rules.len(), join(.rules))]
    RuleConflict {
        event: Arc<dyn GameEvent>,
        rules: Vec<RuleId>,
        phases: Vec<PhaseId>,
    },
}

impl EngineError {
    /// The rejection details, if this is a rejected event.
    #[must_use]
    pub fn as_invalid_event(&self) -> Option<&InvalidGameEvent> {
        match self {
            EngineError::InvalidEvent(invalid) => Some(invalid),
            EngineError::RuleConflict { .. } => None,
        }
    }

    /// The event that failed.
    #[must_use]
    pub fn event(&self) -> &Arc<dyn GameEvent> {
        match self {
            EngineError::InvalidEvent(invalid) => &invalid.event,
            EngineError::RuleConflict { event, .. } => event,
        }
    }
}

impl From<InvalidGameEvent> for EngineError {
    fn from(invalid: InvalidGameEvent) -> Self {
        EngineError::InvalidEvent(Box::new(invalid))
    }
}

fn join(rules: &[RuleId]) -> String {
    rules.iter().map(RuleId::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::EndTurnEvent;

    #[test]
    fn test_build_error_messages() {
        assert_eq!(
            BuildError::duplicate("artifact", "a1").to_string(),
            "duplicate artifact identifier `a1`"
        );
        assert_eq!(
            BuildError::unknown("tile", "z9", "relation a1 -> z9").to_string(),
            "unknown tile `z9` referenced by relation a1 -> z9"
        );
    }

    #[test]
    fn test_conflict_message() {
        let error = EngineError::RuleConflict {
            event: Arc::new(EndTurnEvent),
            rules: vec!["a".into(), "b".into()],
            phases: vec!["p".into(), "q".into()],
        };
        assert_eq!(
            error.to_string(),
            "EndTurnEvent matched 2 rules under exclusive resolution: a, b"
        );
        assert!(error.as_invalid_event().is_none());
        assert_eq!(error.event().name(), "EndTurnEvent");
    }

    #[test]
    fn test_invalid_event_message() {
        let error: EngineError = InvalidGameEvent {
            event: Arc::new(EndTurnEvent),
            response: ConditionResponse::fail("not your turn"),
            phase: "play".into(),
            rule: "end-turn".into(),
            state: Arc::new(GameState::new(0)),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "EndTurnEvent rejected by rule `end-turn` in phase `play`: Invalid: not your turn"
        );
    }
}
