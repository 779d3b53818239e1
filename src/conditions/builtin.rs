//! Built-in predicates that do not depend on a particular event type.

use crate::core::{ArtifactId, GameState, StateKind};
use crate::engine::GameEngine;
use crate::rules::GameEvent;

use super::composite::{EventPredicate, StatePredicate};
use super::response::{ConditionOutcome, ConditionResponse};

/// Always valid. Phases guarded only by `Always` are skipped by the plan's
/// applicability check.
#[derive(Clone, Copy, Debug, Default)]
pub struct Always;

/// Always invalid.
#[derive(Clone, Copy, Debug, Default)]
pub struct Never;

/// Always ignore.
#[derive(Clone, Copy, Debug, Default)]
pub struct Abstain;

macro_rules! constant_predicate {
    ($ty:ty, $name:literal, $outcome:expr, $response:expr) => {
        impl StatePredicate for $ty {
            fn evaluate(&self, _engine: &GameEngine, _state: &GameState) -> ConditionResponse {
                $response
            }

            fn name(&self) -> &str {
                $name
            }

            fn constant_outcome(&self) -> Option<ConditionOutcome> {
                Some($outcome)
            }
        }

        impl EventPredicate for $ty {
            fn evaluate(&self, _engine: &GameEngine, _state: &GameState, _event: &dyn GameEvent) -> ConditionResponse {
                $response
            }

            fn name(&self) -> &str {
                $name
            }

            fn constant_outcome(&self) -> Option<ConditionOutcome> {
                Some($outcome)
            }
        }
    };
}

constant_predicate!(Always, "always", ConditionOutcome::Valid, ConditionResponse::VALID);
constant_predicate!(Never, "never", ConditionOutcome::Invalid, ConditionResponse::fail("never"));
constant_predicate!(Abstain, "abstain", ConditionOutcome::Ignore, ConditionResponse::IGNORE);

/// Valid while the given player holds the turn.
#[derive(Clone, Debug)]
pub struct ActivePlayerIs(pub ArtifactId);

impl ActivePlayerIs {
    pub fn new(player: impl Into<ArtifactId>) -> Self {
        Self(player.into())
    }
}

impl StatePredicate for ActivePlayerIs {
    fn evaluate(&self, _engine: &GameEngine, state: &GameState) -> ConditionResponse {
        if state.active_player() == Some(&self.0) {
            ConditionResponse::VALID
        } else {
            ConditionResponse::fail(format!("{} is not the active player", self.0))
        }
    }

    fn name(&self) -> &str {
        "active-player-is"
    }
}

/// Valid if the artifact carries a state of the given kind.
#[derive(Clone, Debug)]
pub struct HasState {
    pub artifact: ArtifactId,
    pub kind: StateKind,
}

impl HasState {
    pub fn new(artifact: impl Into<ArtifactId>, kind: StateKind) -> Self {
        Self {
            artifact: artifact.into(),
            kind,
        }
    }
}

impl StatePredicate for HasState {
    fn evaluate(&self, _engine: &GameEngine, state: &GameState) -> ConditionResponse {
        if state.has(&self.artifact, &self.kind) {
            ConditionResponse::VALID
        } else {
            ConditionResponse::fail(format!("{} has no {:?} state", self.artifact, self.kind))
        }
    }

    fn name(&self) -> &str {
        "has-state"
    }
}
