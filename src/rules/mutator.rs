//! State mutators.
//!
//! A mutator is a pure `(engine, state, event) -> state` function. Mutators
//! never fail: refusals belong in conditions. A mutator handed an event type
//! it does not understand returns the state unchanged.

use std::sync::Arc;

use crate::core::{ArtifactState, GameRng, GameState, StateKind};
use crate::engine::GameEngine;

use super::event::{GameEvent, MovePieceEvent, RollDiceEvent, RollRandomDiceEvent};

/// Pure state transition.
pub trait StateMutator: Send + Sync {
    fn mutate(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> GameState;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

struct MutatorFn<F> {
    name: &'static str,
    f: F,
}

impl<F> StateMutator for MutatorFn<F>
where
    F: Fn(&GameEngine, &GameState, &dyn GameEvent) -> GameState + Send + Sync,
{
    fn mutate(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> GameState {
        (self.f)(engine, state, event)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Wrap a closure as a mutator.
pub fn mutator_fn<F>(name: &'static str, f: F) -> Arc<dyn StateMutator>
where
    F: Fn(&GameEngine, &GameState, &dyn GameEvent) -> GameState + Send + Sync + 'static,
{
    Arc::new(MutatorFn { name, f })
}

/// Place the moving piece on the destination tile.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovePiece;

impl StateMutator for MovePiece {
    fn mutate(&self, _engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> GameState {
        match event.downcast_ref::<MovePieceEvent>() {
            Some(mv) => state.with_states([ArtifactState::piece_at(mv.piece.clone(), mv.to.clone())]),
            None => state.clone(),
        }
    }

    fn name(&self) -> &str {
        "move-piece"
    }
}

/// Remove every other piece on the destination and mark it captured.
///
/// Apply before [`MovePiece`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CaptureAtDestination;

impl StateMutator for CaptureAtDestination {
    fn mutate(&self, _engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> GameState {
        let Some(mv) = event.downcast_ref::<MovePieceEvent>() else {
            return state.clone();
        };
        let captured: Vec<_> = state
            .pieces_on(&mv.to)
            .filter(|&occupant| *occupant != mv.piece)
            .cloned()
            .collect();

        captured.into_iter().fold(state.clone(), |next, occupant| {
            next.without_state(&occupant, &StateKind::Piece)
                .with_states([ArtifactState::captured(occupant)])
        })
    }

    fn name(&self) -> &str {
        "capture-at-destination"
    }
}

/// Set dice faces from a [`RollDiceEvent`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SetDiceValues;

impl StateMutator for SetDiceValues {
    fn mutate(&self, _engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> GameState {
        match event.downcast_ref::<RollDiceEvent>() {
            Some(roll) => state.with_states(
                roll.values
                    .iter()
                    .map(|(dice, value)| ArtifactState::dice(dice.clone(), Some(*value))),
            ),
            None => state.clone(),
        }
    }

    fn name(&self) -> &str {
        "set-dice-values"
    }
}

/// Roll the dice of a [`RollRandomDiceEvent`] with the state's RNG.
///
/// The advanced RNG position is stored in the resulting state, so replaying
/// the same events from the same snapshot rolls the same faces.
#[derive(Clone, Copy, Debug, Default)]
pub struct RollRandomDice;

impl StateMutator for RollRandomDice {
    fn mutate(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> GameState {
        let Some(roll) = event.downcast_ref::<RollRandomDiceEvent>() else {
            return state.clone();
        };
        let mut rng = GameRng::from_state(&state.rng_state());
        let faces: Vec<_> = roll
            .dice
            .iter()
            .filter_map(|id| engine.game().dice(id))
            .map(|dice| ArtifactState::dice(dice.id().clone(), Some(rng.roll(dice.faces()))))
            .collect();

        state.with_states(faces).with_rng_state(rng.state())
    }

    fn name(&self) -> &str {
        "roll-random-dice"
    }
}

/// Hand the turn to the next player in declaration order, wrapping around.
///
/// With no active player the first declared player becomes active.
#[derive(Clone, Copy, Debug, Default)]
pub struct NextActivePlayer;

impl StateMutator for NextActivePlayer {
    fn mutate(&self, engine: &GameEngine, state: &GameState, _event: &dyn GameEvent) -> GameState {
        let game = engine.game();
        let current = state.active_player();
        let next = match current {
            Some(player) => game.next_player(player),
            None => game.players().first(),
        };
        let Some(next) = next else {
            return state.clone();
        };

        let mut changes = Vec::with_capacity(2);
        if let Some(player) = current {
            changes.push(ArtifactState::active_player(player.clone(), false));
        }
        changes.push(ArtifactState::active_player(next.clone(), true));
        state.with_states(changes)
    }

    fn name(&self) -> &str {
        "next-active-player"
    }
}
