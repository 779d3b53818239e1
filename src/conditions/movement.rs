//! Standard predicates over [`MovePieceEvent`].
//!
//! Each predicate answers *ignore* for any other event type, so they can be
//! grouped freely with predicates written for other events:
//!
//! ```
//! use tabletop_engine::conditions::{
//!     DestinationIsEmpty, EventCondition, PathIsClear, PieceIsOnOrigin, PieceOwnedByActivePlayer,
//! };
//!
//! let legal_move = EventCondition::all([
//!     EventCondition::predicate(PieceOwnedByActivePlayer),
//!     EventCondition::predicate(PieceIsOnOrigin),
//!     EventCondition::predicate(PathIsClear),
//!     EventCondition::predicate(DestinationIsEmpty),
//! ]);
//! assert_eq!(legal_move.leaf_count(), 4);
//! ```

use crate::core::GameState;
use crate::engine::GameEngine;
use crate::rules::{GameEvent, MovePieceEvent};

use super::composite::EventPredicate;
use super::response::ConditionResponse;

fn as_move(event: &dyn GameEvent) -> Option<&MovePieceEvent> {
    event.downcast_ref::<MovePieceEvent>()
}

/// The moving piece belongs to the active player.
///
/// Ignores the event when no player holds the turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct PieceOwnedByActivePlayer;

impl EventPredicate for PieceOwnedByActivePlayer {
    fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        let Some(mv) = as_move(event) else {
            return ConditionResponse::IGNORE;
        };
        let Some(active) = state.active_player() else {
            return ConditionResponse::ignore("no active player");
        };
        let owned = engine
            .game()
            .artifact(&mv.piece)
            .is_some_and(|artifact| artifact.is_owned_by(active));
        if owned {
            ConditionResponse::VALID
        } else {
            ConditionResponse::fail(format!("{} is not owned by {}", mv.piece, active))
        }
    }

    fn name(&self) -> &str {
        "piece-owned-by-active-player"
    }
}

/// The piece currently stands on the move's origin tile.
#[derive(Clone, Copy, Debug, Default)]
pub struct PieceIsOnOrigin;

impl EventPredicate for PieceIsOnOrigin {
    fn evaluate(&self, _engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        let Some(mv) = as_move(event) else {
            return ConditionResponse::IGNORE;
        };
        match state.piece_tile(&mv.piece) {
            Some(tile) if *tile == mv.from => ConditionResponse::VALID,
            Some(tile) => ConditionResponse::fail(format!("{} is on {}, not {}", mv.piece, tile, mv.from)),
            None => ConditionResponse::fail(format!("{} is not on the board", mv.piece)),
        }
    }

    fn name(&self) -> &str {
        "piece-is-on-origin"
    }
}

/// No piece stands on the destination tile.
#[derive(Clone, Copy, Debug, Default)]
pub struct DestinationIsEmpty;

impl EventPredicate for DestinationIsEmpty {
    fn evaluate(&self, _engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        let Some(mv) = as_move(event) else {
            return ConditionResponse::IGNORE;
        };
        if state.is_occupied(&mv.to) {
            ConditionResponse::fail(format!("{} is occupied", mv.to))
        } else {
            ConditionResponse::VALID
        }
    }

    fn name(&self) -> &str {
        "destination-is-empty"
    }
}

/// Every tile strictly between origin and destination is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathIsClear;

impl EventPredicate for PathIsClear {
    fn evaluate(&self, _engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        let Some(mv) = as_move(event) else {
            return ConditionResponse::IGNORE;
        };
        match mv.path.intermediate().find(|tile| state.is_occupied(tile)) {
            Some(blocked) => ConditionResponse::fail(format!("path blocked at {blocked}")),
            None => ConditionResponse::VALID,
        }
    }

    fn name(&self) -> &str {
        "path-is-clear"
    }
}

/// The destination holds a piece of another owner.
///
/// Ignores moves onto empty tiles; rejects moves onto a friendly piece.
#[derive(Clone, Copy, Debug, Default)]
pub struct DestinationHasOpponent;

impl EventPredicate for DestinationHasOpponent {
    fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        let Some(mv) = as_move(event) else {
            return ConditionResponse::IGNORE;
        };
        let game = engine.game();
        let mover = game.artifact(&mv.piece).and_then(|artifact| artifact.owner());

        let mut occupants = state.pieces_on(&mv.to).filter(|&occupant| *occupant != mv.piece).peekable();
        if occupants.peek().is_none() {
            return ConditionResponse::ignore("destination is empty");
        }
        let opponent = occupants.any(|occupant| {
            let owner = game.artifact(occupant).and_then(|artifact| artifact.owner());
            owner != mover
        });
        if opponent {
            ConditionResponse::VALID
        } else {
            ConditionResponse::fail(format!("{} holds a friendly piece", mv.to))
        }
    }

    fn name(&self) -> &str {
        "destination-has-opponent"
    }
}

/// The event's path is the one the piece's movement patterns produce.
///
/// Guards against hand-built events whose path was not resolved by the
/// engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct FollowsMovementPattern;

impl EventPredicate for FollowsMovementPattern {
    fn evaluate(&self, engine: &GameEngine, _state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        let Some(mv) = as_move(event) else {
            return ConditionResponse::IGNORE;
        };
        match engine.resolve_path(&mv.piece, &mv.from, &mv.to) {
            Some(path) if path == mv.path => ConditionResponse::VALID,
            Some(_) => ConditionResponse::fail("path differs from the piece's movement pattern"),
            None => ConditionResponse::fail(format!("{} cannot reach {} from {}", mv.piece, mv.to, mv.from)),
        }
    }

    fn name(&self) -> &str {
        "follows-movement-pattern"
    }
}
