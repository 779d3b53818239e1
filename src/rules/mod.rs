//! Events, mutators and event rules.
//!
//! - [`GameEvent`]: opaque event capability plus the standard events
//! - [`StateMutator`]: pure state transitions plus the standard mutators
//! - [`EventRule`]: condition + mutation, composable with `All` / `Any`

mod event;
mod mutator;
mod rule;

pub use event::{
    AsAny, EndTurnEvent, EventType, GameEvent, MovePieceEvent, RollDiceEvent, RollRandomDiceEvent,
};
pub use mutator::{
    mutator_fn, CaptureAtDestination, MovePiece, NextActivePlayer, RollRandomDice, SetDiceValues,
    StateMutator,
};
pub use rule::{EventRule, RuleId, RulePriority};
