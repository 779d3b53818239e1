//! # tabletop-engine
//!
//! A declarative rule engine for turn-based tabletop games.
//!
//! Games are described, not programmed: a board of tiles and directed
//! relations, players, pieces with movement patterns, dice, and a tree of
//! phases whose leaves each own one event rule. The builder compiles that
//! description once into an immutable engine; play is a pure function from
//! `(progress, event)` to a new progress.
//!
//! ## Design Principles
//!
//! 1. **Three-valued conditions**: every check answers *ignore*, *valid* or
//!    *invalid*. Ignore means "no opinion" and survives composition, so
//!    unrelated rules never reject an event.
//!
//! 2. **Immutable state**: [`GameState`] is a persistent map. Transitions
//!    return new snapshots that share structure with the old ones.
//!
//! 3. **Compile once**: phase trees are flattened into a [`DecisionPlan`]
//!    and optionally indexed by event type. Tree-walk evaluation stays
//!    available as a reference mode.
//!
//! 4. **Deterministic**: the RNG lives in the state, so identical event
//!    sequences from identical starting states always agree.
//!
//! ## Modules
//!
//! - `core`: artifacts, state values, state snapshots, RNG, configuration
//! - `board`: topology, movement patterns, path resolution
//! - `conditions`: three-valued responses and composable conditions
//! - `rules`: events, mutators, event rules
//! - `phases`: phase tree and decision plan
//! - `resolution`: conflict resolution between candidate rules
//! - `game`: definitions and the builder
//! - `engine`: compiled engine, event pipeline, progress
//!
//! ## Example
//!
//! ```
//! use tabletop_engine::conditions::{DestinationIsEmpty, EventCondition, PieceOwnedByActivePlayer};
//! use tabletop_engine::game::{GameBuilder, PatternDefinition, PhaseDefinition, PieceDefinition};
//! use tabletop_engine::rules::{EventRule, MovePiece, MovePieceEvent};
//!
//! let mut builder = GameBuilder::new();
//! builder
//!     .add_tile("a1")
//!     .add_tile("a2")
//!     .add_direction("up")
//!     .add_relation("a1", "a2", "up")
//!     .add_player("white")
//!     .with_active_player("white")
//!     .add_piece(
//!         PieceDefinition::new("pawn")
//!             .owned_by("white")
//!             .with_pattern(PatternDefinition::direction("up")),
//!     )
//!     .with_piece_at("pawn", "a1")
//!     .add_phase(PhaseDefinition::leaf(
//!         "move",
//!         EventRule::on::<MovePieceEvent>("step")
//!             .when(EventCondition::predicate(PieceOwnedByActivePlayer))
//!             .when(EventCondition::predicate(DestinationIsEmpty))
//!             .then(MovePiece),
//!     ));
//!
//! let progress = builder.compile().unwrap();
//! let step = progress
//!     .engine()
//!     .move_event(progress.state(), &"pawn".into(), &"a2".into())
//!     .unwrap();
//! let next = progress.handle_event(step).unwrap();
//! assert_eq!(next.state().piece_tile(&"pawn".into()).unwrap().as_str(), "a2");
//! ```

pub mod board;
pub mod conditions;
pub mod core;
pub mod engine;
pub mod error;
pub mod game;
pub mod phases;
pub mod resolution;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Artifact, ArtifactId, ArtifactKind, ArtifactState, EngineConfig, GameRng, GameRngState, GameState,
    StateKind, StateValue,
};

pub use crate::board::{Board, DirectionId, MovementPattern, PathResolver, PatternPathResolver, TilePath};

pub use crate::conditions::{
    Condition, ConditionOutcome, ConditionResponse, EventCondition, EventPredicate, StateCondition,
    StatePredicate,
};

pub use crate::rules::{EventRule, EventType, GameEvent, RuleId, RulePriority, StateMutator};

pub use crate::phases::{DecisionPlan, GamePhase, LeafPhase, PhaseId};

pub use crate::resolution::{ConflictResolution, RuleDecision, RuleMetadata};

pub use crate::game::{Game, GameBuilder, PhaseDefinition, PieceDefinition};

pub use crate::engine::{EvaluationObserver, GameEngine, GameProgress};

pub use crate::error::{BuildError, EngineError, InvalidGameEvent};
