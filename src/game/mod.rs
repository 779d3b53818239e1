//! Game description and the builder that compiles it.
//!
//! - [`Game`]: immutable board, players and artifacts
//! - [`GameBuilder`]: ordered definitions in, [`GameProgress`](crate::engine::GameProgress) out
//! - definitions: [`PieceDefinition`], [`PatternDefinition`], [`PhaseDefinition`]

mod aggregate;
mod builder;
mod definition;

pub use aggregate::{Dice, Game, Piece};
pub use builder::GameBuilder;
pub use definition::{GroupDefinition, LeafDefinition, PatternDefinition, PhaseDefinition, PieceDefinition};
