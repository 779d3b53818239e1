//! Board topology and movement.
//!
//! - [`Board`]: tiles, directions, and directed relations between tiles
//! - [`MovementPattern`]: how pieces travel across relations
//! - [`PathResolver`]: capability turning a pattern into a concrete [`TilePath`]
//!
//! The reference [`PatternPathResolver`] is always available. With the
//! `compiled-paths` feature, [`CompiledPathResolver`] precomputes direction
//! rays and is consulted first; it never changes which paths exist.

mod path;
mod pattern;
mod topology;

#[cfg(feature = "compiled-paths")]
mod compiled;

pub use path::{PathResolver, PatternPathResolver, TilePath};
pub use pattern::MovementPattern;
pub use topology::{Board, DirectionId, TileRelation};

#[cfg(feature = "compiled-paths")]
pub use compiled::CompiledPathResolver;
