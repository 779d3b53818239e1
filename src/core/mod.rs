//! Core engine types: artifacts, state values, state snapshots, RNG,
//! configuration.
//!
//! This module contains the fundamental building blocks that are
//! game-agnostic. Games describe their content through the builder rather
//! than modifying the core.

pub mod artifact;
pub mod config;
pub mod rng;
pub mod state;
pub mod value;

pub use artifact::{Artifact, ArtifactId, ArtifactKind};
pub use config::EngineConfig;
pub use rng::{GameRng, GameRngState};
pub use state::{ArtifactState, GameState, StateKind};
pub use value::StateValue;
