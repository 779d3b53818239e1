//! Engine configuration.
//!
//! Games pick evaluation behavior at compile time via `EngineConfig`:
//! - which conflict resolution strategy picks among simultaneous matches
//! - decision-plan evaluation vs. phase-tree walking
//! - event-type prefiltering of the plan
//! - optional accelerated path resolution
//! - the RNG seed for the initial state
//!
//! The config is serde-friendly so it can be embedded in a game module's own
//! settings file.

use serde::{Deserialize, Serialize};

use crate::resolution::ConflictResolution;

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Strategy used when several rules are valid for the same event.
    pub conflict_resolution: ConflictResolution,

    /// Evaluate through the flattened decision plan (`true`) or by walking
    /// the phase tree to the first active leaf (`false`).
    pub decision_plan: bool,

    /// Skip plan entries whose rule is statically typed for a different
    /// event type. Only used with `decision_plan`.
    pub event_type_index: bool,

    /// Consult the compiled path resolver before the pattern walker.
    /// Has no effect unless the `compiled-paths` feature is enabled.
    pub compiled_paths: bool,

    /// Seed for the RNG stored in the initial state.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            conflict_resolution: ConflictResolution::default(),
            decision_plan: true,
            event_type_index: true,
            compiled_paths: true,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the conflict resolution strategy.
    #[must_use]
    pub fn with_conflict_resolution(mut self, strategy: ConflictResolution) -> Self {
        self.conflict_resolution = strategy;
        self
    }

    /// Evaluate by walking the phase tree instead of the decision plan.
    #[must_use]
    pub fn tree_walk(mut self) -> Self {
        self.decision_plan = false;
        self
    }

    /// Disable event-type prefiltering.
    #[must_use]
    pub fn without_event_type_index(mut self) -> Self {
        self.event_type_index = false;
        self
    }

    /// Disable the compiled path resolver.
    #[must_use]
    pub fn without_compiled_paths(mut self) -> Self {
        self.compiled_paths = false;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
