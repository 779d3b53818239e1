//! Movement patterns.
//!
//! A pattern describes how a piece may travel across relations:
//!
//! - `Direction`: one direction, one step or repeated (rook file moves)
//! - `MultiDirection`: any one of several directions (queen, king)
//! - `Fixed`: an exact sequence of steps (knight jumps)
//! - `Null`: never resolves (what a zero-direction declaration collapses to)

use serde::{Deserialize, Serialize};

use super::topology::DirectionId;

/// How a piece may move.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Never produces a path.
    Null,

    /// Follow one direction; repeatable patterns keep stepping.
    Direction {
        direction: DirectionId,
        repeatable: bool,
    },

    /// Follow any one of the directions (never mixing them).
    MultiDirection {
        directions: Vec<DirectionId>,
        repeatable: bool,
    },

    /// Follow exactly these steps in order.
    Fixed { steps: Vec<DirectionId> },
}

impl MovementPattern {
    /// Assemble a pattern from declared directions.
    ///
    /// - no directions: `Null`
    /// - `sequence`: `Fixed`
    /// - one direction: `Direction`
    /// - several directions: `MultiDirection`
    #[must_use]
    pub fn assemble(directions: Vec<DirectionId>, repeatable: bool, sequence: bool) -> Self {
        if directions.is_empty() {
            return MovementPattern::Null;
        }
        if sequence {
            return MovementPattern::Fixed { steps: directions };
        }
        if directions.len() == 1 {
            let mut directions = directions;
            return MovementPattern::Direction {
                direction: directions.remove(0),
                repeatable,
            };
        }
        MovementPattern::MultiDirection {
            directions,
            repeatable,
        }
    }

    /// Check if this pattern can never resolve.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, MovementPattern::Null)
    }

    /// Directions referenced by the pattern.
    pub fn directions(&self) -> impl Iterator<Item = &DirectionId> {
        let slice: &[DirectionId] = match self {
            MovementPattern::Null => &[],
            MovementPattern::Direction { direction, .. } => std::slice::from_ref(direction),
            MovementPattern::MultiDirection { directions, .. } => directions,
            MovementPattern::Fixed { steps } => steps,
        };
        slice.iter()
    }
}
