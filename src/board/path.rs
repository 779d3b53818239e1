//! Path resolution.
//!
//! A [`PathResolver`] answers "can this pattern take a piece from `from` to
//! `to`, and through which relations?". [`PatternPathResolver`] walks the
//! board graph directly and is always correct on its own; accelerated
//! resolvers are optional decorators consulted first by the engine.

use smallvec::SmallVec;

use crate::core::ArtifactId;

use super::pattern::MovementPattern;
use super::topology::{Board, DirectionId, TileRelation};

/// Ordered, non-empty chain of relations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TilePath {
    relations: SmallVec<[TileRelation; 4]>,
}

impl TilePath {
    /// Build a path; returns `None` for an empty or disconnected chain.
    #[must_use]
    pub fn new(relations: impl IntoIterator<Item = TileRelation>) -> Option<Self> {
        let relations: SmallVec<[TileRelation; 4]> = relations.into_iter().collect();
        if relations.is_empty() {
            return None;
        }
        let connected = relations.windows(2).all(|pair| pair[0].to == pair[1].from);
        connected.then_some(Self { relations })
    }

    /// Tile the path starts on.
    #[must_use]
    pub fn from(&self) -> &ArtifactId {
        &self.relations[0].from
    }

    /// Tile the path ends on.
    #[must_use]
    pub fn to(&self) -> &ArtifactId {
        &self.relations[self.relations.len() - 1].to
    }

    #[must_use]
    pub fn relations(&self) -> &[TileRelation] {
        &self.relations
    }

    /// Every tile on the path, origin and destination included.
    pub fn tiles(&self) -> impl Iterator<Item = &ArtifactId> {
        std::iter::once(self.from()).chain(self.relations.iter().map(|r| &r.to))
    }

    /// Tiles strictly between origin and destination.
    pub fn intermediate(&self) -> impl Iterator<Item = &ArtifactId> {
        let last = self.relations.len() - 1;
        self.relations[..last].iter().map(|r| &r.to)
    }

    /// Sum of relation distances.
    #[must_use]
    pub fn distance(&self) -> u32 {
        self.relations.iter().map(|r| r.distance).sum()
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Always false: paths have at least one step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// Path resolution capability.
pub trait PathResolver: Send + Sync + std::fmt::Debug {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Resolve a path for `pattern` between two tiles, if one exists.
    fn resolve(
        &self,
        board: &Board,
        pattern: &MovementPattern,
        from: &ArtifactId,
        to: &ArtifactId,
    ) -> Option<TilePath>;
}

/// Reference resolver: walks relations step by step.
///
/// Repeatable walks stop at the board edge, at the target, or after as many
/// steps as the board has tiles (cyclic tracks).
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternPathResolver;

impl PatternPathResolver {
    fn walk(
        board: &Board,
        from: &ArtifactId,
        to: &ArtifactId,
        direction: &DirectionId,
        repeatable: bool,
    ) -> Option<TilePath> {
        let mut steps: SmallVec<[TileRelation; 4]> = SmallVec::new();
        let mut current = from;

        for _ in 0..board.tiles().len().max(1) {
            let relation = board.relation_from(current, direction)?;
            steps.push(relation.clone());
            if relation.to == *to {
                return TilePath::new(steps);
            }
            if !repeatable {
                return None;
            }
            current = &relation.to;
        }
        None
    }

    fn follow(board: &Board, from: &ArtifactId, to: &ArtifactId, steps: &[DirectionId]) -> Option<TilePath> {
        let mut relations: SmallVec<[TileRelation; 4]> = SmallVec::new();
        let mut current = from;
        for direction in steps {
            let relation = board.relation_from(current, direction)?;
            relations.push(relation.clone());
            current = &relation.to;
        }
        if current == to {
            TilePath::new(relations)
        } else {
            None
        }
    }
}

impl PathResolver for PatternPathResolver {
    fn name(&self) -> &'static str {
        "pattern-walk"
    }

    fn resolve(
        &self,
        board: &Board,
        pattern: &MovementPattern,
        from: &ArtifactId,
        to: &ArtifactId,
    ) -> Option<TilePath> {
        if from == to {
            return None;
        }
        match pattern {
            MovementPattern::Null => None,
            MovementPattern::Direction {
                direction,
                repeatable,
            } => Self::walk(board, from, to, direction, *repeatable),
            MovementPattern::MultiDirection {
                directions,
                repeatable,
            } => directions
                .iter()
                .find_map(|direction| Self::walk(board, from, to, direction, *repeatable)),
            MovementPattern::Fixed { steps } => Self::follow(board, from, to, steps),
        }
    }
}
