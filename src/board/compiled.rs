//! Precompiled direction rays (feature `compiled-paths`).
//!
//! For every tile and direction the full ray of relations is computed once
//! at compile time, so directional patterns resolve with a slice scan rather
//! than repeated hash lookups. Fixed sequences are not accelerated; the
//! resolver returns `None` and the engine falls back to
//! [`PatternPathResolver`](super::PatternPathResolver).

use rustc_hash::FxHashMap;

use crate::core::ArtifactId;

use super::path::{PathResolver, TilePath};
use super::pattern::MovementPattern;
use super::topology::{Board, DirectionId, TileRelation};

/// Direction-ray table.
#[derive(Clone, Debug, Default)]
pub struct CompiledPathResolver {
    rays: FxHashMap<(ArtifactId, DirectionId), Vec<TileRelation>>,
}

impl CompiledPathResolver {
    /// Precompute rays for every (tile, direction) pair of `board`.
    ///
    /// Rays stop at the board edge or after as many steps as the board has
    /// tiles, matching the reference walker.
    #[must_use]
    pub fn compile(board: &Board) -> Self {
        let limit = board.tiles().len().max(1);
        let mut rays = FxHashMap::default();

        for tile in board.tiles() {
            for direction in board.directions() {
                let mut ray = Vec::new();
                let mut current = tile;
                while ray.len() < limit {
                    let Some(relation) = board.relation_from(current, direction) else {
                        break;
                    };
                    ray.push(relation.clone());
                    current = &relation.to;
                }
                if !ray.is_empty() {
                    rays.insert((tile.clone(), direction.clone()), ray);
                }
            }
        }

        Self { rays }
    }

    /// Number of precomputed rays.
    #[must_use]
    pub fn ray_count(&self) -> usize {
        self.rays.len()
    }

    fn along(&self, from: &ArtifactId, to: &ArtifactId, direction: &DirectionId, repeatable: bool) -> Option<TilePath> {
        let ray = self.rays.get(&(from.clone(), direction.clone()))?;
        let reach = if repeatable { ray.len() } else { 1 };
        let end = ray[..reach].iter().position(|relation| relation.to == *to)?;
        TilePath::new(ray[..=end].iter().cloned())
    }
}

impl PathResolver for CompiledPathResolver {
    fn name(&self) -> &'static str {
        "compiled-rays"
    }

    fn resolve(
        &self,
        _board: &Board,
        pattern: &MovementPattern,
        from: &ArtifactId,
        to: &ArtifactId,
    ) -> Option<TilePath> {
        if from == to {
            return None;
        }
        match pattern {
            MovementPattern::Direction {
                direction,
                repeatable,
            } => self.along(from, to, direction, *repeatable),
            MovementPattern::MultiDirection {
                directions,
                repeatable,
            } => directions
                .iter()
                .find_map(|direction| self.along(from, to, direction, *repeatable)),
            MovementPattern::Null | MovementPattern::Fixed { .. } => None,
        }
    }
}
