//! Board topology: tiles, directions, and directed relations.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::ArtifactId;

/// Identifier for a direction ("north", "clockwise", "knight-ne"...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DirectionId(Arc<str>);

impl DirectionId {
    /// Create a new direction ID.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DirectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for DirectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directed edge between two tiles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRelation {
    pub from: ArtifactId,
    pub to: ArtifactId,
    pub direction: DirectionId,
    /// Movement cost of the step (1 on grid boards).
    pub distance: u32,
}

impl TileRelation {
    pub fn new(
        from: impl Into<ArtifactId>,
        to: impl Into<ArtifactId>,
        direction: impl Into<DirectionId>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            direction: direction.into(),
            distance: 1,
        }
    }

    #[must_use]
    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = distance;
        self
    }
}

/// Immutable board graph.
///
/// Relation lookup by `(tile, direction)` is O(1). At most one relation per
/// tile and direction.
#[derive(Clone, Debug, Default)]
pub struct Board {
    tiles: Vec<ArtifactId>,
    directions: Vec<DirectionId>,
    relations: Vec<TileRelation>,
    outgoing: FxHashMap<ArtifactId, FxHashMap<DirectionId, usize>>,
}

impl Board {
    /// Assemble a board. Callers (the builder) validate identifiers first.
    pub(crate) fn new(
        tiles: Vec<ArtifactId>,
        directions: Vec<DirectionId>,
        relations: Vec<TileRelation>,
    ) -> Self {
        let mut outgoing: FxHashMap<ArtifactId, FxHashMap<DirectionId, usize>> =
            FxHashMap::default();
        for (index, relation) in relations.iter().enumerate() {
            outgoing
                .entry(relation.from.clone())
                .or_default()
                .insert(relation.direction.clone(), index);
        }

        Self {
            tiles,
            directions,
            relations,
            outgoing,
        }
    }

    #[must_use]
    pub fn tiles(&self) -> &[ArtifactId] {
        &self.tiles
    }

    #[must_use]
    pub fn directions(&self) -> &[DirectionId] {
        &self.directions
    }

    #[must_use]
    pub fn relations(&self) -> &[TileRelation] {
        &self.relations
    }

    #[must_use]
    pub fn has_tile(&self, tile: &ArtifactId) -> bool {
        self.tiles.contains(tile)
    }

    /// The relation leaving `tile` in `direction`.
    #[must_use]
    pub fn relation_from(&self, tile: &ArtifactId, direction: &DirectionId) -> Option<&TileRelation> {
        self.outgoing
            .get(tile)
            .and_then(|by_direction| by_direction.get(direction))
            .map(|&index| &self.relations[index])
    }

    /// All relations leaving `tile`.
    pub fn relations_from<'a>(&'a self, tile: &ArtifactId) -> impl Iterator<Item = &'a TileRelation> + 'a {
        self.outgoing
            .get(tile)
            .into_iter()
            .flat_map(|by_direction| by_direction.values())
            .map(|&index| &self.relations[index])
    }
}
