//! Compiled, immutable game description.

use rustc_hash::FxHashMap;

use crate::board::{Board, MovementPattern};
use crate::core::{Artifact, ArtifactId, ArtifactKind};

/// A piece and its movement patterns, in declaration order.
#[derive(Clone, Debug)]
pub struct Piece {
    artifact: Artifact,
    patterns: Vec<MovementPattern>,
}

impl Piece {
    pub(crate) fn new(artifact: Artifact, patterns: Vec<MovementPattern>) -> Self {
        Self { artifact, patterns }
    }

    #[must_use]
    pub fn id(&self) -> &ArtifactId {
        self.artifact.id()
    }

    #[must_use]
    pub fn owner(&self) -> Option<&ArtifactId> {
        self.artifact.owner()
    }

    #[must_use]
    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    #[must_use]
    pub fn patterns(&self) -> &[MovementPattern] {
        &self.patterns
    }
}

/// A dice and its face count.
#[derive(Clone, Debug)]
pub struct Dice {
    artifact: Artifact,
    faces: u32,
}

impl Dice {
    pub(crate) fn new(artifact: Artifact, faces: u32) -> Self {
        Self { artifact, faces }
    }

    #[must_use]
    pub fn id(&self) -> &ArtifactId {
        self.artifact.id()
    }

    #[must_use]
    pub fn faces(&self) -> u32 {
        self.faces
    }
}

/// Board, players and artifacts. Built once by the builder; read-only after.
#[derive(Clone, Debug, Default)]
pub struct Game {
    board: Board,
    players: Vec<ArtifactId>,
    artifacts: FxHashMap<ArtifactId, Artifact>,
    pieces: FxHashMap<ArtifactId, Piece>,
    dice: FxHashMap<ArtifactId, Dice>,
}

impl Game {
    pub(crate) fn new(
        board: Board,
        players: Vec<ArtifactId>,
        artifacts: FxHashMap<ArtifactId, Artifact>,
        pieces: Vec<Piece>,
        dice: Vec<Dice>,
    ) -> Self {
        Self {
            board,
            players,
            artifacts,
            pieces: pieces.into_iter().map(|p| (p.id().clone(), p)).collect(),
            dice: dice.into_iter().map(|d| (d.id().clone(), d)).collect(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Players in declaration (turn) order.
    #[must_use]
    pub fn players(&self) -> &[ArtifactId] {
        &self.players
    }

    /// Player after `player` in turn order, wrapping around.
    #[must_use]
    pub fn next_player(&self, player: &ArtifactId) -> Option<&ArtifactId> {
        let position = self.players.iter().position(|p| p == player)?;
        self.players.get((position + 1) % self.players.len())
    }

    /// Any artifact by id.
    #[must_use]
    pub fn artifact(&self, id: &ArtifactId) -> Option<&Artifact> {
        self.artifacts.get(id)
    }

    /// Check whether `id` names an artifact of `kind`.
    #[must_use]
    pub fn is_kind(&self, id: &ArtifactId, kind: &ArtifactKind) -> bool {
        self.artifacts.get(id).is_some_and(|artifact| artifact.kind() == kind)
    }

    #[must_use]
    pub fn piece(&self, id: &ArtifactId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    #[must_use]
    pub fn dice(&self, id: &ArtifactId) -> Option<&Dice> {
        self.dice.get(id)
    }

    /// Total number of artifacts of every kind.
    #[must_use]
    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }
}
