//! Artifact identification.
//!
//! Every game object (tile, player, piece, dice, custom marker) is an
//! `Artifact`: an identity with no mutable fields. Everything that changes
//! during play lives in [`GameState`](super::GameState), keyed by
//! [`ArtifactId`].
//!
//! ## Usage
//!
//! ```
//! use tabletop_engine::core::{Artifact, ArtifactId, ArtifactKind};
//!
//! let rook = Artifact::piece("white-rook", Some(ArtifactId::new("white")));
//! let same = Artifact::new("white-rook", ArtifactKind::Tile);
//!
//! // Identity equality: kind and owner are not compared.
//! assert_eq!(rook, same);
//! assert!(rook.is_owned_by(&ArtifactId::new("white")));
//! ```

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque identifier for any artifact.
///
/// Cheap to clone (shared string). Ordered so that state maps iterate in a
/// stable order regardless of insertion history.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactId(Arc<str>);

impl ArtifactId {
    /// Create a new artifact ID.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArtifactId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ArtifactId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What sort of object an artifact is.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    Tile,
    Player,
    Piece,
    Dice,
    /// Game-defined marker (tokens, counters, decks...).
    Custom(Arc<str>),
}

impl ArtifactKind {
    /// Name used in diagnostics and build errors.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ArtifactKind::Tile => "tile",
            ArtifactKind::Player => "player",
            ArtifactKind::Piece => "piece",
            ArtifactKind::Dice => "dice",
            ArtifactKind::Custom(name) => name,
        }
    }
}

/// An identity-only game object.
///
/// Equality and hashing use the id alone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artifact {
    id: ArtifactId,
    kind: ArtifactKind,
    owner: Option<ArtifactId>,
}

impl Artifact {
    /// Create an unowned artifact.
    pub fn new(id: impl Into<ArtifactId>, kind: ArtifactKind) -> Self {
        Self {
            id: id.into(),
            kind,
            owner: None,
        }
    }

    /// Create a piece artifact with an optional owning player.
    pub fn piece(id: impl Into<ArtifactId>, owner: Option<ArtifactId>) -> Self {
        Self {
            id: id.into(),
            kind: ArtifactKind::Piece,
            owner,
        }
    }

    /// Set the owning player (builder pattern).
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<ArtifactId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    #[must_use]
    pub fn owner(&self) -> Option<&ArtifactId> {
        self.owner.as_ref()
    }

    /// Check whether this artifact is owned by `player`.
    #[must_use]
    pub fn is_owned_by(&self, player: &ArtifactId) -> bool {
        self.owner.as_ref() == Some(player)
    }
}

impl PartialEq for Artifact {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Artifact {}

impl Hash for Artifact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind.name(), self.id)
    }
}
