//! Immutable game state snapshots.
//!
//! ## ArtifactState
//!
//! One payload tied to exactly one artifact: a piece on a tile, a dice face,
//! the active-player marker, a captured marker, or a game-defined custom
//! value. A snapshot holds at most one state per `(artifact, kind)` pair.
//!
//! ## GameState
//!
//! Snapshot of every artifact state plus "extras" (singleton records not
//! tied to one artifact) and the RNG position. Uses `im` persistent maps:
//! producing the next snapshot copies only the changed paths, and entries
//! that did not change stay reference-identical (`Arc::ptr_eq`) to the
//! previous snapshot.
//!
//! ```
//! use std::sync::Arc;
//! use tabletop_engine::core::{ArtifactState, GameState, StateKind};
//!
//! let s0 = GameState::new(0).with_states([
//!     ArtifactState::piece_at("rook", "a1"),
//!     ArtifactState::piece_at("king", "e1"),
//! ]);
//! let s1 = s0.with_states([ArtifactState::piece_at("rook", "a4")]);
//!
//! assert_eq!(s1.piece_tile(&"rook".into()).map(|t| t.as_str()), Some("a4"));
//! assert!(Arc::ptr_eq(
//!     s0.get(&"king".into(), &StateKind::Piece).unwrap(),
//!     s1.get(&"king".into(), &StateKind::Piece).unwrap(),
//! ));
//! ```

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use im::{OrdMap, OrdSet};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use super::artifact::ArtifactId;
use super::rng::GameRngState;
use super::value::StateValue;

/// Discriminant of an [`ArtifactState`]. One state per kind per artifact.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Piece,
    Dice,
    ActivePlayer,
    Captured,
    Custom(Arc<str>),
}

impl StateKind {
    /// Custom state kind.
    pub fn custom(name: impl AsRef<str>) -> Self {
        StateKind::Custom(Arc::from(name.as_ref()))
    }
}

/// State of a single artifact.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactState {
    /// Piece standing on a tile.
    Piece { piece: ArtifactId, tile: ArtifactId },
    /// Dice showing a face; `None` before the first roll.
    Dice { dice: ArtifactId, value: Option<i64> },
    /// Whether a player is the one to act.
    ActivePlayer { player: ArtifactId, active: bool },
    /// Piece removed from the board.
    Captured { piece: ArtifactId },
    /// Game-defined payload.
    Custom {
        artifact: ArtifactId,
        kind: Arc<str>,
        value: StateValue,
    },
}

impl ArtifactState {
    pub fn piece_at(piece: impl Into<ArtifactId>, tile: impl Into<ArtifactId>) -> Self {
        ArtifactState::Piece {
            piece: piece.into(),
            tile: tile.into(),
        }
    }

    pub fn dice(dice: impl Into<ArtifactId>, value: Option<i64>) -> Self {
        ArtifactState::Dice {
            dice: dice.into(),
            value,
        }
    }

    pub fn active_player(player: impl Into<ArtifactId>, active: bool) -> Self {
        ArtifactState::ActivePlayer {
            player: player.into(),
            active,
        }
    }

    pub fn captured(piece: impl Into<ArtifactId>) -> Self {
        ArtifactState::Captured { piece: piece.into() }
    }

    pub fn custom(
        artifact: impl Into<ArtifactId>,
        kind: impl AsRef<str>,
        value: impl Into<StateValue>,
    ) -> Self {
        ArtifactState::Custom {
            artifact: artifact.into(),
            kind: Arc::from(kind.as_ref()),
            value: value.into(),
        }
    }

    /// The artifact this state belongs to.
    #[must_use]
    pub fn artifact(&self) -> &ArtifactId {
        match self {
            ArtifactState::Piece { piece, .. } => piece,
            ArtifactState::Dice { dice, .. } => dice,
            ArtifactState::ActivePlayer { player, .. } => player,
            ArtifactState::Captured { piece } => piece,
            ArtifactState::Custom { artifact, .. } => artifact,
        }
    }

    #[must_use]
    pub fn kind(&self) -> StateKind {
        match self {
            ArtifactState::Piece { .. } => StateKind::Piece,
            ArtifactState::Dice { .. } => StateKind::Dice,
            ArtifactState::ActivePlayer { .. } => StateKind::ActivePlayer,
            ArtifactState::Captured { .. } => StateKind::Captured,
            ArtifactState::Custom { kind, .. } => StateKind::Custom(Arc::clone(kind)),
        }
    }
}

/// Map key: one entry per artifact and state kind.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
struct StateKey {
    artifact: ArtifactId,
    kind: StateKind,
}

impl StateKey {
    fn of(state: &ArtifactState) -> Self {
        Self {
            artifact: state.artifact().clone(),
            kind: state.kind(),
        }
    }
}

/// Immutable snapshot of everything that changes during play.
///
/// Cloning is O(1). All "modifying" methods return a new snapshot and leave
/// `self` untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// Artifact states by (artifact, kind).
    states: OrdMap<StateKey, Arc<ArtifactState>>,

    /// Index: tile -> pieces standing on it.
    occupancy: OrdMap<ArtifactId, OrdSet<ArtifactId>>,

    /// Index: state kind -> artifacts carrying that kind.
    kinds: OrdMap<StateKind, OrdSet<ArtifactId>>,

    /// Singleton auxiliary records keyed by semantic name.
    extras: OrdMap<Arc<str>, Arc<StateValue>>,

    /// RNG position for replayable randomness.
    rng: GameRngState,
}

impl GameState {
    /// Create an empty snapshot whose RNG is seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRngState::seeded(seed),
            ..Self::default()
        }
    }

    // === Lookup ===

    /// Get the state of `kind` for `artifact`.
    #[must_use]
    pub fn get(&self, artifact: &ArtifactId, kind: &StateKind) -> Option<&Arc<ArtifactState>> {
        let key = StateKey {
            artifact: artifact.clone(),
            kind: kind.clone(),
        };
        self.states.get(&key)
    }

    /// Check whether `artifact` carries a state of `kind`.
    #[must_use]
    pub fn has(&self, artifact: &ArtifactId, kind: &StateKind) -> bool {
        self.kinds.get(kind).is_some_and(|set| set.contains(artifact))
    }

    /// Tile a piece currently stands on.
    #[must_use]
    pub fn piece_tile(&self, piece: &ArtifactId) -> Option<&ArtifactId> {
        match self.get(piece, &StateKind::Piece).map(Arc::as_ref) {
            Some(ArtifactState::Piece { tile, .. }) => Some(tile),
            _ => None,
        }
    }

    /// Pieces standing on `tile`, in id order.
    pub fn pieces_on<'a>(&'a self, tile: &ArtifactId) -> impl Iterator<Item = &'a ArtifactId> + 'a {
        self.occupancy.get(tile).into_iter().flat_map(|set| set.iter())
    }

    /// Check whether any piece stands on `tile`.
    #[must_use]
    pub fn is_occupied(&self, tile: &ArtifactId) -> bool {
        self.occupancy.get(tile).is_some_and(|set| !set.is_empty())
    }

    /// Current face of a dice, `None` if never rolled.
    #[must_use]
    pub fn dice_value(&self, dice: &ArtifactId) -> Option<i64> {
        match self.get(dice, &StateKind::Dice).map(Arc::as_ref) {
            Some(ArtifactState::Dice { value, .. }) => *value,
            _ => None,
        }
    }

    /// The first player (in id order) marked active.
    #[must_use]
    pub fn active_player(&self) -> Option<&ArtifactId> {
        self.artifacts_with(&StateKind::ActivePlayer).find(|player| {
            matches!(
                self.get(player, &StateKind::ActivePlayer).map(Arc::as_ref),
                Some(ArtifactState::ActivePlayer { active: true, .. })
            )
        })
    }

    #[must_use]
    pub fn is_captured(&self, piece: &ArtifactId) -> bool {
        self.has(piece, &StateKind::Captured)
    }

    /// Value of a custom state.
    #[must_use]
    pub fn custom(&self, artifact: &ArtifactId, kind: &str) -> Option<&StateValue> {
        match self.get(artifact, &StateKind::custom(kind)).map(Arc::as_ref) {
            Some(ArtifactState::Custom { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Artifacts carrying a state of `kind`, in id order.
    pub fn artifacts_with<'a>(&'a self, kind: &StateKind) -> impl Iterator<Item = &'a ArtifactId> + 'a {
        self.kinds.get(kind).into_iter().flat_map(|set| set.iter())
    }

    /// States of one kind, in artifact id order.
    pub fn states_of_kind<'a>(
        &'a self,
        kind: &'a StateKind,
    ) -> impl Iterator<Item = &'a Arc<ArtifactState>> + 'a {
        self.artifacts_with(kind)
            .filter_map(move |artifact| self.get(artifact, kind))
    }

    /// Iterate every state in (artifact, kind) order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ArtifactState>> {
        self.states.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    // === Extras ===

    /// Get an auxiliary record.
    #[must_use]
    pub fn extras(&self, key: &str) -> Option<&StateValue> {
        self.extras.get(key).map(Arc::as_ref)
    }

    /// New snapshot with an auxiliary record replaced.
    #[must_use]
    pub fn with_extras(&self, key: impl AsRef<str>, value: impl Into<StateValue>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        let key: Arc<str> = Arc::from(key.as_ref());
        if next.extras.get(&key).is_some_and(|current| **current == value) {
            return next;
        }
        next.extras.insert(key, Arc::new(value));
        next
    }

    // === RNG ===

    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng
    }

    /// New snapshot with the RNG advanced to `rng`.
    #[must_use]
    pub fn with_rng_state(&self, rng: GameRngState) -> Self {
        let mut next = self.clone();
        next.rng = rng;
        next
    }

    // === Transitions ===

    /// New snapshot with `changes` replacing existing entries.
    ///
    /// Entries equal to the current value keep their existing allocation.
    #[must_use]
    pub fn with_states(&self, changes: impl IntoIterator<Item = ArtifactState>) -> Self {
        let mut next = self.clone();
        for state in changes {
            next.put(state);
        }
        next
    }

    /// New snapshot with the `(artifact, kind)` entry removed.
    #[must_use]
    pub fn without_state(&self, artifact: &ArtifactId, kind: &StateKind) -> Self {
        let mut next = self.clone();
        next.remove(artifact, kind);
        next
    }

    fn put(&mut self, state: ArtifactState) {
        let key = StateKey::of(&state);
        if self.states.get(&key).is_some_and(|current| **current == state) {
            return;
        }

        if let ArtifactState::Piece { piece, tile } = &state {
            self.vacate(piece);
            Self::index_insert(&mut self.occupancy, tile.clone(), piece.clone());
        }
        Self::index_insert(&mut self.kinds, key.kind.clone(), key.artifact.clone());
        self.states.insert(key, Arc::new(state));
    }

    fn remove(&mut self, artifact: &ArtifactId, kind: &StateKind) {
        if *kind == StateKind::Piece {
            self.vacate(artifact);
        }
        let key = StateKey {
            artifact: artifact.clone(),
            kind: kind.clone(),
        };
        if self.states.remove(&key).is_some() {
            Self::index_remove(&mut self.kinds, kind, artifact);
        }
    }

    /// Drop a piece from the occupancy index of the tile it stands on.
    fn vacate(&mut self, piece: &ArtifactId) {
        if let Some(tile) = self.piece_tile(piece).cloned() {
            Self::index_remove(&mut self.occupancy, &tile, piece);
        }
    }

    fn index_insert<K: Ord + Clone>(
        index: &mut OrdMap<K, OrdSet<ArtifactId>>,
        key: K,
        artifact: ArtifactId,
    ) {
        let mut set = index.get(&key).cloned().unwrap_or_default();
        set.insert(artifact);
        index.insert(key, set);
    }

    // Empty sets are removed so equal snapshots compare equal regardless of history.
    fn index_remove<K: Ord + Clone>(
        index: &mut OrdMap<K, OrdSet<ArtifactId>>,
        key: &K,
        artifact: &ArtifactId,
    ) {
        let Some(mut set) = index.get(key).cloned() else {
            return;
        };
        set.remove(artifact);
        if set.is_empty() {
            index.remove(key);
        } else {
            index.insert(key.clone(), set);
        }
    }

    // === Comparison & snapshots ===

    /// Deterministic 64-bit digest of the full snapshot.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Canonical byte encoding (keys are ordered, so equal states encode identically).
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a snapshot produced by [`GameState::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ArtifactId {
        ArtifactId::new(s)
    }

    fn board_state() -> GameState {
        GameState::new(42).with_states([
            ArtifactState::piece_at("rook", "a1"),
            ArtifactState::piece_at("king", "e1"),
            ArtifactState::dice("d6", None),
            ArtifactState::active_player("white", true),
            ArtifactState::active_player("black", false),
        ])
    }

    #[test]
    fn test_lookup() {
        let state = board_state();

        assert_eq!(state.len(), 5);
        assert_eq!(state.piece_tile(&id("rook")), Some(&id("a1")));
        assert_eq!(state.dice_value(&id("d6")), None);
        assert_eq!(state.active_player(), Some(&id("white")));
        assert!(state.is_occupied(&id("e1")));
        assert!(!state.is_occupied(&id("e2")));
    }

    #[test]
    fn test_one_state_per_kind() {
        let state = board_state().with_states([ArtifactState::piece_at("rook", "a2")]);

        assert_eq!(state.len(), 5);
        assert_eq!(state.piece_tile(&id("rook")), Some(&id("a2")));
    }

    #[test]
    fn test_occupancy_follows_moves() {
        let state = board_state().with_states([ArtifactState::piece_at("rook", "e1")]);

        assert!(!state.is_occupied(&id("a1")));
        let on_e1: Vec<_> = state.pieces_on(&id("e1")).cloned().collect();
        assert_eq!(on_e1, vec![id("king"), id("rook")]);
    }

    #[test]
    fn test_previous_snapshot_untouched() {
        let before = board_state();
        let after = before.with_states([ArtifactState::dice("d6", Some(4))]);

        assert_eq!(before.dice_value(&id("d6")), None);
        assert_eq!(after.dice_value(&id("d6")), Some(4));
    }

    #[test]
    fn test_structural_sharing() {
        let before = board_state();
        let after = before.with_states([ArtifactState::piece_at("rook", "a8")]);

        let king_before = before.get(&id("king"), &StateKind::Piece).unwrap();
        let king_after = after.get(&id("king"), &StateKind::Piece).unwrap();
        assert!(Arc::ptr_eq(king_before, king_after));

        let rook_before = before.get(&id("rook"), &StateKind::Piece).unwrap();
        let rook_after = after.get(&id("rook"), &StateKind::Piece).unwrap();
        assert!(!Arc::ptr_eq(rook_before, rook_after));
    }

    #[test]
    fn test_equal_update_keeps_allocation() {
        let before = board_state();
        let after = before.with_states([ArtifactState::piece_at("rook", "a1")]);

        assert!(Arc::ptr_eq(
            before.get(&id("rook"), &StateKind::Piece).unwrap(),
            after.get(&id("rook"), &StateKind::Piece).unwrap(),
        ));
        assert_eq!(before, after);
    }

    #[test]
    fn test_without_state() {
        let state = board_state()
            .without_state(&id("rook"), &StateKind::Piece)
            .with_states([ArtifactState::captured("rook")]);

        assert_eq!(state.piece_tile(&id("rook")), None);
        assert!(!state.is_occupied(&id("a1")));
        assert!(state.is_captured(&id("rook")));
    }

    #[test]
    fn test_history_independent_equality() {
        let direct = board_state().with_states([ArtifactState::piece_at("rook", "a3")]);
        let detour = board_state()
            .with_states([ArtifactState::piece_at("rook", "h8")])
            .with_states([ArtifactState::piece_at("rook", "a3")]);

        assert_eq!(direct, detour);
        assert_eq!(direct.fingerprint(), detour.fingerprint());
    }

    #[test]
    fn test_custom_and_extras() {
        let state = GameState::new(0)
            .with_states([ArtifactState::custom("white", "cash", 1500i64)])
            .with_extras("bank", StateValue::record().with_field("houses", 32i64));

        assert_eq!(state.custom(&id("white"), "cash").and_then(StateValue::as_int), Some(1500));
        assert_eq!(
            state
                .extras("bank")
                .and_then(|bank| bank.field("houses"))
                .and_then(StateValue::as_int),
            Some(32)
        );
        assert_eq!(state.extras("missing"), None);
    }

    #[test]
    fn test_states_of_kind() {
        let state = board_state();
        let players: Vec<_> = state
            .states_of_kind(&StateKind::ActivePlayer)
            .map(|s| s.artifact().clone())
            .collect();
        assert_eq!(players, vec![id("black"), id("white")]);
    }

    #[test]
    fn test_encode_roundtrip() {
        let state = board_state().with_extras("turn", 3i64);
        let bytes = state.encode().unwrap();
        let decoded = GameState::decode(&bytes).unwrap();

        assert_eq!(decoded, state);
        assert_eq!(decoded.encode().unwrap(), bytes);
    }
}
