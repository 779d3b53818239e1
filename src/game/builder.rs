//! Game builder: compiles declarative definitions into a runnable game.
//!
//! Definitions are registered imperatively, in order, then [`GameBuilder::compile`]
//! resolves every identifier reference, assembles movement patterns, builds
//! the initial state and the phase tree, and returns the starting
//! [`GameProgress`].
//!
//! `compile` is idempotent: the first result (progress or error) is cached
//! and handed out on every later call, so repeated calls return the same
//! progress instance. Registering anything after compiling is a programmer
//! error and panics.
//!
//! ```
//! use tabletop_engine::conditions::{EventCondition, PathIsClear};
//! use tabletop_engine::game::{GameBuilder, PatternDefinition, PhaseDefinition, PieceDefinition};
//! use tabletop_engine::rules::{EventRule, MovePiece, MovePieceEvent};
//!
//! let mut builder = GameBuilder::new();
//! builder
//!     .add_tile("a1")
//!     .add_tile("a2")
//!     .add_direction("north")
//!     .add_relation("a1", "a2", "north")
//!     .add_player("white")
//!     .add_piece(
//!         PieceDefinition::new("rook")
//!             .owned_by("white")
//!             .with_pattern(PatternDefinition::direction("north").repeatable()),
//!     )
//!     .with_piece_at("rook", "a1")
//!     .add_phase(PhaseDefinition::leaf(
//!         "play",
//!         EventRule::on::<MovePieceEvent>("move")
//!             .when(EventCondition::predicate(PathIsClear))
//!             .then(MovePiece),
//!     ));
//!
//! let progress = builder.compile().unwrap();
//! assert!(progress.is_same(&builder.compile().unwrap()));
//! ```

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, instrument, warn};

use crate::board::{Board, DirectionId, TileRelation};
use crate::core::{Artifact, ArtifactId, ArtifactKind, ArtifactState, EngineConfig, GameState, StateValue};
use crate::engine::{EvaluationObserver, GameEngine, GameProgress, TracingObserver};
use crate::error::BuildError;
use crate::phases::{GamePhase, LeafPhase, PhaseId};
use crate::rules::RuleId;

use super::aggregate::{Dice, Game, Piece};
use super::definition::{PhaseDefinition, PieceDefinition};

/// Id of the implicit group wrapping every declared phase. Reserved.
const ROOT_PHASE: &str = "root";

/// Compiler from definitions to a [`GameProgress`].
///
/// Not thread-safe; meant for one-time startup composition.
#[derive(Default)]
pub struct GameBuilder {
    tiles: Vec<ArtifactId>,
    directions: Vec<DirectionId>,
    relations: Vec<TileRelation>,
    players: Vec<ArtifactId>,
    dice: Vec<(ArtifactId, u32)>,
    pieces: Vec<PieceDefinition>,
    customs: Vec<(ArtifactId, Arc<str>)>,

    initial: Vec<ArtifactState>,
    active_player: Option<ArtifactId>,
    extras: Vec<(Arc<str>, StateValue)>,

    phases: Vec<PhaseDefinition>,
    config: EngineConfig,
    observer: Option<Arc<dyn EvaluationObserver>>,

    compiled: Option<Result<GameProgress, BuildError>>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn assert_open(&self) {
        assert!(
            self.compiled.is_none(),
            "GameBuilder already compiled; definitions are frozen"
        );
    }

    // === Board ===

    pub fn add_tile(&mut self, id: impl Into<ArtifactId>) -> &mut Self {
        self.assert_open();
        self.tiles.push(id.into());
        self
    }

    pub fn add_direction(&mut self, id: impl Into<DirectionId>) -> &mut Self {
        self.assert_open();
        self.directions.push(id.into());
        self
    }

    /// Directed relation of distance 1.
    pub fn add_relation(
        &mut self,
        from: impl Into<ArtifactId>,
        to: impl Into<ArtifactId>,
        direction: impl Into<DirectionId>,
    ) -> &mut Self {
        self.add_relation_with_distance(from, to, direction, 1)
    }

    pub fn add_relation_with_distance(
        &mut self,
        from: impl Into<ArtifactId>,
        to: impl Into<ArtifactId>,
        direction: impl Into<DirectionId>,
        distance: u32,
    ) -> &mut Self {
        self.assert_open();
        self.relations
            .push(TileRelation::new(from, to, direction).with_distance(distance));
        self
    }

    // === Artifacts ===

    /// Players take turns in registration order.
    pub fn add_player(&mut self, id: impl Into<ArtifactId>) -> &mut Self {
        self.assert_open();
        self.players.push(id.into());
        self
    }

    pub fn add_dice(&mut self, id: impl Into<ArtifactId>, faces: u32) -> &mut Self {
        self.assert_open();
        self.dice.push((id.into(), faces));
        self
    }

    pub fn add_piece(&mut self, piece: PieceDefinition) -> &mut Self {
        self.assert_open();
        self.pieces.push(piece);
        self
    }

    /// Game-defined artifact (tokens, decks, counters...).
    pub fn add_artifact(&mut self, id: impl Into<ArtifactId>, kind: impl AsRef<str>) -> &mut Self {
        self.assert_open();
        self.customs.push((id.into(), Arc::from(kind.as_ref())));
        self
    }

    // === Initial state ===

    pub fn with_piece_at(&mut self, piece: impl Into<ArtifactId>, tile: impl Into<ArtifactId>) -> &mut Self {
        self.with_state(ArtifactState::piece_at(piece, tile))
    }

    pub fn with_dice_value(&mut self, dice: impl Into<ArtifactId>, value: i64) -> &mut Self {
        self.with_state(ArtifactState::dice(dice, Some(value)))
    }

    /// Player holding the first turn. Every other player starts inactive.
    pub fn with_active_player(&mut self, player: impl Into<ArtifactId>) -> &mut Self {
        self.assert_open();
        self.active_player = Some(player.into());
        self
    }

    pub fn with_custom_state(
        &mut self,
        artifact: impl Into<ArtifactId>,
        kind: impl AsRef<str>,
        value: impl Into<StateValue>,
    ) -> &mut Self {
        self.with_state(ArtifactState::custom(artifact, kind, value))
    }

    /// Any starting artifact state. Later states replace earlier ones of
    /// the same kind for the same artifact.
    pub fn with_state(&mut self, state: ArtifactState) -> &mut Self {
        self.assert_open();
        self.initial.push(state);
        self
    }

    pub fn with_extras(&mut self, key: impl AsRef<str>, value: impl Into<StateValue>) -> &mut Self {
        self.assert_open();
        self.extras.push((Arc::from(key.as_ref()), value.into()));
        self
    }

    // === Rules and engine ===

    pub fn add_phase(&mut self, phase: impl Into<PhaseDefinition>) -> &mut Self {
        self.assert_open();
        self.phases.push(phase.into());
        self
    }

    pub fn with_config(&mut self, config: EngineConfig) -> &mut Self {
        self.assert_open();
        self.config = config;
        self
    }

    /// Replace the default [`TracingObserver`].
    pub fn with_observer(&mut self, observer: Arc<dyn EvaluationObserver>) -> &mut Self {
        self.assert_open();
        self.observer = Some(observer);
        self
    }

    /// Check whether `compile` has run.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Compile the definitions. Idempotent: later calls return the cached
    /// first result.
    ///
    /// # Errors
    ///
    /// Duplicate or unknown identifiers, and starting states that do not
    /// fit the declared artifacts.
    #[instrument(skip(self), name = "compile")]
    pub fn compile(&mut self) -> Result<GameProgress, BuildError> {
        if let Some(cached) = &self.compiled {
            return cached.clone();
        }

        let result = self.build();
        match &result {
            Ok(progress) => {
                let engine = progress.engine();
                debug!(
                    artifacts = engine.game().artifact_count(),
                    relations = engine.game().board().relations().len(),
                    phases = engine.leaves().len(),
                    plan = engine.plan().is_some(),
                    resolver = engine.path_accelerator().unwrap_or("none"),
                    "game compiled"
                );
            }
            Err(error) => warn!(%error, "game failed to compile"),
        }
        self.compiled = Some(result.clone());
        result
    }

    fn build(&self) -> Result<GameProgress, BuildError> {
        let game = self.build_game()?;
        let state = self.build_state(&game)?;
        let root = self.build_phases()?;

        let observer = self
            .observer
            .clone()
            .unwrap_or_else(|| Arc::new(TracingObserver));
        let engine = GameEngine::new(game, root, self.config.clone(), observer);
        Ok(GameProgress::new(Arc::new(engine), state))
    }

    fn build_game(&self) -> Result<Game, BuildError> {
        let mut artifacts = FxHashMap::default();
        let tiles = self.tiles.iter().map(|id| Artifact::new(id.clone(), ArtifactKind::Tile));
        let players = self.players.iter().map(|id| Artifact::new(id.clone(), ArtifactKind::Player));
        let dice = self.dice.iter().map(|(id, _)| Artifact::new(id.clone(), ArtifactKind::Dice));
        let customs = self
            .customs
            .iter()
            .map(|(id, kind)| Artifact::new(id.clone(), ArtifactKind::Custom(kind.clone())));
        for artifact in tiles.chain(players).chain(dice).chain(customs) {
            register(&mut artifacts, artifact)?;
        }

        let mut directions = FxHashSet::default();
        for direction in &self.directions {
            if !directions.insert(direction.clone()) {
                return Err(BuildError::duplicate("direction", direction));
            }
        }

        let mut pieces = Vec::with_capacity(self.pieces.len());
        for definition in &self.pieces {
            let referenced_by = format!("piece {}", definition.id);
            let mut artifact = Artifact::piece(definition.id.clone(), None);
            if let Some(owner) = &definition.owner {
                if !is_kind(&artifacts, owner, &ArtifactKind::Player) {
                    return Err(BuildError::unknown("player", owner, referenced_by));
                }
                artifact = artifact.with_owner(owner.clone());
            }
            let mut patterns = Vec::with_capacity(definition.patterns.len());
            for pattern in &definition.patterns {
                if let Some(missing) = pattern.directions.iter().find(|d| !directions.contains(*d)) {
                    return Err(BuildError::unknown("direction", missing, referenced_by));
                }
                patterns.push(pattern.assemble());
            }
            register(&mut artifacts, artifact.clone())?;
            pieces.push(Piece::new(artifact, patterns));
        }

        let mut seen = FxHashSet::default();
        for relation in &self.relations {
            let referenced_by = || format!("relation {} -> {} ({})", relation.from, relation.to, relation.direction);
            for tile in [&relation.from, &relation.to] {
                if !is_kind(&artifacts, tile, &ArtifactKind::Tile) {
                    return Err(BuildError::unknown("tile", tile, referenced_by()));
                }
            }
            if !directions.contains(&relation.direction) {
                return Err(BuildError::unknown("direction", &relation.direction, referenced_by()));
            }
            if !seen.insert((relation.from.clone(), relation.direction.clone())) {
                return Err(BuildError::duplicate(
                    "relation",
                    format!("{} {}", relation.from, relation.direction),
                ));
            }
        }

        let mut dice = Vec::with_capacity(self.dice.len());
        for (id, faces) in &self.dice {
            if *faces == 0 {
                return Err(BuildError::starting_state(format!("dice {id} has no faces")));
            }
            dice.push(Dice::new(Artifact::new(id.clone(), ArtifactKind::Dice), *faces));
        }

        let board = Board::new(self.tiles.clone(), self.directions.clone(), self.relations.clone());
        Ok(Game::new(board, self.players.clone(), artifacts, pieces, dice))
    }

    fn build_state(&self, game: &Game) -> Result<GameState, BuildError> {
        let mut states = Vec::with_capacity(self.players.len() + self.initial.len());

        if let Some(active) = &self.active_player {
            if !game.is_kind(active, &ArtifactKind::Player) {
                return Err(BuildError::unknown("player", active, "active player"));
            }
            states.extend(
                self.players
                    .iter()
                    .map(|player| ArtifactState::active_player(player.clone(), player == active)),
            );
        }

        for state in &self.initial {
            check_starting_state(game, state)?;
            states.push(state.clone());
        }

        let state = GameState::new(self.config.seed).with_states(states);
        Ok(self
            .extras
            .iter()
            .fold(state, |state, (key, value)| state.with_extras(key, value.clone())))
    }

    fn build_phases(&self) -> Result<GamePhase, BuildError> {
        let root = PhaseId::new(ROOT_PHASE);
        let mut ids = FxHashSet::default();
        ids.insert(root.clone());
        let mut rules = FxHashSet::default();
        let mut ordinal = 0;

        let children = self
            .phases
            .iter()
            .map(|phase| compile_phase(phase, &mut ordinal, &mut ids, &mut rules))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GamePhase::Group { id: root, children })
    }
}

fn register(artifacts: &mut FxHashMap<ArtifactId, Artifact>, artifact: Artifact) -> Result<(), BuildError> {
    if artifacts.contains_key(artifact.id()) {
        return Err(BuildError::duplicate("artifact", artifact.id()));
    }
    artifacts.insert(artifact.id().clone(), artifact);
    Ok(())
}

fn is_kind(artifacts: &FxHashMap<ArtifactId, Artifact>, id: &ArtifactId, kind: &ArtifactKind) -> bool {
    artifacts.get(id).is_some_and(|artifact| artifact.kind() == kind)
}

fn check_starting_state(game: &Game, state: &ArtifactState) -> Result<(), BuildError> {
    let require = |id: &ArtifactId, kind: ArtifactKind, name: &'static str| {
        if game.is_kind(id, &kind) {
            Ok(())
        } else {
            Err(BuildError::unknown(name, id, "starting state"))
        }
    };

    match state {
        ArtifactState::Piece { piece, tile } => {
            require(piece, ArtifactKind::Piece, "piece")?;
            require(tile, ArtifactKind::Tile, "tile")
        }
        ArtifactState::Dice { dice, value } => {
            let Some(declared) = game.dice(dice) else {
                return Err(BuildError::unknown("dice", dice, "starting state"));
            };
            match value {
                Some(face) if !(1..=i64::from(declared.faces())).contains(face) => Err(BuildError::starting_state(
                    format!("dice {dice} cannot show {face}"),
                )),
                _ => Ok(()),
            }
        }
        ArtifactState::ActivePlayer { player, .. } => require(player, ArtifactKind::Player, "player"),
        ArtifactState::Captured { piece } => require(piece, ArtifactKind::Piece, "piece"),
        ArtifactState::Custom { artifact, .. } => match game.artifact(artifact) {
            Some(_) => Ok(()),
            None => Err(BuildError::unknown("artifact", artifact, "starting state")),
        },
    }
}

fn compile_phase(
    definition: &PhaseDefinition,
    ordinal: &mut usize,
    ids: &mut FxHashSet<PhaseId>,
    rules: &mut FxHashSet<RuleId>,
) -> Result<GamePhase, BuildError> {
    if !ids.insert(definition.id().clone()) {
        return Err(BuildError::duplicate("phase", definition.id()));
    }

    match definition {
        PhaseDefinition::Leaf(leaf) => {
            for rule in leaf.rule.walk() {
                if !rules.insert(rule.id().clone()) {
                    return Err(BuildError::duplicate("rule", rule.id()));
                }
            }
            let phase = LeafPhase::new(leaf.id.clone(), *ordinal, leaf.condition.clone(), leaf.rule.clone());
            *ordinal += 1;
            Ok(GamePhase::Leaf(Arc::new(phase)))
        }
        PhaseDefinition::Group(group) => {
            let children = group
                .children
                .iter()
                .map(|child| compile_phase(child, ordinal, ids, rules))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(GamePhase::Group {
                id: group.id.clone(),
                children,
            })
        }
    }
}
