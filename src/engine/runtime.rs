//! The compiled engine: game, phase tree, decision plan and configuration.

use std::fmt;
use std::sync::Arc;

use crate::board::{PathResolver, PatternPathResolver, TilePath};
use crate::core::{ArtifactId, EngineConfig, GameState};
use crate::game::Game;
use crate::phases::{DecisionPlan, GamePhase, LeafPhase};
use crate::rules::MovePieceEvent;

use super::observer::EvaluationObserver;

/// Everything that stays fixed while a game is played.
///
/// Shared by every [`GameProgress`](super::GameProgress) of one game and
/// safe for concurrent reads.
pub struct GameEngine {
    game: Game,
    root: GamePhase,
    leaves: Vec<Arc<LeafPhase>>,
    plan: Option<DecisionPlan>,
    config: EngineConfig,
    accelerator: Option<Arc<dyn PathResolver>>,
    pub(crate) observer: Arc<dyn EvaluationObserver>,
}

impl GameEngine {
    pub(crate) fn new(
        game: Game,
        root: GamePhase,
        config: EngineConfig,
        observer: Arc<dyn EvaluationObserver>,
    ) -> Self {
        let leaves = root.leaves().into_iter().cloned().collect();
        let plan = config
            .decision_plan
            .then(|| DecisionPlan::compile(&root, config.event_type_index));
        let accelerator = accelerator(&game, &config);

        Self {
            game,
            root,
            leaves,
            plan,
            config,
            accelerator,
            observer,
        }
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Root of the compiled phase tree.
    #[must_use]
    pub fn phases(&self) -> &GamePhase {
        &self.root
    }

    /// Leaf phases in declaration order; index equals leaf ordinal.
    #[must_use]
    pub fn leaves(&self) -> &[Arc<LeafPhase>] {
        &self.leaves
    }

    /// The decision plan, unless tree-walk evaluation is configured.
    #[must_use]
    pub fn plan(&self) -> Option<&DecisionPlan> {
        self.plan.as_ref()
    }

    /// Name of the accelerated path resolver in use, if any.
    #[must_use]
    pub fn path_accelerator(&self) -> Option<&'static str> {
        self.accelerator.as_ref().map(|resolver| resolver.name())
    }

    /// Resolve a path for `piece` between two tiles.
    ///
    /// Patterns are tried in declaration order. For each, the accelerated
    /// resolver is consulted first and the pattern walker second, so a
    /// missing or partial accelerator never changes the result.
    #[must_use]
    pub fn resolve_path(&self, piece: &ArtifactId, from: &ArtifactId, to: &ArtifactId) -> Option<TilePath> {
        let piece = self.game.piece(piece)?;
        let board = self.game.board();
        piece.patterns().iter().find_map(|pattern| {
            self.accelerator
                .as_ref()
                .and_then(|resolver| resolver.resolve(board, pattern, from, to))
                .or_else(|| PatternPathResolver.resolve(board, pattern, from, to))
        })
    }

    /// Build a move event for `piece` from its current tile to `to`.
    ///
    /// `None` if the piece is not on the board or no pattern reaches `to`.
    #[must_use]
    pub fn move_event(&self, state: &GameState, piece: &ArtifactId, to: &ArtifactId) -> Option<MovePieceEvent> {
        let from = state.piece_tile(piece)?;
        let path = self.resolve_path(piece, from, to)?;
        Some(MovePieceEvent {
            piece: piece.clone(),
            from: from.clone(),
            to: to.clone(),
            path,
        })
    }
}

#[cfg(feature = "compiled-paths")]
fn accelerator(game: &Game, config: &EngineConfig) -> Option<Arc<dyn PathResolver>> {
    use crate::board::CompiledPathResolver;

    config
        .compiled_paths
        .then(|| Arc::new(CompiledPathResolver::compile(game.board())) as Arc<dyn PathResolver>)
}

#[cfg(not(feature = "compiled-paths"))]
fn accelerator(_game: &Game, _config: &EngineConfig) -> Option<Arc<dyn PathResolver>> {
    None
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("game", &self.game)
            .field("leaves", &self.leaves.len())
            .field("plan", &self.plan.as_ref().map(DecisionPlan::len))
            .field("config", &self.config)
            .field("accelerator", &self.path_accelerator())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ArtifactState;
    use crate::game::{GameBuilder, PatternDefinition, PieceDefinition};

    /// a1 -> a2 -> a3 north, a1 -> b2 by a two-step jump.
    fn builder() -> GameBuilder {
        let mut builder = GameBuilder::new();
        builder
            .add_tile("a1")
            .add_tile("a2")
            .add_tile("a3")
            .add_tile("b1")
            .add_tile("b2")
            .add_direction("north")
            .add_direction("east")
            .add_relation("a1", "a2", "north")
            .add_relation("a2", "a3", "north")
            .add_relation("a1", "b1", "east")
            .add_relation("b1", "b2", "north")
            .add_player("p1")
            .add_piece(
                PieceDefinition::new("rook")
                    .owned_by("p1")
                    .with_pattern(PatternDefinition::direction("north").repeatable()),
            )
            .add_piece(
                PieceDefinition::new("knight")
                    .owned_by("p1")
                    .with_pattern(PatternDefinition::sequence(["east", "north"])),
            );
        builder
    }

    #[test]
    fn test_resolve_path_patterns() {
        let engine = builder().compile().unwrap().engine().clone();
        let slide = engine.resolve_path(&"rook".into(), &"a1".into(), &"a3".into()).unwrap();
        assert_eq!(slide.len(), 2);

        let jump = engine.resolve_path(&"knight".into(), &"a1".into(), &"b2".into()).unwrap();
        assert_eq!(jump.to().as_str(), "b2");

        assert!(engine.resolve_path(&"rook".into(), &"a1".into(), &"b2".into()).is_none());
        assert!(engine.resolve_path(&"ghost".into(), &"a1".into(), &"a2".into()).is_none());
    }

    #[test]
    fn test_move_event() {
        let engine = builder().compile().unwrap().engine().clone();
        let state = GameState::new(0).with_states([ArtifactState::piece_at("rook", "a1")]);
        let mv = engine.move_event(&state, &"rook".into(), &"a2".into()).unwrap();
        assert_eq!(mv.from.as_str(), "a1");
        assert_eq!(mv.path.len(), 1);

        assert!(engine.move_event(&state, &"knight".into(), &"b2".into()).is_none());
    }

    #[test]
    fn test_accelerator_does_not_change_results() {
        let mut plain = builder();
        plain.with_config(EngineConfig::new().without_compiled_paths());
        let plain = plain.compile().unwrap().engine().clone();
        let fast = builder().compile().unwrap().engine().clone();
        assert!(plain.path_accelerator().is_none());

        for piece in ["rook", "knight"] {
            for from in ["a1", "a2", "b1"] {
                for to in ["a2", "a3", "b2"] {
                    assert_eq!(
                        plain.resolve_path(&piece.into(), &from.into(), &to.into()),
                        fast.resolve_path(&piece.into(), &from.into(), &to.into()),
                    );
                }
            }
        }
    }

    #[test]
    fn test_tree_walk_has_no_plan() {
        let mut builder = builder();
        builder.with_config(EngineConfig::new().tree_walk());
        let engine = builder.compile().unwrap().engine().clone();
        assert!(engine.plan().is_none());
    }
}
