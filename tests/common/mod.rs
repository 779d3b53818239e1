//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tabletop_engine::conditions::{ConditionResponse, StateCondition};
use tabletop_engine::error::InvalidGameEvent;
use tabletop_engine::game::{GameBuilder, PatternDefinition, PhaseDefinition, PieceDefinition};
use tabletop_engine::phases::LeafPhase;
use tabletop_engine::resolution::{RuleDecision, RuleMetadata};
use tabletop_engine::rules::{mutator_fn, EventRule, GameEvent, RulePriority, StateMutator};
use tabletop_engine::{EvaluationObserver, GameState};

/// Test-only event nobody else understands.
#[derive(Clone, Debug)]
pub struct Tick;

impl GameEvent for Tick {}

/// Another test-only event, for type-index checks.
#[derive(Clone, Debug)]
pub struct Tock;

impl GameEvent for Tock {}

/// Mutator adding `step` to the `counter` extra.
pub fn counter(step: i64) -> Arc<dyn StateMutator> {
    mutator_fn("counter", move |_, state, _| {
        state.with_extras("counter", count(state) + step)
    })
}

/// Mutator appending `tag` to the `trail` extra.
pub fn trail(tag: &'static str) -> Arc<dyn StateMutator> {
    mutator_fn("trail", move |_, state, _| {
        let mut tags = state
            .extras("trail")
            .and_then(|v| v.as_text_list())
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        tags.push(tag.to_string());
        state.with_extras("trail", tags)
    })
}

pub fn count(state: &GameState) -> i64 {
    state.extras("counter").and_then(|v| v.as_int()).unwrap_or(0)
}

pub fn trail_of(state: &GameState) -> Vec<String> {
    state
        .extras("trail")
        .and_then(|v| v.as_text_list())
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

/// Leaf phase `id` whose rule `id` accepts [`Tick`] and appends `id` to the trail.
pub fn tick_phase(id: &'static str, priority: RulePriority) -> PhaseDefinition {
    PhaseDefinition::leaf(
        id,
        EventRule::on::<Tick>(id)
            .with_priority(priority)
            .then_shared(trail(id))
            .then_shared(counter(1)),
    )
    .into()
}

/// Leaf phase whose applicability depends on the `flag` extra being true.
pub fn flagged(id: &'static str, flag: &'static str, rule: EventRule) -> PhaseDefinition {
    PhaseDefinition::leaf(id, rule)
        .when(StateCondition::from_fn("flag", move |_, state| {
            let on = state.extras(flag).and_then(|v| v.as_bool()).unwrap_or(false);
            ConditionResponse::check(on, format!("{flag} is off"))
        }))
        .into()
}

/// Two players on a single file `a1..a4` running north, a rook each.
///
/// White's rook starts on a1, black's on a4; white moves first.
pub fn file_game() -> GameBuilder {
    let mut builder = GameBuilder::new();
    for tile in ["a1", "a2", "a3", "a4"] {
        builder.add_tile(tile);
    }
    builder
        .add_direction("north")
        .add_direction("south")
        .add_relation("a1", "a2", "north")
        .add_relation("a2", "a3", "north")
        .add_relation("a3", "a4", "north")
        .add_relation("a4", "a3", "south")
        .add_relation("a3", "a2", "south")
        .add_relation("a2", "a1", "south")
        .add_player("white")
        .add_player("black")
        .with_active_player("white")
        .add_piece(
            PieceDefinition::new("white-rook")
                .owned_by("white")
                .with_pattern(PatternDefinition::directions(["north", "south"]).repeatable()),
        )
        .add_piece(
            PieceDefinition::new("black-rook")
                .owned_by("black")
                .with_pattern(PatternDefinition::directions(["north", "south"]).repeatable()),
        )
        .with_piece_at("white-rook", "a1")
        .with_piece_at("black-rook", "a4");
    builder
}

/// Observer recording each hook as a short line.
#[derive(Default)]
pub struct Recorder {
    pub lines: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn push(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }
}

impl EvaluationObserver for Recorder {
    fn phase_inactive(&self, phase: &LeafPhase, _response: &ConditionResponse) {
        self.push(format!("inactive {}", phase.id()));
    }

    fn rule_evaluated(&self, phase: &LeafPhase, _event: &dyn GameEvent, response: &ConditionResponse) {
        self.push(format!("evaluated {} {:?}", phase.rule().id(), response.outcome()));
    }

    fn event_ignored(&self, event: &dyn GameEvent) {
        self.push(format!("ignored {}", event.name()));
    }

    fn event_rejected(&self, rejection: &InvalidGameEvent) {
        self.push(format!("rejected {}", rejection.rule));
    }

    fn decision_made(&self, _event: &dyn GameEvent, decision: &RuleDecision) {
        self.push(format!("decision {}", decision.selected.len()));
    }

    fn rule_applied(&self, _event: &dyn GameEvent, rule: &RuleMetadata) {
        self.push(format!("applied {}", rule.rule));
    }
}
