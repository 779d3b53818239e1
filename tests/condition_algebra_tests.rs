//! Condition algebra integration tests.
//!
//! These tests check `All` / `Any` / `None` against the three-valued truth
//! table, exhaustively for small child lists and by property for nested
//! trees.

use std::sync::Arc;

use proptest::prelude::*;
use tabletop_engine::conditions::{
    fold_all, fold_any, fold_none, Condition, ConditionOutcome, ConditionResponse, StateCondition, StatePredicate,
};
use tabletop_engine::game::GameBuilder;
use tabletop_engine::{GameEngine, GameState};

use ConditionOutcome::{Ignore, Invalid, Valid};

const OUTCOMES: [ConditionOutcome; 3] = [Ignore, Valid, Invalid];

/// Predicate with a fixed answer, opaque to constant folding.
struct Fixed(ConditionOutcome);

impl StatePredicate for Fixed {
    fn evaluate(&self, _engine: &GameEngine, _state: &GameState) -> ConditionResponse {
        self.0.into()
    }
}

fn leaf(outcome: ConditionOutcome) -> StateCondition {
    StateCondition::predicate(Fixed(outcome))
}

fn engine() -> Arc<GameEngine> {
    GameBuilder::new().compile().unwrap().engine().clone()
}

fn expected_all(children: &[ConditionOutcome]) -> ConditionOutcome {
    if children.contains(&Invalid) {
        Invalid
    } else if children.iter().all(|&c| c == Valid) {
        Valid
    } else {
        Ignore
    }
}

fn expected_any(children: &[ConditionOutcome]) -> ConditionOutcome {
    if children.contains(&Valid) {
        Valid
    } else if children.contains(&Invalid) {
        Invalid
    } else {
        Ignore
    }
}

fn expected_none(children: &[ConditionOutcome]) -> ConditionOutcome {
    if children.contains(&Valid) {
        Invalid
    } else {
        Valid
    }
}

/// Every outcome list of length `n`.
fn combinations(n: u32) -> impl Iterator<Item = Vec<ConditionOutcome>> {
    (0..3usize.pow(n)).map(move |mut code| {
        (0..n)
            .map(|_| {
                let outcome = OUTCOMES[code % 3];
                code /= 3;
                outcome
            })
            .collect()
    })
}

// =============================================================================
// Truth Table
// =============================================================================

/// Test All / Any / None over every combination of up to four children.
#[test]
fn test_truth_table_exhaustive() {
    let engine = engine();
    let state = GameState::new(0);

    for n in 0..=4 {
        for children in combinations(n) {
            let leaves = || children.iter().map(|&c| leaf(c));

            let all = Condition::all(leaves()).evaluate(&engine, &state);
            let any = Condition::any(leaves()).evaluate(&engine, &state);
            let none = Condition::none(leaves()).evaluate(&engine, &state);

            assert_eq!(all.outcome(), expected_all(&children), "All {children:?}");
            assert_eq!(any.outcome(), expected_any(&children), "Any {children:?}");
            assert_eq!(none.outcome(), expected_none(&children), "None {children:?}");
        }
    }
}

/// Test the response folds directly against the same table.
#[test]
fn test_folds_match_table() {
    for n in 0..=4 {
        for children in combinations(n) {
            let responses = || children.iter().map(|&c| ConditionResponse::from(c));
            assert_eq!(fold_all(responses()).outcome(), expected_all(&children));
            assert_eq!(fold_any(responses()).outcome(), expected_any(&children));
            assert_eq!(fold_none(responses()).outcome(), expected_none(&children));
        }
    }
}

/// Test the empty composites.
#[test]
fn test_empty_composites() {
    let engine = engine();
    let state = GameState::new(0);
    let empty = || std::iter::empty::<StateCondition>();

    assert!(Condition::all(empty()).evaluate(&engine, &state).is_valid());
    assert!(Condition::any(empty()).evaluate(&engine, &state).is_ignore());
    assert!(Condition::none(empty()).evaluate(&engine, &state).is_valid());
}

// =============================================================================
// Ignore Preservation
// =============================================================================

/// Test that ignore never collapses into invalid.
#[test]
fn test_ignore_is_not_invalid() {
    let engine = engine();
    let state = GameState::new(0);

    let all = leaf(Valid).and(leaf(Ignore));
    assert!(all.evaluate(&engine, &state).is_ignore());

    let any = leaf(Ignore).or(leaf(Ignore));
    assert!(any.evaluate(&engine, &state).is_ignore());

    // None treats "no opinion" as "not valid".
    assert!(leaf(Ignore).negate().evaluate(&engine, &state).is_valid());
}

/// Test that and / or flatten instead of nesting.
#[test]
fn test_and_or_flatten() {
    let chained = leaf(Valid).and(leaf(Valid)).and(leaf(Ignore));
    assert!(matches!(&chained, Condition::All(children) if children.len() == 3));
    assert_eq!(chained.leaf_count(), 3);

    let chained = leaf(Valid).or(leaf(Invalid)).or(leaf(Ignore));
    assert!(matches!(&chained, Condition::Any(children) if children.len() == 3));
}

/// Test that the first reason of the deciding child survives.
#[test]
fn test_reason_propagates() {
    let engine = engine();
    let state = GameState::new(0);
    let refusal = StateCondition::from_fn("refuse", |_, _| ConditionResponse::fail("out of turn"));

    let response = leaf(Valid).and(refusal).evaluate(&engine, &state);
    assert_eq!(response.reason(), Some("out of turn"));
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Clone, Debug)]
enum Tree {
    Leaf(ConditionOutcome),
    All(Vec<Tree>),
    Any(Vec<Tree>),
    None(Vec<Tree>),
}

impl Tree {
    fn expected(&self) -> ConditionOutcome {
        let children = |trees: &[Tree]| trees.iter().map(Tree::expected).collect::<Vec<_>>();
        match self {
            Tree::Leaf(outcome) => *outcome,
            Tree::All(trees) => expected_all(&children(trees)),
            Tree::Any(trees) => expected_any(&children(trees)),
            Tree::None(trees) => expected_none(&children(trees)),
        }
    }

    fn condition(&self, constant: bool) -> StateCondition {
        let children = |trees: &[Tree]| trees.iter().map(|t| t.condition(constant)).collect::<Vec<_>>();
        match self {
            Tree::Leaf(outcome) if constant => match outcome {
                Valid => StateCondition::always(),
                Invalid => StateCondition::never(),
                Ignore => StateCondition::abstain(),
            },
            Tree::Leaf(outcome) => leaf(*outcome),
            Tree::All(trees) => Condition::all(children(trees)),
            Tree::Any(trees) => Condition::any(children(trees)),
            Tree::None(trees) => Condition::none(children(trees)),
        }
    }
}

fn tree() -> impl Strategy<Value = Tree> {
    let leaf = prop::sample::select(OUTCOMES.to_vec()).prop_map(Tree::Leaf);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Tree::All),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Tree::Any),
            prop::collection::vec(inner, 0..4).prop_map(Tree::None),
        ]
    })
}

proptest! {
    /// Nested trees evaluate by the truth table at every level.
    #[test]
    fn prop_nested_trees_follow_table(tree in tree()) {
        let engine = engine();
        let state = GameState::new(0);
        let response = tree.condition(false).evaluate(&engine, &state);
        prop_assert_eq!(response.outcome(), tree.expected());
    }

    /// Constant folding agrees with evaluation.
    #[test]
    fn prop_constant_folding_agrees(tree in tree()) {
        let engine = engine();
        let state = GameState::new(0);
        let condition = tree.condition(true);
        prop_assert_eq!(condition.constant_outcome(), Some(tree.expected()));
        prop_assert_eq!(condition.evaluate(&engine, &state).outcome(), tree.expected());
    }

    /// Opaque leaves are never folded.
    #[test]
    fn prop_opaque_leaves_not_folded(outcome in prop::sample::select(OUTCOMES.to_vec())) {
        prop_assert_eq!(leaf(outcome).constant_outcome(), None);
    }
}
