//! Phase tree.
//!
//! Groups are pure containers. Leaves carry one state-only applicability
//! condition and one event rule. Declaration order is precedence order.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::conditions::StateCondition;
use crate::core::GameState;
use crate::engine::GameEngine;
use crate::rules::EventRule;

/// Phase identifier. Unique within a game.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhaseId(Arc<str>);

impl PhaseId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PhaseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compiled leaf phase.
#[derive(Debug)]
pub struct LeafPhase {
    id: PhaseId,
    ordinal: usize,
    condition: StateCondition,
    rule: EventRule,
}

impl LeafPhase {
    pub(crate) fn new(id: PhaseId, ordinal: usize, condition: StateCondition, rule: EventRule) -> Self {
        Self {
            id,
            ordinal,
            condition,
            rule,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PhaseId {
        &self.id
    }

    /// Position among all leaves in depth-first declaration order.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[must_use]
    pub fn condition(&self) -> &StateCondition {
        &self.condition
    }

    #[must_use]
    pub fn rule(&self) -> &EventRule {
        &self.rule
    }

    /// Check whether the phase applies to `state`.
    pub fn is_active(&self, engine: &GameEngine, state: &GameState) -> bool {
        self.condition.evaluate(engine, state).is_valid()
    }
}

/// Phase tree node.
#[derive(Clone, Debug)]
pub enum GamePhase {
    /// Ordered children, no logic of its own.
    Group { id: PhaseId, children: Vec<GamePhase> },
    /// Applicability condition plus rule.
    Leaf(Arc<LeafPhase>),
}

impl GamePhase {
    #[must_use]
    pub fn id(&self) -> &PhaseId {
        match self {
            GamePhase::Group { id, .. } => id,
            GamePhase::Leaf(leaf) => &leaf.id,
        }
    }

    /// Leaves in depth-first declaration order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Arc<LeafPhase>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Arc<LeafPhase>>) {
        match self {
            GamePhase::Leaf(leaf) => out.push(leaf),
            GamePhase::Group { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// First active leaf, top-down in declaration order.
    pub fn active_leaf(&self, engine: &GameEngine, state: &GameState) -> Option<&Arc<LeafPhase>> {
        match self {
            GamePhase::Leaf(leaf) => leaf.is_active(engine, state).then_some(leaf),
            GamePhase::Group { children, .. } => children.iter().find_map(|child| child.active_leaf(engine, state)),
        }
    }

    /// Phase ids in the subtree, depth-first, groups included.
    pub fn ids(&self) -> Vec<&PhaseId> {
        let mut out = vec![self.id()];
        if let GamePhase::Group { children, .. } = self {
            for child in children {
                out.extend(child.ids());
            }
        }
        out
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::conditions::ConditionResponse;
    use crate::game::GameBuilder;

    fn leaf(id: &str, ordinal: usize, condition: StateCondition) -> GamePhase {
        GamePhase::Leaf(Arc::new(LeafPhase::new(
            id.into(),
            ordinal,
            condition,
            EventRule::new(format!("{id}-rule").as_str()),
        )))
    }

    /// root { setup, play { move, end }, scoring }
    pub(crate) fn sample_tree() -> GamePhase {
        let flag = |name: &'static str| {
            StateCondition::from_fn(name, move |_, state| {
                ConditionResponse::check(state.extras(name).is_some(), "flag not set")
            })
        };
        GamePhase::Group {
            id: "root".into(),
            children: vec![
                leaf("setup", 0, flag("setup")),
                GamePhase::Group {
                    id: "play".into(),
                    children: vec![leaf("move", 1, StateCondition::always()), leaf("end", 2, flag("end"))],
                },
                leaf("scoring", 3, flag("scoring")),
            ],
        }
    }

    #[test]
    fn test_leaves_in_declaration_order() {
        let tree = sample_tree();
        let ids: Vec<_> = tree.leaves().iter().map(|leaf| leaf.id().as_str()).collect();
        assert_eq!(ids, vec!["setup", "move", "end", "scoring"]);
        let ordinals: Vec<_> = tree.leaves().iter().map(|leaf| leaf.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
        assert_eq!(tree.ids().len(), 6);
    }

    #[test]
    fn test_active_leaf() {
        let engine = GameBuilder::new().compile().unwrap().engine().clone();
        let tree = sample_tree();

        let idle = GameState::new(0);
        assert_eq!(tree.active_leaf(&engine, &idle).unwrap().id().as_str(), "move");

        let setting_up = idle.with_extras("setup", true);
        assert_eq!(tree.active_leaf(&engine, &setting_up).unwrap().id().as_str(), "setup");

        let empty = GamePhase::Group {
            id: "empty".into(),
            children: Vec::new(),
        };
        assert!(empty.active_leaf(&engine, &idle).is_none());
    }
}
