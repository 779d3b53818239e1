//! Declarative definitions consumed by [`GameBuilder`](super::GameBuilder).

use crate::board::{DirectionId, MovementPattern};
use crate::conditions::{ConditionOutcome, StateCondition};
use crate::core::ArtifactId;
use crate::phases::PhaseId;
use crate::rules::EventRule;

/// Movement pattern as declared: direction names plus shape flags.
///
/// Assembled at compile time once the directions are known.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternDefinition {
    pub(crate) directions: Vec<DirectionId>,
    pub(crate) repeatable: bool,
    pub(crate) sequence: bool,
}

impl PatternDefinition {
    /// One direction, one step unless made repeatable.
    pub fn direction(direction: impl Into<DirectionId>) -> Self {
        Self {
            directions: vec![direction.into()],
            ..Self::default()
        }
    }

    /// Any one of several directions.
    pub fn directions<D: Into<DirectionId>>(directions: impl IntoIterator<Item = D>) -> Self {
        Self {
            directions: directions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// An exact sequence of steps (knight-like jumps).
    pub fn sequence<D: Into<DirectionId>>(steps: impl IntoIterator<Item = D>) -> Self {
        Self {
            directions: steps.into_iter().map(Into::into).collect(),
            sequence: true,
            ..Self::default()
        }
    }

    /// Keep stepping in the chosen direction.
    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub(crate) fn assemble(&self) -> MovementPattern {
        MovementPattern::assemble(self.directions.clone(), self.repeatable, self.sequence)
    }
}

/// A piece with an optional owner and its movement patterns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceDefinition {
    pub(crate) id: ArtifactId,
    pub(crate) owner: Option<ArtifactId>,
    pub(crate) patterns: Vec<PatternDefinition>,
}

impl PieceDefinition {
    pub fn new(id: impl Into<ArtifactId>) -> Self {
        Self {
            id: id.into(),
            owner: None,
            patterns: Vec::new(),
        }
    }

    #[must_use]
    pub fn owned_by(mut self, player: impl Into<ArtifactId>) -> Self {
        self.owner = Some(player.into());
        self
    }

    /// Add a movement pattern. Patterns are tried in declaration order.
    #[must_use]
    pub fn with_pattern(mut self, pattern: PatternDefinition) -> Self {
        self.patterns.push(pattern);
        self
    }
}

/// Leaf phase: applicability condition plus one rule.
#[derive(Clone, Debug)]
pub struct LeafDefinition {
    pub(crate) id: PhaseId,
    pub(crate) condition: StateCondition,
    pub(crate) rule: EventRule,
}

impl LeafDefinition {
    /// Restrict when the phase applies. Repeated calls combine with `All`.
    #[must_use]
    pub fn when(mut self, condition: StateCondition) -> Self {
        self.condition = match self.condition.constant_outcome() {
            Some(ConditionOutcome::Valid) => condition,
            _ => self.condition.and(condition),
        };
        self
    }
}

/// Group phase: ordered children, no logic of its own.
#[derive(Clone, Debug)]
pub struct GroupDefinition {
    pub(crate) id: PhaseId,
    pub(crate) children: Vec<PhaseDefinition>,
}

impl GroupDefinition {
    #[must_use]
    pub fn with_child(mut self, child: impl Into<PhaseDefinition>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Declared phase tree node.
#[derive(Clone, Debug)]
pub enum PhaseDefinition {
    Leaf(LeafDefinition),
    Group(GroupDefinition),
}

impl PhaseDefinition {
    /// Leaf phase, always applicable until restricted with `when`.
    pub fn leaf(id: impl Into<PhaseId>, rule: EventRule) -> LeafDefinition {
        LeafDefinition {
            id: id.into(),
            condition: StateCondition::always(),
            rule,
        }
    }

    /// Empty group phase.
    pub fn group(id: impl Into<PhaseId>) -> GroupDefinition {
        GroupDefinition {
            id: id.into(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &PhaseId {
        match self {
            PhaseDefinition::Leaf(leaf) => &leaf.id,
            PhaseDefinition::Group(group) => &group.id,
        }
    }
}

impl From<LeafDefinition> for PhaseDefinition {
    fn from(leaf: LeafDefinition) -> Self {
        PhaseDefinition::Leaf(leaf)
    }
}

impl From<GroupDefinition> for PhaseDefinition {
    fn from(group: GroupDefinition) -> Self {
        PhaseDefinition::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_shapes() {
        assert!(matches!(
            PatternDefinition::direction("north").repeatable().assemble(),
            MovementPattern::Direction { repeatable: true, .. }
        ));
        assert!(matches!(
            PatternDefinition::directions(["north", "east"]).assemble(),
            MovementPattern::MultiDirection { repeatable: false, .. }
        ));
        assert!(matches!(
            PatternDefinition::sequence(["north", "north", "east"]).assemble(),
            MovementPattern::Fixed { .. }
        ));
        assert!(PatternDefinition::directions(Vec::<&str>::new()).assemble().is_null());
    }

    #[test]
    fn test_leaf_when_replaces_always() {
        let leaf = PhaseDefinition::leaf("play", EventRule::new("noop"));
        assert!(leaf.condition.is_always_valid());

        let guarded = leaf.when(StateCondition::never());
        assert!(matches!(guarded.condition, crate::conditions::Condition::Leaf(_)));

        let twice = guarded.when(StateCondition::abstain());
        assert_eq!(twice.condition.leaf_count(), 2);
    }

    #[test]
    fn test_group_children() {
        let group = PhaseDefinition::group("turn")
            .with_child(PhaseDefinition::leaf("move", EventRule::new("move")))
            .with_child(PhaseDefinition::group("nested"));
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.children[1].id().as_str(), "nested");
    }
}
