//! Event rules.
//!
//! An [`EventRule`] pairs a guard condition with an action. The action is
//! either a list of mutators applied in order, or a composite of child rules:
//!
//! - `All`: valid when every child is valid; applies every child in order,
//!   threading the state from one into the next
//! - `Any`: valid when at least one child is valid; applies the first valid
//!   child only
//!
//! A rule may declare the event type it accepts. Events of other types get
//! *ignore* without evaluating the condition, and the decision plan uses the
//! declared type to skip the rule entirely.
//!
//! ```
//! use tabletop_engine::conditions::{DestinationIsEmpty, EventCondition, PathIsClear};
//! use tabletop_engine::rules::{EventRule, MovePiece, MovePieceEvent, RulePriority};
//!
//! let slide = EventRule::on::<MovePieceEvent>("slide")
//!     .when(EventCondition::predicate(PathIsClear))
//!     .when(EventCondition::predicate(DestinationIsEmpty))
//!     .then(MovePiece)
//!     .with_priority(RulePriority::High);
//!
//! assert_eq!(slide.id().as_str(), "slide");
//! assert_eq!(slide.event_type().map(|t| t.name()), Some("MovePieceEvent"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::conditions::{fold_all, fold_any, ConditionOutcome, ConditionResponse, EventCondition};
use crate::core::GameState;
use crate::engine::GameEngine;

use super::event::{EventType, GameEvent};
use super::mutator::StateMutator;

/// Rule identifier. Unique within a game.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId(Arc<str>);

impl RuleId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Six-level priority used by highest-priority and apply-all resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RulePriority {
    Lowest,
    Low,
    #[default]
    Normal,
    High,
    Highest,
    Override,
}

#[derive(Clone)]
enum RuleAction {
    Mutate(Vec<Arc<dyn StateMutator>>),
    All(Vec<EventRule>),
    Any(Vec<EventRule>),
}

/// Condition plus mutation, or a composite of child rules.
#[derive(Clone)]
pub struct EventRule {
    id: RuleId,
    priority: RulePriority,
    event_type: Option<EventType>,
    condition: EventCondition,
    action: RuleAction,
}

impl EventRule {
    /// Rule accepting any event.
    pub fn new(id: impl Into<RuleId>) -> Self {
        Self {
            id: id.into(),
            priority: RulePriority::Normal,
            event_type: None,
            condition: EventCondition::always(),
            action: RuleAction::Mutate(Vec::new()),
        }
    }

    /// Rule accepting only events of type `E`.
    pub fn on<E: GameEvent>(id: impl Into<RuleId>) -> Self {
        Self {
            event_type: Some(EventType::of::<E>()),
            ..Self::new(id)
        }
    }

    /// Composite valid when every child is valid; applies all children.
    pub fn all(id: impl Into<RuleId>, children: impl IntoIterator<Item = EventRule>) -> Self {
        let children: Vec<_> = children.into_iter().collect();
        Self {
            event_type: common_event_type(&children),
            action: RuleAction::All(children),
            ..Self::new(id)
        }
    }

    /// Composite valid when any child is valid; applies the first valid one.
    pub fn any(id: impl Into<RuleId>, children: impl IntoIterator<Item = EventRule>) -> Self {
        let children: Vec<_> = children.into_iter().collect();
        Self {
            event_type: common_event_type(&children),
            action: RuleAction::Any(children),
            ..Self::new(id)
        }
    }

    /// Add a guard condition. Repeated calls combine with `All`.
    #[must_use]
    pub fn when(mut self, condition: EventCondition) -> Self {
        self.condition = match self.condition.constant_outcome() {
            Some(ConditionOutcome::Valid) => condition,
            _ => self.condition.and(condition),
        };
        self
    }

    /// Append a mutator.
    ///
    /// # Panics
    ///
    /// Panics on composite rules; their children carry the mutators.
    #[must_use]
    pub fn then(self, mutator: impl StateMutator + 'static) -> Self {
        self.then_shared(Arc::new(mutator))
    }

    /// Append a shared mutator (see [`mutator_fn`](super::mutator_fn)).
    ///
    /// # Panics
    ///
    /// Panics on composite rules.
    #[must_use]
    pub fn then_shared(mut self, mutator: Arc<dyn StateMutator>) -> Self {
        match &mut self.action {
            RuleAction::Mutate(mutators) => mutators.push(mutator),
            RuleAction::All(_) | RuleAction::Any(_) => {
                panic!("rule `{}` is a composite; add mutators to its children", self.id)
            }
        }
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: RulePriority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn id(&self) -> &RuleId {
        &self.id
    }

    #[must_use]
    pub fn priority(&self) -> RulePriority {
        self.priority
    }

    /// Event type this rule accepts, if statically known.
    #[must_use]
    pub fn event_type(&self) -> Option<EventType> {
        self.event_type
    }

    #[must_use]
    pub fn condition(&self) -> &EventCondition {
        &self.condition
    }

    /// Child rules of a composite; empty for leaf rules.
    #[must_use]
    pub fn children(&self) -> &[EventRule] {
        match &self.action {
            RuleAction::Mutate(_) => &[],
            RuleAction::All(children) | RuleAction::Any(children) => children,
        }
    }

    /// This rule and every nested child, depth-first.
    pub fn walk(&self) -> Box<dyn Iterator<Item = &EventRule> + '_> {
        Box::new(std::iter::once(self).chain(self.children().iter().flat_map(EventRule::walk)))
    }

    /// Evaluate the rule's condition for `event`.
    pub fn check(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        if let Some(accepted) = self.event_type {
            if !accepted.matches(event) {
                return ConditionResponse::IGNORE;
            }
        }

        let guard = self.condition.evaluate(engine, state, event);
        if guard.is_invalid() {
            return guard;
        }
        let body = match &self.action {
            RuleAction::Mutate(_) => return guard,
            RuleAction::All(children) => fold_all(children.iter().map(|c| c.check(engine, state, event))),
            RuleAction::Any(children) => fold_any(children.iter().map(|c| c.check(engine, state, event))),
        };
        fold_all([guard, body])
    }

    /// Apply the rule's mutation. Callers check the rule first.
    pub fn apply(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> GameState {
        match &self.action {
            RuleAction::Mutate(mutators) => mutators
                .iter()
                .fold(state.clone(), |next, mutator| mutator.mutate(engine, &next, event)),
            RuleAction::All(children) => children
                .iter()
                .fold(state.clone(), |next, child| child.apply(engine, &next, event)),
            RuleAction::Any(children) => children
                .iter()
                .find(|child| child.check(engine, state, event).is_valid())
                .map_or_else(|| state.clone(), |child| child.apply(engine, state, event)),
        }
    }
}

fn common_event_type(children: &[EventRule]) -> Option<EventType> {
    let (first, rest) = children.split_first()?;
    let accepted = first.event_type?;
    rest.iter()
        .all(|child| child.event_type == Some(accepted))
        .then_some(accepted)
}

impl fmt::Debug for EventRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("EventRule");
        s.field("id", &self.id)
            .field("priority", &self.priority)
            .field("event_type", &self.event_type.map(|t| t.name()))
            .field("condition", &self.condition);
        match &self.action {
            RuleAction::Mutate(mutators) => {
                let names: Vec<_> = mutators.iter().map(|m| m.name()).collect();
                s.field("mutators", &names)
            }
            RuleAction::All(children) => s.field("all", children),
            RuleAction::Any(children) => s.field("any", children),
        };
        s.finish()
    }
}
