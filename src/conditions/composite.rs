//! Composite condition trees.
//!
//! A condition is a closed variant tree: predicate leaves combined with
//! `All`, `Any` and `None`. Evaluation is an explicit fold over the tree
//! using the three-valued rules in [`response`](super::response).
//!
//! Two instantiations are used by the engine:
//! - [`StateCondition`]: phase applicability, sees engine + state
//! - [`EventCondition`]: rule conditions, sees engine + state + event

use std::fmt;
use std::sync::Arc;

use crate::core::GameState;
use crate::engine::GameEngine;
use crate::rules::GameEvent;

use super::builtin::{Abstain, Always, Never};
use super::response::{fold_all, fold_any, fold_none, ConditionOutcome, ConditionResponse};

/// State-only predicate (phase applicability).
pub trait StatePredicate: Send + Sync {
    /// Evaluate against a state snapshot.
    fn evaluate(&self, engine: &GameEngine, state: &GameState) -> ConditionResponse;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// `Some` if the predicate always returns the same outcome.
    fn constant_outcome(&self) -> Option<ConditionOutcome> {
        None
    }
}

/// Event predicate (rule conditions).
pub trait EventPredicate: Send + Sync {
    /// Evaluate an event against a state snapshot.
    fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> ConditionResponse;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// `Some` if the predicate always returns the same outcome.
    fn constant_outcome(&self) -> Option<ConditionOutcome> {
        None
    }
}

/// Closed condition tree over predicates `P`.
pub enum Condition<P: ?Sized> {
    /// A single predicate.
    Leaf(Arc<P>),
    /// Valid only if every child is valid.
    All(Vec<Condition<P>>),
    /// Valid if at least one child is valid.
    Any(Vec<Condition<P>>),
    /// Valid iff no child is valid.
    None(Vec<Condition<P>>),
}

/// Phase applicability condition.
pub type StateCondition = Condition<dyn StatePredicate>;

/// Rule condition.
pub type EventCondition = Condition<dyn EventPredicate>;

impl<P: ?Sized> Clone for Condition<P> {
    fn clone(&self) -> Self {
        match self {
            Condition::Leaf(predicate) => Condition::Leaf(Arc::clone(predicate)),
            Condition::All(children) => Condition::All(children.clone()),
            Condition::Any(children) => Condition::Any(children.clone()),
            Condition::None(children) => Condition::None(children.clone()),
        }
    }
}

impl<P: ?Sized> Condition<P> {
    /// All conditions must be valid.
    pub fn all(conditions: impl IntoIterator<Item = Self>) -> Self {
        Condition::All(conditions.into_iter().collect())
    }

    /// At least one condition must be valid.
    pub fn any(conditions: impl IntoIterator<Item = Self>) -> Self {
        Condition::Any(conditions.into_iter().collect())
    }

    /// No condition may be valid.
    pub fn none(conditions: impl IntoIterator<Item = Self>) -> Self {
        Condition::None(conditions.into_iter().collect())
    }

    /// Add another condition with AND.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Condition::All(mut children) => {
                children.push(other);
                Condition::All(children)
            }
            _ => Condition::All(vec![self, other]),
        }
    }

    /// Add another condition with OR.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Condition::Any(mut children) => {
                children.push(other);
                Condition::Any(children)
            }
            _ => Condition::Any(vec![self, other]),
        }
    }

    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Condition::None(vec![self])
    }

    /// Fold the tree, evaluating leaves with `eval`.
    pub fn fold(&self, eval: &mut dyn FnMut(&P) -> ConditionResponse) -> ConditionResponse {
        match self {
            Condition::Leaf(predicate) => eval(predicate),
            Condition::All(children) => fold_all(children.iter().map(|c| c.fold(&mut *eval))),
            Condition::Any(children) => fold_any(children.iter().map(|c| c.fold(&mut *eval))),
            Condition::None(children) => fold_none(children.iter().map(|c| c.fold(&mut *eval))),
        }
    }

    /// Number of predicate leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Condition::Leaf(_) => 1,
            Condition::All(children) | Condition::Any(children) | Condition::None(children) => {
                children.iter().map(Condition::leaf_count).sum()
            }
        }
    }

    /// Statically known outcome, if every leaf is constant.
    fn fold_constant(&self, leaf: &dyn Fn(&P) -> Option<ConditionOutcome>) -> Option<ConditionOutcome> {
        let children = match self {
            Condition::Leaf(predicate) => return leaf(predicate),
            Condition::All(children) | Condition::Any(children) | Condition::None(children) => children,
        };
        let outcomes = children
            .iter()
            .map(|c| c.fold_constant(leaf).map(ConditionResponse::from))
            .collect::<Option<Vec<_>>>()?;
        let folded = match self {
            Condition::All(_) => fold_all(outcomes),
            Condition::Any(_) => fold_any(outcomes),
            _ => fold_none(outcomes),
        };
        Some(folded.outcome())
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, leaf: &dyn Fn(&P) -> String) -> fmt::Result {
        let (label, children) = match self {
            Condition::Leaf(predicate) => return write!(f, "{}", leaf(predicate)),
            Condition::All(children) => ("All", children),
            Condition::Any(children) => ("Any", children),
            Condition::None(children) => ("None", children),
        };
        write!(f, "{label}(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            child.fmt_tree(f, leaf)?;
        }
        write!(f, ")")
    }
}

impl StateCondition {
    /// Wrap a predicate.
    pub fn predicate(predicate: impl StatePredicate + 'static) -> Self {
        Condition::Leaf(Arc::new(predicate))
    }

    /// Wrap a closure.
    pub fn from_fn<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&GameEngine, &GameState) -> ConditionResponse + Send + Sync + 'static,
    {
        Self::predicate(StateFn { name, f })
    }

    /// Constant valid.
    #[must_use]
    pub fn always() -> Self {
        Self::predicate(Always)
    }

    /// Constant invalid.
    #[must_use]
    pub fn never() -> Self {
        Self::predicate(Never)
    }

    /// Constant ignore.
    #[must_use]
    pub fn abstain() -> Self {
        Self::predicate(Abstain)
    }

    /// Evaluate against a snapshot.
    pub fn evaluate(&self, engine: &GameEngine, state: &GameState) -> ConditionResponse {
        self.fold(&mut |predicate| predicate.evaluate(engine, state))
    }

    /// Statically known outcome, if any.
    #[must_use]
    pub fn constant_outcome(&self) -> Option<ConditionOutcome> {
        self.fold_constant(&|predicate| predicate.constant_outcome())
    }

    /// True when evaluation can be skipped because it is always valid.
    #[must_use]
    pub fn is_always_valid(&self) -> bool {
        self.constant_outcome() == Some(ConditionOutcome::Valid)
    }
}

impl EventCondition {
    /// Wrap a predicate.
    pub fn predicate(predicate: impl EventPredicate + 'static) -> Self {
        Condition::Leaf(Arc::new(predicate))
    }

    /// Wrap a closure.
    pub fn from_fn<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&GameEngine, &GameState, &dyn GameEvent) -> ConditionResponse + Send + Sync + 'static,
    {
        Self::predicate(EventFn { name, f })
    }

    /// Constant valid.
    #[must_use]
    pub fn always() -> Self {
        Self::predicate(Always)
    }

    /// Constant invalid.
    #[must_use]
    pub fn never() -> Self {
        Self::predicate(Never)
    }

    /// Constant ignore.
    #[must_use]
    pub fn abstain() -> Self {
        Self::predicate(Abstain)
    }

    /// Evaluate an event against a snapshot.
    pub fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        self.fold(&mut |predicate| predicate.evaluate(engine, state, event))
    }

    /// Statically known outcome, if any.
    #[must_use]
    pub fn constant_outcome(&self) -> Option<ConditionOutcome> {
        self.fold_constant(&|predicate| predicate.constant_outcome())
    }
}

impl fmt::Debug for StateCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, &|predicate| predicate.name().to_string())
    }
}

impl fmt::Debug for EventCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, &|predicate| predicate.name().to_string())
    }
}

struct StateFn<F> {
    name: &'static str,
    f: F,
}

impl<F> StatePredicate for StateFn<F>
where
    F: Fn(&GameEngine, &GameState) -> ConditionResponse + Send + Sync,
{
    fn evaluate(&self, engine: &GameEngine, state: &GameState) -> ConditionResponse {
        (self.f)(engine, state)
    }

    fn name(&self) -> &str {
        self.name
    }
}

struct EventFn<F> {
    name: &'static str,
    f: F,
}

impl<F> EventPredicate for EventFn<F>
where
    F: Fn(&GameEngine, &GameState, &dyn GameEvent) -> ConditionResponse + Send + Sync,
{
    fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        (self.f)(engine, state, event)
    }

    fn name(&self) -> &str {
        self.name
    }
}
