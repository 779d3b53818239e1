//! Three-valued conditions.
//!
//! Conditions answer *ignore*, *valid* or *invalid* and compose through the
//! closed [`Condition`] tree (`All` / `Any` / `None`). Ignore is preserved
//! through every layer of composition; it is never folded into invalid.
//!
//! ## Example
//!
//! ```
//! use tabletop_engine::conditions::{Condition, ConditionOutcome, StateCondition};
//!
//! let guard = StateCondition::always().and(StateCondition::abstain());
//! assert_eq!(guard.constant_outcome(), Some(ConditionOutcome::Ignore));
//!
//! let negated = StateCondition::never().negate();
//! assert_eq!(negated.constant_outcome(), Some(ConditionOutcome::Valid));
//! assert!(matches!(negated, Condition::None(_)));
//! ```

mod builtin;
mod composite;
mod movement;
mod response;

pub use builtin::{Abstain, ActivePlayerIs, Always, HasState, Never};
pub use composite::{Condition, EventCondition, EventPredicate, StateCondition, StatePredicate};
pub use movement::{
    DestinationHasOpponent, DestinationIsEmpty, FollowsMovementPattern, PathIsClear, PieceIsOnOrigin,
    PieceOwnedByActivePlayer,
};
pub use response::{fold_all, fold_any, fold_none, ConditionOutcome, ConditionResponse};
