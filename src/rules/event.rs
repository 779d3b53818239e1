//! Game events.
//!
//! The engine treats events as opaque payloads: anything implementing
//! [`GameEvent`] can be handled. Rules declare which event type they accept
//! and downcast to it; the decision plan indexes entries by that type.
//!
//! The standard events cover movement, dice and turn passing. Games define
//! their own events the same way:
//!
//! ```
//! use tabletop_engine::rules::GameEvent;
//!
//! #[derive(Debug)]
//! struct BuyProperty {
//!     tile: String,
//! }
//!
//! impl GameEvent for BuyProperty {}
//!
//! let event: &dyn GameEvent = &BuyProperty { tile: "boardwalk".into() };
//! assert_eq!(event.name(), "BuyProperty");
//! assert!(event.is::<BuyProperty>());
//! ```

use std::any::{Any, TypeId};
use std::fmt;

use crate::board::TilePath;
use crate::core::ArtifactId;

/// Upcast to `Any` for downcasting trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Capability implemented by every event.
pub trait GameEvent: AsAny + fmt::Debug + Send + Sync {
    /// Short type name used in diagnostics.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

impl dyn GameEvent {
    /// Downcast to a concrete event type.
    pub fn downcast_ref<E: GameEvent>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    /// Check the concrete event type.
    pub fn is<E: GameEvent>(&self) -> bool {
        self.as_any().is::<E>()
    }

    /// Type id of the concrete event.
    pub fn event_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Statically known event type a rule accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    #[must_use]
    pub fn of<E: GameEvent>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: short_type_name::<E>(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check whether `event` is of this type.
    #[must_use]
    pub fn matches(&self, event: &dyn GameEvent) -> bool {
        event.event_type_id() == self.id
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Move a piece along a resolved path.
///
/// Build with [`GameEngine::move_event`](crate::engine::GameEngine::move_event)
/// so the path comes from the piece's movement patterns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePieceEvent {
    pub piece: ArtifactId,
    pub from: ArtifactId,
    pub to: ArtifactId,
    pub path: TilePath,
}

impl GameEvent for MovePieceEvent {}

/// Set dice to explicit faces (physical dice, scripted tests).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollDiceEvent {
    pub values: Vec<(ArtifactId, i64)>,
}

impl RollDiceEvent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, dice: impl Into<ArtifactId>, value: i64) -> Self {
        self.values.push((dice.into(), value));
        self
    }
}

impl GameEvent for RollDiceEvent {}

/// Roll dice using the state's RNG.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollRandomDiceEvent {
    pub dice: Vec<ArtifactId>,
}

impl RollRandomDiceEvent {
    pub fn new(dice: impl IntoIterator<Item = impl Into<ArtifactId>>) -> Self {
        Self {
            dice: dice.into_iter().map(Into::into).collect(),
        }
    }
}

impl GameEvent for RollRandomDiceEvent {}

/// Pass the turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndTurnEvent;

impl GameEvent for EndTurnEvent {}
