//! Game progress: an engine paired with a current state.
//!
//! `handle_event` never mutates a progress; it returns a new one. An ignored
//! event returns a clone of the *same* progress handle, so callers can tell
//! "nothing happened" from "state changed" with [`GameProgress::is_same`]
//! without comparing states.
//!
//! ```
//! use tabletop_engine::game::{GameBuilder, PhaseDefinition};
//! use tabletop_engine::rules::{EndTurnEvent, EventRule, NextActivePlayer, RollDiceEvent};
//!
//! let mut builder = GameBuilder::new();
//! builder
//!     .add_player("alice")
//!     .add_player("bob")
//!     .with_active_player("alice")
//!     .add_phase(PhaseDefinition::leaf(
//!         "turns",
//!         EventRule::on::<EndTurnEvent>("pass").then(NextActivePlayer),
//!     ));
//! let start = builder.compile().unwrap();
//!
//! let next = start.handle_event(EndTurnEvent).unwrap();
//! assert_eq!(next.state().active_player().unwrap().as_str(), "bob");
//!
//! // No rule cares about dice: same progress back.
//! let same = next.handle_event(RollDiceEvent::new()).unwrap();
//! assert!(same.is_same(&next));
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::core::GameState;
use crate::error::EngineError;
use crate::resolution::RuleDecision;
use crate::rules::GameEvent;

use super::pipeline::Evaluation;
use super::runtime::GameEngine;

struct ProgressInner {
    engine: Arc<GameEngine>,
    state: Arc<GameState>,
    last_event: Option<Arc<dyn GameEvent>>,
    last_decision: Option<RuleDecision>,
    applied_events: u64,
}

/// Handle pairing the engine with the current state. Cheap to clone; clones
/// are the same progress.
#[derive(Clone)]
pub struct GameProgress {
    inner: Arc<ProgressInner>,
}

impl GameProgress {
    pub(crate) fn new(engine: Arc<GameEngine>, state: GameState) -> Self {
        Self {
            inner: Arc::new(ProgressInner {
                engine,
                state: Arc::new(state),
                last_event: None,
                last_decision: None,
                applied_events: 0,
            }),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<GameEngine> {
        &self.inner.engine
    }

    #[must_use]
    pub fn state(&self) -> &Arc<GameState> {
        &self.inner.state
    }

    /// Event that produced this progress; `None` for the initial progress.
    #[must_use]
    pub fn last_event(&self) -> Option<&Arc<dyn GameEvent>> {
        self.inner.last_event.as_ref()
    }

    /// Rule selection that produced this progress.
    #[must_use]
    pub fn last_decision(&self) -> Option<&RuleDecision> {
        self.inner.last_decision.as_ref()
    }

    /// Number of events applied since the initial progress.
    #[must_use]
    pub fn applied_events(&self) -> u64 {
        self.inner.applied_events
    }

    /// Reference identity: true if both handles are the same progress.
    #[must_use]
    pub fn is_same(&self, other: &GameProgress) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Handle an event.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidEvent`] when a rule rejected the event and no
    /// other rule accepted it; [`EngineError::RuleConflict`] under exclusive
    /// resolution when several rules accepted it.
    pub fn handle_event<E: GameEvent>(&self, event: E) -> Result<GameProgress, EngineError> {
        self.handle_shared(Arc::new(event))
    }

    /// Handle an already shared event.
    ///
    /// # Errors
    ///
    /// See [`handle_event`](Self::handle_event).
    #[instrument(skip_all, fields(event = event.name(), step = self.applied_events()))]
    pub fn handle_shared(&self, event: Arc<dyn GameEvent>) -> Result<GameProgress, EngineError> {
        match self.inner.engine.evaluate(&self.inner.state, &event) {
            Ok(Evaluation::Ignored) => {
                debug!("event ignored");
                Ok(self.clone())
            }
            Ok(Evaluation::Applied { state, decision }) => {
                debug!(%decision, "event applied");
                Ok(Self {
                    inner: Arc::new(ProgressInner {
                        engine: Arc::clone(&self.inner.engine),
                        state: Arc::new(state),
                        last_event: Some(event),
                        last_decision: Some(decision),
                        applied_events: self.inner.applied_events + 1,
                    }),
                })
            }
            Err(error) => {
                debug!(%error, "event failed");
                Err(error)
            }
        }
    }

    /// Handle events in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error raised by [`handle_shared`](Self::handle_shared).
    pub fn handle_events<I>(&self, events: I) -> Result<GameProgress, EngineError>
    where
        I: IntoIterator<Item = Arc<dyn GameEvent>>,
    {
        events
            .into_iter()
            .try_fold(self.clone(), |progress, event| progress.handle_shared(event))
    }
}

impl fmt::Debug for GameProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameProgress")
            .field("applied_events", &self.inner.applied_events)
            .field("last_event", &self.inner.last_event)
            .field("state", &self.inner.state.fingerprint())
            .finish_non_exhaustive()
    }
}
