//! Analysis session controller.
//!
//! ```text
//! idle ──run──▶ loading ──succeed──▶ ready
//!                  │  ▲                │
//!                  │  └──────run───────┤
//!                  └──fail──▶ failed ──┘
//! ```
//!
//! `run` while loading is dropped. `succeed`/`fail` outside loading are
//! ignored, so [`AnalysisState::apply`] is total.

use std::fmt;
use std::sync::{Arc, Mutex};

use lens_core::responses::AnalysisResult;
use lens_core::{InsightsApi, TransportError};
use tokio::sync::watch;

use crate::lock;

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Discriminant of [`AnalysisState`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl AnalysisPhase {
    /// Valid next phases from the current phase.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle | Self::Ready | Self::Failed => &[Self::Loading],
            Self::Loading => &[Self::Ready, Self::Failed],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of the one-shot analysis.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<AnalysisResult>),
    Failed(TransportError),
}

/// Inputs to the analysis state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    Run,
    Succeed(AnalysisResult),
    Fail(TransportError),
}

impl AnalysisState {
    #[must_use]
    pub const fn phase(&self) -> AnalysisPhase {
        match self {
            Self::Idle => AnalysisPhase::Idle,
            Self::Loading => AnalysisPhase::Loading,
            Self::Ready(_) => AnalysisPhase::Ready,
            Self::Failed(_) => AnalysisPhase::Failed,
        }
    }

    /// Next state for `event`. Events that do not apply leave the state as is.
    #[must_use]
    pub fn apply(self, event: AnalysisEvent) -> Self {
        match (self, event) {
            (_, AnalysisEvent::Run) => Self::Loading,
            (Self::Loading, AnalysisEvent::Succeed(result)) => Self::Ready(Arc::new(result)),
            (Self::Loading, AnalysisEvent::Fail(error)) => Self::Failed(error),
            (state, AnalysisEvent::Succeed(_) | AnalysisEvent::Fail(_)) => state,
        }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn result(&self) -> Option<&Arc<AnalysisResult>> {
        match self {
            Self::Ready(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&TransportError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Notified synchronously whenever the derived `ready` flag flips.
///
/// Flips are delivered one at a time, in the order the transitions were
/// applied, even when runs complete on different threads. A slow observer
/// delays the next transition.
pub trait ReadyObserver: Send + Sync {
    fn ready_changed(&self, ready: bool);
}

/// What a call to [`AnalysisController::run`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A request was issued and its result applied.
    Completed,
    /// A run was already in flight; this trigger was dropped.
    AlreadyRunning,
}

/// Owns the analysis lifecycle for one session.
pub struct AnalysisController<A: ?Sized> {
    api: Arc<A>,
    state: Mutex<AnalysisState>,
    ready_tx: watch::Sender<bool>,
    observers: Mutex<Vec<Arc<dyn ReadyObserver>>>,
}

impl<A: InsightsApi + ?Sized> AnalysisController<A> {
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            api,
            state: Mutex::new(AnalysisState::Idle),
            ready_tx,
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Register an observer of the `ready` flag. It is not called for the
    /// current value, only for later flips.
    pub fn attach(&self, observer: Arc<dyn ReadyObserver>) {
        lock(&self.observers).push(observer);
    }

    /// Receiver tracking the `ready` flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    /// Start an analysis unless one is already in flight, then wait for it
    /// and store its result or error.
    ///
    /// Failures are stored in [`AnalysisState::Failed`], never returned.
    pub async fn run(&self) -> RunOutcome {
        let from = self.dispatch(AnalysisEvent::Run);
        if from == AnalysisPhase::Loading {
            tracing::debug!("analysis already running; trigger dropped");
            return RunOutcome::AlreadyRunning;
        }

        let event = match self.api.run_analysis().await {
            Ok(result) => AnalysisEvent::Succeed(result),
            Err(error) => AnalysisEvent::Fail(error),
        };
        self.dispatch(event);
        RunOutcome::Completed
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AnalysisState {
        lock(&self.state).clone()
    }

    #[must_use]
    pub fn phase(&self) -> AnalysisPhase {
        lock(&self.state).phase()
    }

    #[must_use]
    pub fn result(&self) -> Option<Arc<AnalysisResult>> {
        lock(&self.state).result().cloned()
    }

    #[must_use]
    pub fn error(&self) -> Option<TransportError> {
        lock(&self.state).error().cloned()
    }

    /// True only while a completed result is held.
    #[must_use]
    pub fn ready(&self) -> bool {
        lock(&self.state).is_ready()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading()
    }

    /// Apply one event and publish the `ready` flag. Returns the phase the
    /// machine was in before the event.
    ///
    /// The observer list lock is held from the transition through the last
    /// observer call, so flips reach observers in the order they were
    /// applied. Observers must not call [`Self::attach`].
    fn dispatch(&self, event: AnalysisEvent) -> AnalysisPhase {
        let observers = lock(&self.observers);
        let (from, to, flipped) = {
            let mut state = lock(&self.state);
            let current = std::mem::take(&mut *state);
            let from = current.phase();
            *state = current.apply(event);
            let ready = state.is_ready();
            let flipped = self.ready_tx.send_if_modified(|published| {
                if *published == ready {
                    false
                } else {
                    *published = ready;
                    true
                }
            });
            (from, state.phase(), flipped.then_some(ready))
        };

        if from != to {
            tracing::debug!(%from, %to, "analysis transition");
        }
        if let Some(ready) = flipped {
            for observer in observers.iter() {
                observer.ready_changed(ready);
            }
        }
        from
    }
}
