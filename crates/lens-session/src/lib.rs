//! # lens-session
//!
//! Client-side controllers for one uxlens session.
//!
//! - [`AnalysisController`] drives `run analysis → receive insights` through
//!   `Idle → Loading → Ready | Failed` and publishes a derived `ready` flag.
//! - [`ConversationController`] owns the message history and the
//!   `ask → answer` exchange, gated on that flag.
//! - [`Session`] wires the two together for a single [`lens_core::InsightsApi`].
//!
//! Both controllers are single-flight: a trigger issued while a request is
//! outstanding is dropped, not queued. State sits behind a mutex that is
//! never held across an `.await`, so reads never wait on the network.

pub mod analysis;
pub mod conversation;
pub mod session;

pub use analysis::{
    AnalysisController, AnalysisEvent, AnalysisPhase, AnalysisState, ReadyObserver, RunOutcome,
};
pub use conversation::{ConversationController, SubmitOutcome};
pub use session::Session;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a state mutex, recovering the data if a previous holder panicked.
///
/// Every critical section in this crate leaves the state consistent before
/// any call that could panic, so a poisoned lock still guards valid data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
