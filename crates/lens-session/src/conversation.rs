//! Conversation controller.
//!
//! Owns the ordered message history and the `ask → answer` exchange. The
//! controller only accepts questions while enabled; every enablement flip
//! replaces the history with a single assistant message (welcome or locked
//! text) and bumps a generation counter. A send that completes after a flip
//! belongs to a conversation that no longer exists and is dropped.

use std::sync::{Arc, Mutex};

use lens_core::InsightsApi;
use lens_core::entities::Message;
use tokio::sync::watch;

use crate::analysis::ReadyObserver;
use crate::lock;

/// What a call to [`ConversationController::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Guard failed: disabled, already sending, or blank question.
    Rejected,
    /// The assistant's answer was appended.
    Answered,
    /// The request failed; the error is stored for display.
    Failed,
    /// The conversation was reset while the request was in flight; its
    /// result was discarded.
    Stale,
}

#[derive(Debug)]
struct ConversationState {
    messages: Vec<Message>,
    input: String,
    sending: bool,
    error: Option<String>,
    enabled: bool,
    generation: u64,
}

impl ConversationState {
    fn can_send(&self, question: &str) -> bool {
        self.enabled && !self.sending && !question.trim().is_empty()
    }
}

/// Message history and send lifecycle for one session.
pub struct ConversationController<A: ?Sized> {
    api: Arc<A>,
    welcome_message: String,
    locked_message: String,
    state: Mutex<ConversationState>,
    revision_tx: watch::Sender<u64>,
}

impl<A: InsightsApi + ?Sized> ConversationController<A> {
    /// Create a disabled conversation showing `locked_message`.
    #[must_use]
    pub fn new(
        api: Arc<A>,
        welcome_message: impl Into<String>,
        locked_message: impl Into<String>,
    ) -> Self {
        let locked_message = locked_message.into();
        let (revision_tx, _) = watch::channel(0);
        Self {
            api,
            welcome_message: welcome_message.into(),
            state: Mutex::new(ConversationState {
                messages: vec![Message::assistant(locked_message.clone())],
                input: String::new(),
                sending: false,
                error: None,
                enabled: false,
                generation: 0,
            }),
            locked_message,
            revision_tx,
        }
    }

    /// Follow the enablement gate. Only a change of value resets the
    /// conversation; repeating the current value is a no-op.
    ///
    /// Returns whether a reset happened.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        {
            let mut state = lock(&self.state);
            if state.enabled == enabled {
                return false;
            }
            let text = if enabled {
                &self.welcome_message
            } else {
                &self.locked_message
            };
            state.enabled = enabled;
            state.messages = vec![Message::assistant(text.clone())];
            state.error = None;
            state.input.clear();
            state.generation += 1;
            tracing::debug!(enabled, generation = state.generation, "conversation reset");
        }
        self.bump_revision();
        true
    }

    /// Ask `question`, appending the user's message before the request and
    /// the assistant's answer after it.
    ///
    /// A failure is stored (see [`Self::error`]) rather than appended to the
    /// history.
    pub async fn submit(&self, question: &str) -> SubmitOutcome {
        let question = question.trim();
        let generation = {
            let mut state = lock(&self.state);
            if !state.can_send(question) {
                return SubmitOutcome::Rejected;
            }
            state.messages.push(Message::user(question));
            state.error = None;
            state.input.clear();
            state.sending = true;
            state.generation
        };
        self.bump_revision();

        let reply = self.api.ask(question).await;

        let outcome = {
            let mut state = lock(&self.state);
            state.sending = false;
            if state.generation != generation {
                tracing::debug!(
                    started = generation,
                    current = state.generation,
                    "discarding chat completion for a reset conversation"
                );
                SubmitOutcome::Stale
            } else {
                match reply {
                    Ok(reply) => {
                        state.messages.push(Message::assistant(reply.answer));
                        SubmitOutcome::Answered
                    }
                    Err(error) => {
                        state.error = Some(error.message().to_string());
                        SubmitOutcome::Failed
                    }
                }
            }
        };
        if outcome == SubmitOutcome::Answered {
            self.bump_revision();
        }
        outcome
    }

    /// Submit the pending draft set through [`Self::set_input`].
    pub async fn submit_input(&self) -> SubmitOutcome {
        let draft = lock(&self.state).input.clone();
        self.submit(&draft).await
    }

    /// Replace the pending draft.
    pub fn set_input(&self, text: impl Into<String>) {
        lock(&self.state).input = text.into();
    }

    #[must_use]
    pub fn input(&self) -> String {
        lock(&self.state).input.clone()
    }

    /// Whether the pending draft would be accepted by [`Self::submit_input`].
    #[must_use]
    pub fn can_send(&self) -> bool {
        let state = lock(&self.state);
        state.can_send(&state.input)
    }

    /// History in display order.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        lock(&self.state).messages.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.state).messages.len()
    }

    /// Always false: the history holds at least the welcome or locked text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.state).messages.is_empty()
    }

    #[must_use]
    pub fn last_message(&self) -> Option<Message> {
        lock(&self.state).messages.last().cloned()
    }

    /// Message of the last failed send, cleared by the next send or reset.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        lock(&self.state).enabled
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        lock(&self.state).sending
    }

    /// Number of resets so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        lock(&self.state).generation
    }

    /// Receiver that changes whenever the history changes, so a view can
    /// keep the newest message visible.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    fn bump_revision(&self) {
        self.revision_tx.send_modify(|revision| *revision += 1);
    }
}

impl<A: InsightsApi + ?Sized> ReadyObserver for ConversationController<A> {
    fn ready_changed(&self, ready: bool) {
        self.set_enabled(ready);
    }
}
