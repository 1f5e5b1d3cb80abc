//! One client session: an analysis controller with the conversation wired to
//! its `ready` flag.

use std::sync::Arc;

use lens_config::ChatConfig;
use lens_core::InsightsApi;

use crate::analysis::{AnalysisController, RunOutcome};
use crate::conversation::{ConversationController, SubmitOutcome};

/// Analysis and conversation sharing one transport.
///
/// The conversation is attached as a [`crate::ReadyObserver`], so it unlocks
/// (welcome text) when an analysis completes and locks again when a new run
/// starts.
pub struct Session<A: ?Sized> {
    analysis: AnalysisController<A>,
    conversation: Arc<ConversationController<A>>,
}

impl<A: InsightsApi + ?Sized + 'static> Session<A> {
    #[must_use]
    pub fn new(api: Arc<A>, chat: &ChatConfig) -> Self {
        let analysis = AnalysisController::new(Arc::clone(&api));
        let conversation = Arc::new(ConversationController::new(
            api,
            chat.welcome_message.clone(),
            chat.locked_message.clone(),
        ));
        analysis.attach(conversation.clone());
        Self {
            analysis,
            conversation,
        }
    }

    /// See [`AnalysisController::run`].
    pub async fn run_analysis(&self) -> RunOutcome {
        self.analysis.run().await
    }

    /// See [`ConversationController::submit`].
    pub async fn ask(&self, question: &str) -> SubmitOutcome {
        self.conversation.submit(question).await
    }

    #[must_use]
    pub const fn analysis(&self) -> &AnalysisController<A> {
        &self.analysis
    }

    #[must_use]
    pub fn conversation(&self) -> &ConversationController<A> {
        &self.conversation
    }
}
