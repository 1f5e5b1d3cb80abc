//! The seam between the session controllers and the remote service.

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::responses::{AnalysisResult, ChatReply};

/// The two operations the analysis service exposes.
///
/// Implementations must normalize every failure into a [`TransportError`]
/// and must not retry.
#[async_trait]
pub trait InsightsApi: Send + Sync {
    /// Run the one-shot analysis and return its full result.
    async fn run_analysis(&self) -> Result<AnalysisResult, TransportError>;

    /// Ask a follow-up question scoped to the latest insights.
    ///
    /// `question` is already trimmed and non-empty.
    async fn ask(&self, question: &str) -> Result<ChatReply, TransportError>;
}
