use anyhow::bail;
use lens_session::SubmitOutcome;

use crate::bootstrap::AppSession;
use crate::cli::{AskArgs, GlobalFlags};
use crate::output::{AnalysisView, ConversationView, analysis_text, conversation_text, output};

/// Handle `uxlens ask`. The assistant only answers once an analysis is held,
/// so one always runs first.
pub async fn handle(
    args: &AskArgs,
    session: &AppSession,
    flags: &GlobalFlags,
) -> anyhow::Result<i32> {
    let question = args.text();
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }

    if !super::run_analysis(session).await {
        let state = session.analysis().state();
        output(&AnalysisView::from_state(&state), flags.format, analysis_text)?;
        return Ok(1);
    }

    let outcome = super::ask_question(session, &question).await;

    let conversation = session.conversation();
    let messages = conversation.messages();
    let error = conversation.error();
    let view = ConversationView {
        messages: &messages,
        error: error.as_deref(),
    };
    output(&view, flags.format, conversation_text)?;

    Ok(if outcome == SubmitOutcome::Answered { 0 } else { 1 })
}
