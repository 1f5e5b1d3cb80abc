use crate::bootstrap::AppSession;
use crate::cli::GlobalFlags;
use crate::output::{AnalysisView, analysis_text, output};

/// Handle `uxlens analyze`.
pub async fn handle(session: &AppSession, flags: &GlobalFlags) -> anyhow::Result<i32> {
    let ready = super::run_analysis(session).await;

    let state = session.analysis().state();
    output(&AnalysisView::from_state(&state), flags.format, analysis_text)?;

    Ok(if ready { 0 } else { 1 })
}
