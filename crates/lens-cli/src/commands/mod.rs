use lens_session::SubmitOutcome;

use crate::bootstrap::AppSession;
use crate::cli::{Commands, GlobalFlags};
use crate::progress::Progress;

pub mod analyze;
pub mod ask;
pub mod chat;

/// Dispatch a parsed command to its handler. Returns the process exit code.
pub async fn dispatch(
    command: &Commands,
    session: &AppSession,
    flags: &GlobalFlags,
) -> anyhow::Result<i32> {
    match command {
        Commands::Analyze => analyze::handle(session, flags).await,
        Commands::Ask(args) => ask::handle(args, session, flags).await,
        Commands::Chat => chat::handle(session, flags).await,
    }
}

/// Run the analysis behind a spinner. Returns whether it succeeded.
async fn run_analysis(session: &AppSession) -> bool {
    let spinner = Progress::spinner("Analyzing sessions...");
    session.run_analysis().await;
    spinner.finish_clear();
    session.analysis().ready()
}

/// Ask one question behind a spinner.
async fn ask_question(session: &AppSession, question: &str) -> SubmitOutcome {
    let spinner = Progress::spinner("Waiting for the assistant...");
    let outcome = session.ask(question).await;
    spinner.finish_clear();
    outcome
}
