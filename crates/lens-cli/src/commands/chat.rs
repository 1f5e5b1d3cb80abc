use std::io::Write as _;

use anyhow::Context;
use lens_session::SubmitOutcome;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::bootstrap::AppSession;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::{
    AnalysisView, ConversationView, analysis_text, conversation_text, message_text, output,
};

const HELP: &str = "\
Type a question and press enter.
  /run      re-run the analysis (resets the conversation)
  /history  show the conversation so far
  /help     show this help
  /quit     leave
";

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Blank,
    Question(&'a str),
    Run,
    History,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> ChatInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Blank;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ChatInput::Question(line);
    };
    match command.to_ascii_lowercase().as_str() {
        "run" | "rerun" => ChatInput::Run,
        "history" => ChatInput::History,
        "help" | "?" => ChatInput::Help,
        "quit" | "exit" | "q" => ChatInput::Quit,
        _ => ChatInput::Unknown(line),
    }
}

/// Handle `uxlens chat`.
pub async fn handle(session: &AppSession, flags: &GlobalFlags) -> anyhow::Result<i32> {
    let text = flags.format == OutputFormat::Text;

    run_and_show(session, flags).await?;
    if text {
        print_last_message(session);
        if !flags.quiet {
            print!("{HELP}");
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if text {
            prompt()?;
        }
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        match parse_line(&line) {
            ChatInput::Blank => {}
            ChatInput::Quit => break,
            ChatInput::Help => print!("{HELP}"),
            ChatInput::Unknown(command) => eprintln!("unknown command '{command}', try /help"),
            ChatInput::History => show_conversation(session, flags)?,
            ChatInput::Run => {
                run_and_show(session, flags).await?;
                if text {
                    print_last_message(session);
                }
            }
            ChatInput::Question(question) => {
                let outcome = super::ask_question(session, question).await;
                report_outcome(session, outcome, text);
            }
        }
    }

    if !text {
        show_conversation(session, flags)?;
    }
    Ok(0)
}

async fn run_and_show(session: &AppSession, flags: &GlobalFlags) -> anyhow::Result<()> {
    super::run_analysis(session).await;
    let state = session.analysis().state();
    output(&AnalysisView::from_state(&state), flags.format, analysis_text)
}

fn show_conversation(session: &AppSession, flags: &GlobalFlags) -> anyhow::Result<()> {
    let conversation = session.conversation();
    let messages = conversation.messages();
    let error = conversation.error();
    let view = ConversationView {
        messages: &messages,
        error: error.as_deref(),
    };
    output(&view, flags.format, conversation_text)
}

fn report_outcome(session: &AppSession, outcome: SubmitOutcome, text: bool) {
    let conversation = session.conversation();
    match outcome {
        SubmitOutcome::Answered if text => print_last_message(session),
        SubmitOutcome::Failed => {
            if let Some(error) = conversation.error() {
                eprintln!("! {error}");
            }
        }
        SubmitOutcome::Rejected if !conversation.is_enabled() => {
            // The locked text is the only message while disabled.
            print_last_message(session);
        }
        SubmitOutcome::Answered | SubmitOutcome::Rejected | SubmitOutcome::Stale => {}
    }
}

fn print_last_message(session: &AppSession) {
    if let Some(message) = session.conversation().last_message() {
        print!("{}", message_text(&message));
    }
}

fn prompt() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "> ")?;
    stdout.flush().context("failed to flush stdout")
}
