use clap::{Args, Parser, Subcommand};

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `uxlens` binary.
#[derive(Debug, Parser)]
#[command(
    name = "uxlens",
    version,
    about = "uxlens - UX analytics insights and an assistant to discuss them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, text
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analysis service base URL (overrides config)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            base_url: self.base_url.clone(),
        }
    }
}

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the analysis and show its insights.
    Analyze,
    /// Run the analysis, then ask the assistant one question.
    Ask(AskArgs),
    /// Interactive session: analysis plus a conversation on stdin.
    Chat,
}

#[derive(Clone, Debug, Args)]
pub struct AskArgs {
    /// Question for the assistant.
    #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
    pub question: Vec<String>,
}

impl AskArgs {
    /// The question words joined back into one string.
    #[must_use]
    pub fn text(&self) -> String {
        self.question.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_text_output() {
        let cli = Cli::try_parse_from(["uxlens", "analyze"]).expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.quiet);
        assert!(cli.base_url.is_none());
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "uxlens",
            "--format",
            "json",
            "--base-url",
            "http://analysis.internal:9000",
            "--verbose",
            "analyze",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(
            cli.base_url.as_deref(),
            Some("http://analysis.internal:9000")
        );
        assert!(matches!(cli.command, Commands::Analyze));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["uxlens", "chat", "--quiet", "--format", "json"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Chat));
    }

    #[test]
    fn ask_joins_unquoted_words() {
        let cli = Cli::try_parse_from(["uxlens", "ask", "Which", "segment", "first?"])
            .expect("cli should parse");

        let Commands::Ask(args) = cli.command else {
            panic!("expected ask command");
        };
        assert_eq!(args.text(), "Which segment first?");
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["uxlens", "ask"]).is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["uxlens", "--format", "table", "analyze"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["uxlens", "--base-url", "http://127.0.0.1:8000", "chat"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.base_url.as_deref(), Some("http://127.0.0.1:8000"));
        assert_eq!(flags.format, OutputFormat::Text);
    }
}
