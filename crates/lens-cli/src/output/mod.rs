use std::fmt::Write as _;
use std::sync::Arc;

use lens_core::entities::{AnalysisMetrics, Insight, Message};
use lens_core::enums::Role;
use lens_core::responses::AnalysisResult;
use lens_session::{AnalysisPhase, AnalysisState};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

/// Snapshot of the analysis controller for display.
#[derive(Debug, Serialize)]
pub struct AnalysisView<'a> {
    pub phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> AnalysisView<'a> {
    #[must_use]
    pub fn from_state(state: &'a AnalysisState) -> Self {
        Self {
            phase: state.phase().as_str(),
            result: state.result().map(Arc::as_ref),
            error: state.error().map(lens_core::TransportError::message),
        }
    }
}

/// Snapshot of the conversation for display.
#[derive(Debug, Serialize)]
pub struct ConversationView<'a> {
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

/// Print a serializable response in the requested format, using `text` to
/// render the human-readable form.
pub fn output<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{}", text(value)),
    }
    Ok(())
}

#[must_use]
pub fn analysis_text(view: &AnalysisView<'_>) -> String {
    let mut out = String::new();
    if let Some(result) = view.result {
        out.push_str(&result_text(result));
    } else if let Some(error) = view.error {
        let _ = writeln!(out, "Analysis failed: {error}");
    } else if view.phase == AnalysisPhase::Idle.as_str() {
        out.push_str("No analysis has been run yet.\n");
    } else {
        let _ = writeln!(out, "Analysis {}.", view.phase);
    }
    out
}

#[must_use]
pub fn result_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary");
    push_wrapped(&mut out, &result.summary, "  ");

    if let Some(metrics) = &result.metrics {
        out.push('\n');
        out.push_str(&metrics_text(metrics));
    }

    out.push('\n');
    if result.insights.is_empty() {
        out.push_str("No insights.\n");
        return out;
    }
    let _ = writeln!(out, "Insights ({})", result.insights.len());
    for insight in &result.insights {
        out.push_str(&insight_text(insight));
    }
    out
}

fn metrics_text(metrics: &AnalysisMetrics) -> String {
    let mut out = String::from("Metrics\n");
    let _ = writeln!(
        out,
        "  sessions {}  conversions {} ({:.2}%)",
        metrics.total_sessions, metrics.total_conversions, metrics.conversion_rate
    );
    let _ = writeln!(
        out,
        "  bounce {:.1}%  exit {:.1}%  page value {:.2}",
        metrics.avg_bounce_rate * 100.0,
        metrics.avg_exit_rate * 100.0,
        metrics.avg_page_value
    );
    let _ = writeln!(
        out,
        "  weekday {} sessions ({:.2}%)  weekend {} sessions ({:.2}%)",
        metrics.weekday_sessions,
        metrics.weekday_conversion_rate,
        metrics.weekend_sessions,
        metrics.weekend_conversion_rate
    );
    out
}

fn insight_text(insight: &Insight) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n  [{}] {} ({})",
        insight.id,
        insight.title,
        insight.severity.label()
    );
    for (label, text) in [
        ("Evidence", &insight.metric_evidence),
        ("Cause", &insight.hypothesized_cause),
        ("Recommendation", &insight.recommendation),
        ("Segment", &insight.target_segment),
    ] {
        push_wrapped(&mut out, &format!("{label}: {text}"), "      ");
    }
    out
}

#[must_use]
pub fn conversation_text(view: &ConversationView<'_>) -> String {
    let mut out = String::new();
    for message in view.messages {
        out.push_str(&message_text(message));
    }
    if let Some(error) = view.error {
        let _ = writeln!(out, "! {error}");
    }
    out
}

#[must_use]
pub fn message_text(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("{speaker}> {}\n", message.content)
}

/// Append `text` with every line indented, wrapped at the terminal width
/// when one is known.
fn push_wrapped(out: &mut String, text: &str, indent: &str) {
    let width = ui::prefs()
        .term_width
        .map(|width| width.saturating_sub(indent.len()).max(20));
    for line in wrap(text, width) {
        let _ = writeln!(out, "{indent}{line}");
    }
}

fn wrap(text: &str, width: Option<usize>) -> Vec<String> {
    let Some(width) = width else {
        return text.lines().map(str::to_string).collect();
    };

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}
