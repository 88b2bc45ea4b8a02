//! Console output formatter for turn outcomes and session reports

use crate::cli::commands::OutputFormat;
use colored::Colorize;
use parley_application::TurnOutcome;
use parley_domain::{ConversationStats, SessionInsights};

/// Formats engine results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format an outcome in the requested format
    pub fn render(outcome: &TurnOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self::format(outcome),
            OutputFormat::Json => Self::format_json(outcome),
            OutputFormat::Prompt => outcome.digest.to_prompt(),
        }
    }

    /// Format one processed turn
    pub fn format(outcome: &TurnOutcome) -> String {
        let resolution = &outcome.resolution;
        let digest = &outcome.digest;
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Input:".cyan().bold(),
            digest.input
        ));
        if resolution.is_annotated() {
            output.push_str(&format!(
                "{} {}\n",
                "Means:".cyan().bold(),
                resolution.resolved_text
            ));
        }

        let subject = match &digest.subject {
            Some(subject) => format!("{} (depth {})", subject, digest.topic_depth),
            None => "-".dimmed().to_string(),
        };
        let marker = if resolution.subject_changed {
            format!(" {}", "[new]".green())
        } else {
            String::new()
        };
        output.push_str(&format!(
            "{} {}{}\n",
            "Subject:".cyan().bold(),
            subject,
            marker
        ));

        let follow_up = match resolution.follow_up_signal {
            Some(signal) if resolution.is_follow_up => {
                format!("yes ({})", signal.as_str()).yellow().to_string()
            }
            _ => "no".to_string(),
        };
        output.push_str(&format!(
            "{} {}  {} {}\n",
            "Follow-up:".cyan().bold(),
            follow_up,
            "Question:".cyan().bold(),
            resolution.question_type
        ));

        if !digest.current_topics.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Topics:".cyan().bold(),
                digest.current_topics.join(", ")
            ));
        }
        if !digest.active_entity_names.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Entities:".cyan().bold(),
                digest.active_entity_names.join(", ")
            ));
        }

        if !digest.summary.is_empty() {
            output.push_str(&Self::section_header("Summary"));
            output.push_str(&Self::indent(&digest.summary, "  "));
            output.push('\n');
        }

        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &TurnOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format session insights
    pub fn format_insights(insights: &SessionInsights) -> String {
        let mut output = Self::section_header("Insights");
        output.push_str(&format!(
            "  {} {}\n",
            "Subject:".bold(),
            insights.current_subject.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!("  {} {}\n", "Depth:".bold(), insights.topic_depth));
        output.push_str(&format!(
            "  {} {}\n",
            "Style:".bold(),
            insights.style.as_str()
        ));
        for suggestion in &insights.suggestions {
            output.push_str(&format!("  * {}\n", suggestion.green()));
        }
        output
    }

    /// Format session statistics with the one-line overview
    pub fn format_stats(stats: &ConversationStats, overview: &str) -> String {
        let mut output = Self::section_header("Stats");
        output.push_str(&format!("  {}\n", overview.dimmed()));
        output.push_str(&format!(
            "  {} {} ({} user, {} assistant)\n",
            "Turns:".bold(),
            stats.total_turns,
            stats.user_turns,
            stats.assistant_turns
        ));
        let sentiment = &stats.sentiment_counts;
        output.push_str(&format!(
            "  {} +{} ={} -{}\n",
            "Sentiment:".bold(),
            sentiment.positive,
            sentiment.neutral,
            sentiment.negative
        ));
        if !stats.current_topics.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Topics:".bold(),
                stats.current_topics.join(", ")
            ));
        }
        if !stats.active_entities.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Entities:".bold(),
                stats.active_entities.join(", ")
            ));
        }
        output
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use parley_application::ContextEngine;
    use parley_domain::MemoryPolicy;

    async fn outcome() -> TurnOutcome {
        colored::control::set_override(false);
        let engine = ContextEngine::in_memory(MemoryPolicy::default());
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        engine.process_turn("s", "Tell me about Python", now).await;
        engine
            .update_from_response("s", "Tell me about Python", "Python is a language.", now)
            .await;
        engine.process_turn("s", "What's its history?", now).await
    }

    #[tokio::test]
    async fn test_format_text_shows_resolution() {
        let text = ConsoleFormatter::format(&outcome().await);
        assert!(text.contains("Means: What's its history? [Referring to: Python]"));
        assert!(text.contains("Subject: Python (depth 2)"));
        assert!(text.contains("Follow-up: yes (pronoun)"));
        assert!(text.contains("Question: what"));
        assert!(text.contains("  Recent conversation:"));
    }

    #[tokio::test]
    async fn test_format_json_round_trips_fields() {
        let json = ConsoleFormatter::render(&outcome().await, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["resolution"]["subject"], "Python");
        assert_eq!(value["digest"]["is_follow_up"], true);
    }

    #[tokio::test]
    async fn test_render_prompt_is_framed() {
        let prompt = ConsoleFormatter::render(&outcome().await, OutputFormat::Prompt);
        assert!(prompt.starts_with("=== CONVERSATION CONTEXT ==="));
        assert!(prompt.trim_end().ends_with("=== END CONTEXT ==="));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
