//! Line-oriented turn loop
//!
//! Reads one message per line, feeds user lines through
//! [`ContextEngine::process_turn`] and records `assistant:` lines as replies.

use crate::cli::commands::OutputFormat;
use crate::output::console::ConsoleFormatter;
use chrono::Utc;
use parley_application::ContextEngine;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const REPLY_PREFIX: &str = "assistant:";
const USER_PREFIX: &str = "user:";

/// Slash commands understood by the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Soft clear: forget turns, keep entity knowledge
    Clear,
    /// Hard clear: forget everything
    Reset,
    Insights,
    Stats,
    Help,
    Quit,
    Unknown(String),
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Turn(String),
    Reply(String),
    Command(ReplCommand),
    Skip,
}

impl ReplInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplInput::Skip;
        }

        if line.starts_with('/') {
            let command = match line.to_lowercase().as_str() {
                "/clear" => ReplCommand::Clear,
                "/reset" => ReplCommand::Reset,
                "/insights" => ReplCommand::Insights,
                "/stats" => ReplCommand::Stats,
                "/help" | "/h" | "/?" => ReplCommand::Help,
                "/quit" | "/exit" | "/q" => ReplCommand::Quit,
                _ => ReplCommand::Unknown(line.to_string()),
            };
            return ReplInput::Command(command);
        }

        if let Some(reply) = strip_prefix_ignore_case(line, REPLY_PREFIX) {
            return ReplInput::Reply(reply.trim().to_string());
        }
        let text = strip_prefix_ignore_case(line, USER_PREFIX).unwrap_or(line);
        ReplInput::Turn(text.trim().to_string())
    }
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

/// Interactive or piped turn loop for one session
pub struct TurnRepl {
    engine: Arc<ContextEngine>,
    session: String,
    format: OutputFormat,
    show_prompt: bool,
    last_user_text: Option<String>,
}

impl TurnRepl {
    pub fn new(engine: Arc<ContextEngine>, session: impl Into<String>) -> Self {
        Self {
            engine,
            session: session.into(),
            format: OutputFormat::Text,
            show_prompt: false,
            last_user_text: None,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Print a `>>>` prompt before each line (for terminals)
    pub fn with_prompt(mut self, show: bool) -> Self {
        self.show_prompt = show;
        self
    }

    /// Run until end of input or `/quit`
    pub async fn run<R, W>(&mut self, reader: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if self.show_prompt {
            Self::print_welcome(out, &self.session)?;
        }

        let mut lines = reader.lines();
        loop {
            if self.show_prompt {
                write!(out, ">>> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if self.handle(ReplInput::parse(&line), out).await? {
                break;
            }
        }
        Ok(())
    }

    /// Handle one input. Returns true if the loop should stop.
    async fn handle<W: Write>(&mut self, input: ReplInput, out: &mut W) -> io::Result<bool> {
        let engine = &self.engine;
        let session = self.session.as_str();
        match input {
            ReplInput::Skip => {}
            ReplInput::Turn(text) => {
                let outcome = engine.process_turn(session, &text, Utc::now()).await;
                writeln!(out, "{}", ConsoleFormatter::render(&outcome, self.format))?;
                self.last_user_text = Some(text);
            }
            ReplInput::Reply(text) => {
                let user_text = self.last_user_text.as_deref().unwrap_or_default();
                engine
                    .update_from_response(session, user_text, &text, Utc::now())
                    .await;
            }
            ReplInput::Command(ReplCommand::Clear) => {
                engine.clear(session, false).await;
                self.last_user_text = None;
                writeln!(out, "Conversation cleared.")?;
            }
            ReplInput::Command(ReplCommand::Reset) => {
                engine.clear(session, true).await;
                self.last_user_text = None;
                writeln!(out, "Session reset.")?;
            }
            ReplInput::Command(ReplCommand::Insights) => {
                let insights = engine.insights(session).await;
                writeln!(out, "{}", ConsoleFormatter::format_insights(&insights))?;
            }
            ReplInput::Command(ReplCommand::Stats) => {
                let stats = engine.stats(session).await;
                let overview = engine.describe(session).await;
                writeln!(out, "{}", ConsoleFormatter::format_stats(&stats, &overview))?;
            }
            ReplInput::Command(ReplCommand::Help) => Self::print_help(out)?,
            ReplInput::Command(ReplCommand::Quit) => return Ok(true),
            ReplInput::Command(ReplCommand::Unknown(cmd)) => {
                writeln!(out, "Unknown command: {}", cmd)?;
                writeln!(out, "Type /help for available commands")?;
            }
        }
        Ok(false)
    }

    fn print_welcome<W: Write>(out: &mut W, session: &str) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "parley - session '{}'", session)?;
        writeln!(out, "Type a message, or 'assistant: ...' to record a reply.")?;
        Self::print_help(out)
    }

    fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Commands:")?;
        writeln!(out, "  /clear            - Forget the conversation, keep known entities")?;
        writeln!(out, "  /reset            - Forget everything about this session")?;
        writeln!(out, "  /insights         - Show subject, depth and style")?;
        writeln!(out, "  /stats            - Show turn and sentiment counts")?;
        writeln!(out, "  /quit, /exit, /q  - Exit")?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::MemoryPolicy;

    #[test]
    fn test_parse_lines() {
        assert_eq!(ReplInput::parse("   "), ReplInput::Skip);
        assert_eq!(
            ReplInput::parse("Tell me about Rust"),
            ReplInput::Turn("Tell me about Rust".to_string())
        );
        assert_eq!(
            ReplInput::parse("User: hi there"),
            ReplInput::Turn("hi there".to_string())
        );
        assert_eq!(
            ReplInput::parse("Assistant: Rust is a language."),
            ReplInput::Reply("Rust is a language.".to_string())
        );
        assert_eq!(
            ReplInput::parse("/RESET"),
            ReplInput::Command(ReplCommand::Reset)
        );
        assert_eq!(
            ReplInput::parse("/frobnicate"),
            ReplInput::Command(ReplCommand::Unknown("/frobnicate".to_string()))
        );
    }

    #[test]
    fn test_short_lines_are_turns() {
        assert_eq!(ReplInput::parse("ok"), ReplInput::Turn("ok".to_string()));
    }

    #[tokio::test]
    async fn test_run_processes_piped_conversation() {
        colored::control::set_override(false);
        let engine = Arc::new(ContextEngine::in_memory(MemoryPolicy::default()));
        let mut repl = TurnRepl::new(engine.clone(), "demo");
        let input: &[u8] = b"Tell me about Python\nassistant: Python is a language.\nWhat's its history?\n/insights\n/quit\nnever read\n";
        let mut out = Vec::new();

        repl.run(input, &mut out).await.unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("[Referring to: Python]"));
        assert!(printed.contains("Insights"));
        let stats = engine.stats("demo").await;
        assert_eq!(stats.user_turns, 2);
        assert_eq!(stats.assistant_turns, 1);
    }

    #[tokio::test]
    async fn test_reset_forgets_session() {
        let engine = Arc::new(ContextEngine::in_memory(MemoryPolicy::default()));
        let mut repl = TurnRepl::new(engine.clone(), "demo").with_format(OutputFormat::Json);
        let input: &[u8] = b"Tell me about Python\n/reset\n";
        let mut out = Vec::new();

        repl.run(input, &mut out).await.unwrap();

        assert_eq!(engine.stats("demo").await.total_turns, 0);
        assert_eq!(engine.insights("demo").await.current_subject, None);
    }
}
