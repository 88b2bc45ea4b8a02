//! CLI entrypoint for parley
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use parley_application::ContextEngine;
use parley_domain::ConfigIssue;
use parley_infrastructure::{ConfigLoader, JsonlConversationLogger, build_persistence};
use parley_presentation::{Cli, ConsoleFormatter, TurnRepl};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let log_file = cli.log_file.clone().or_else(|| config.logging.log_file.clone());
    let _log_guard = init_logging(cli.verbose, log_file.as_deref())?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    report_issues(&config.validate());

    // === Dependency Injection ===
    let (policy, _) = config.memory.to_memory_policy();
    let (persistence, _) = build_persistence(&config.persistence);
    let mut engine = ContextEngine::new(persistence, policy);

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => engine = engine.with_conversation_logger(Arc::new(logger)),
            None => warn!(path = %path.display(), "Conversation event log disabled"),
        }
    }
    let engine = Arc::new(engine);

    info!(session = %cli.session, "Starting parley");

    if cli.clear {
        engine.clear(&cli.session, true).await;
    }

    if let Some(text) = &cli.text {
        let outcome = engine.process_turn(&cli.session, text, Utc::now()).await;
        println!("{}", ConsoleFormatter::render(&outcome, cli.output));

        if let Some(reply) = &cli.reply {
            engine
                .update_from_response(&cli.session, text, reply, Utc::now())
                .await;
        }
    } else if !cli.report_only() {
        let interactive = std::io::stdin().is_terminal();
        let mut repl = TurnRepl::new(engine.clone(), cli.session.clone())
            .with_format(cli.output)
            .with_prompt(interactive);
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        repl.run(stdin, &mut std::io::stdout())
            .await
            .context("Failed to read input")?;
    }

    if cli.insights {
        let insights = engine.insights(&cli.session).await;
        println!("{}", ConsoleFormatter::format_insights(&insights));
    }

    if cli.stats {
        let stats = engine.stats(&cli.session).await;
        let overview = engine.describe(&cli.session).await;
        println!("{}", ConsoleFormatter::format_stats(&stats, &overview));
    }

    engine.flush().await;
    Ok(())
}

/// Install the tracing subscriber.
///
/// Logs go to stderr, or to `log_file` through a non-blocking writer whose
/// guard must stay alive until exit.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(Some(guard))
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        let label = if issue.is_error() {
            "error:".red().bold()
        } else {
            "warning:".yellow().bold()
        };
        eprintln!("{} {}", label, issue.message);
    }
}
