//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How each processed turn is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored digest for humans
    Text,
    /// The full turn outcome as JSON
    Json,
    /// The framed context block handed to a response generator
    Prompt,
}

/// CLI arguments for parley
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about = "Conversation memory and reference resolution for chat front-ends")]
#[command(long_about = r#"
Parley keeps a per-session memory of a conversation and tells you, for every
new message, what it most likely refers to.

Each user message is recorded, checked for follow-up signals, annotated with
the referents of its pronouns and compiled into a context digest.

Without TEXT, messages are read from stdin one per line. Lines starting with
"assistant:" are recorded as the reply to the previous message. Commands:
/clear, /reset, /insights, /stats, /quit.

Configuration files are loaded from (in priority order):
1. --config <path>       Explicit config file
2. ./parley.toml         Project-level config
3. ~/.config/parley/config.toml   Global config

Example:
  parley "Tell me about Python"
  parley --session demo --reply "Python is a language." "What's its history?"
  printf 'Tell me about Rust\nHow does it compare?\n' | parley -o json
"#)]
pub struct Cli {
    /// A single user message to process (reads stdin when absent)
    pub text: Option<String>,

    /// Session identifier
    #[arg(short, long, default_value = "default", value_name = "ID")]
    pub session: String,

    /// Assistant reply to record after TEXT
    #[arg(short, long, value_name = "TEXT", requires = "text")]
    pub reply: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print session insights when done
    #[arg(long)]
    pub insights: bool,

    /// Print session statistics when done
    #[arg(long)]
    pub stats: bool,

    /// Hard-clear the session before processing
    #[arg(long)]
    pub clear: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Whether this run only reports on an existing session.
    pub fn report_only(&self) -> bool {
        self.text.is_none() && (self.insights || self.stats)
    }
}
