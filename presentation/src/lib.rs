//! Presentation layer for parley
//!
//! This crate contains the CLI definition, console and JSON output
//! formatting, and the line-oriented turn loop.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::TurnRepl;
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
