//! Line-oriented turn loop over stdin

pub mod repl;

pub use repl::{ReplCommand, ReplInput, TurnRepl};
