//! Use cases (application services)
//!
//! - [`context_engine`]: the per-operation inbound API
//! - [`process_turn`]: one atomic user turn from text to digest

pub mod context_engine;
pub mod process_turn;
