//! Session aggregate.
//!
//! - [`entities::Session`]: log, subject state and style of one conversation
//! - [`insights::SessionInsights`]: where the conversation stands

pub mod entities;
pub mod insights;

pub use entities::{STORAGE_KEY_PREFIX, Session, storage_key};
pub use insights::SessionInsights;
