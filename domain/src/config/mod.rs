//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod memory_policy;
mod validation;

pub use memory_policy::MemoryPolicy;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
