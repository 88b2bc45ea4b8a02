//! Configuration issue reporting.
//!
//! Configuration loaders never abort on a bad value: they fall back to a
//! default and report a [`ConfigIssue`] describing what was ignored.
//!
//! # Examples
//!
//! ```
//! use parley_domain::config::{ConfigIssue, ConfigIssueCode, Severity};
//!
//! let issue = ConfigIssue::warning(
//!     ConfigIssueCode::InvalidConstraint { field: "memory".to_string() },
//!     "memory: max_turns must be >= 1",
//! );
//! assert_eq!(issue.severity, Severity::Warning);
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default was substituted.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A numeric value violates a constraint (e.g. a zero window size).
    InvalidConstraint { field: String },
    /// A string value is not one of the accepted choices.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A value required by another setting is missing.
    MissingValue { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
