//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] — domain-level errors
//! - [`string`] — UTF-8 safe helpers used by the lexical heuristics

pub mod error;
pub mod string;
