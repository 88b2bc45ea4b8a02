//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Classification and resolution never fail; these only cover the
/// snapshot boundary and policy construction.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid memory policy: {0}")]
    InvalidPolicy(String),

    #[error("Failed to encode session snapshot: {0}")]
    SnapshotEncode(String),

    #[error("Failed to decode session snapshot: {0}")]
    SnapshotDecode(String),
}

impl DomainError {
    /// Check if this error came from the snapshot boundary
    pub fn is_snapshot_error(&self) -> bool {
        matches!(
            self,
            DomainError::SnapshotEncode(_) | DomainError::SnapshotDecode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_policy_display() {
        let error = DomainError::InvalidPolicy("max_turns must be >= 1".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid memory policy: max_turns must be >= 1"
        );
    }

    #[test]
    fn test_is_snapshot_error_check() {
        assert!(DomainError::SnapshotDecode("eof".to_string()).is_snapshot_error());
        assert!(DomainError::SnapshotEncode("map key".to_string()).is_snapshot_error());
        assert!(!DomainError::InvalidPolicy("x".to_string()).is_snapshot_error());
    }
}
