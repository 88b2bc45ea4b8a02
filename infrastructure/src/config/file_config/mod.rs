//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain types on demand.

mod logging;
mod memory;
mod persistence;

pub use logging::FileLoggingConfig;
pub use memory::FileMemoryConfig;
pub use persistence::{FilePersistenceConfig, PersistenceBackend};

use parley_domain::config::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Session memory limits
    pub memory: FileMemoryConfig,
    /// Session snapshot storage
    pub persistence: FilePersistenceConfig,
    /// Event and diagnostic log files
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Memory policy constraints
    /// 2. The persistence backend name and its directory
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.memory.to_memory_policy().1);
        issues.extend(self.persistence.validate());
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[memory]
max_turns = 30
context_window = 8

[persistence]
backend = "none"

[logging]
conversation_log = "/tmp/parley/events.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.memory.max_turns, 30);
        assert_eq!(config.memory.context_window, 8);
        assert_eq!(config.persistence.parse_backend().0, PersistenceBackend::None);
        assert!(config.logging.conversation_log.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_sections() {
        let toml_str = r#"
[memory]
max_turns = 0

[persistence]
backend = "cloud"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        // max_turns < 1 plus the unknown backend
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| !i.is_error()));
    }
}
