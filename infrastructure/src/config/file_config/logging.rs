//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logging configuration from TOML.
///
/// ```toml
/// [logging]
/// conversation_log = "~/.local/state/parley/events.jsonl"
/// log_file = "/tmp/parley.log"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving turn events; disabled when unset
    pub conversation_log: Option<PathBuf>,
    /// File receiving diagnostic logs instead of stderr
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults_disabled() {
        let config = FileLoggingConfig::default();
        assert!(config.conversation_log.is_none());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_logging_config_deserialize() {
        let toml_str = r#"
[logging]
conversation_log = "events.jsonl"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.logging.conversation_log,
            Some(PathBuf::from("events.jsonl"))
        );
        assert!(config.logging.log_file.is_none());
    }
}
