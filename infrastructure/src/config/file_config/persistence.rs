//! Session persistence configuration from TOML (`[persistence]` section)

use parley_domain::config::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where session snapshots are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceBackend {
    /// Process-local map; snapshots survive engine restarts within a process.
    Memory,
    /// One JSON file per session under a directory.
    File,
    /// No persistence at all.
    None,
}

impl PersistenceBackend {
    pub const VALID_VALUES: [&'static str; 3] = ["memory", "file", "none"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceBackend::Memory => "memory",
            PersistenceBackend::File => "file",
            PersistenceBackend::None => "none",
        }
    }
}

/// Persistence configuration from TOML.
///
/// # Example
///
/// ```toml
/// [persistence]
/// backend = "file"
/// directory = "~/.local/share/parley/sessions"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePersistenceConfig {
    /// Backend name: "memory", "file" or "none"
    pub backend: String,
    /// Snapshot directory for the file backend
    pub directory: Option<PathBuf>,
}

impl Default for FilePersistenceConfig {
    fn default() -> Self {
        Self {
            backend: PersistenceBackend::Memory.as_str().to_string(),
            directory: None,
        }
    }
}

impl FilePersistenceConfig {
    /// Parse the backend name. Unknown names fall back to `memory`.
    pub fn parse_backend(&self) -> (PersistenceBackend, Vec<ConfigIssue>) {
        match self.backend.trim().to_lowercase().as_str() {
            "memory" => (PersistenceBackend::Memory, vec![]),
            "file" => (PersistenceBackend::File, vec![]),
            "none" | "off" => (PersistenceBackend::None, vec![]),
            _ => (
                PersistenceBackend::Memory,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "persistence.backend".to_string(),
                        value: self.backend.clone(),
                        valid_values: PersistenceBackend::VALID_VALUES
                            .iter()
                            .map(|v| v.to_string())
                            .collect(),
                    },
                    format!(
                        "persistence.backend: unknown value '{}', falling back to 'memory'",
                        self.backend
                    ),
                )],
            ),
        }
    }

    /// Directory for the file backend.
    ///
    /// Uses `directory` when set, otherwise `<data dir>/parley/sessions`.
    /// Returns `None` when neither is available.
    pub fn resolve_directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("parley").join("sessions")))
    }

    /// Validate the section as a whole.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let (backend, mut issues) = self.parse_backend();
        if backend == PersistenceBackend::File && self.resolve_directory().is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "persistence.directory".to_string(),
                },
                "persistence.directory: required for the file backend (no data directory found)",
            ));
        }
        issues
    }
}
