//! Runtime configuration of the callback core.
//!
//! All fields have defaults, so an empty JSON object is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RevisionPolicy;

/// Status marker stamped on retention events.
pub const DEFAULT_RETENTION_EVENT_STATUS: &str = "SUCCESS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CallbackConfig {
    /// Precondition applied to revision-guarded status writes.
    pub revision_policy: RevisionPolicy,

    pub retention_event_status: String,

    /// Passed to the scan controller by the `scanAll` schedule.
    pub scan_all_full_rescan: bool,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            revision_policy: RevisionPolicy::default(),
            retention_event_status: DEFAULT_RETENTION_EVENT_STATUS.to_string(),
            scan_all_full_rescan: true,
        }
    }
}

impl CallbackConfig {
    pub fn from_json_str(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(path, &raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention_event_status.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "retention_event_status must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
