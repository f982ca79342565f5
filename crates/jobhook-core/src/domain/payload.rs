//! Inbound status-change payload and its normalized form.

use serde::{Deserialize, Serialize};

use super::status::{JobStatus, TaskStatus};

/// Status change as delivered by the execution engine.
///
/// ```json
/// {"status": "Success", "check_in": "...", "metadata": {"revision": 3}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StatusChangeMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

impl StatusChange {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            check_in: None,
            metadata: None,
        }
    }

    pub fn with_check_in(mut self, check_in: impl Into<String>) -> Self {
        self.check_in = Some(check_in.into());
        self
    }

    pub fn with_revision(mut self, revision: i64) -> Self {
        self.metadata = Some(StatusChangeMetadata {
            revision: Some(revision),
        });
        self
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Classify against the known vocabulary; `None` for an unknown status.
    pub fn normalize(&self) -> Option<StatusUpdate> {
        let raw: JobStatus = self.status.parse().ok()?;
        let check_in = self
            .check_in
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Some(StatusUpdate {
            raw,
            status: raw.normalize(),
            check_in,
            revision: self.metadata.as_ref().and_then(|m| m.revision),
        })
    }
}

/// A status change whose status is known.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    /// Engine vocabulary (carried into events verbatim).
    pub raw: JobStatus,
    /// Internal vocabulary (persisted).
    pub status: TaskStatus,
    /// Non-empty check-in content, if any.
    pub check_in: Option<String>,
    /// `None` when the engine sent no revision.
    pub revision: Option<i64>,
}

impl StatusUpdate {
    pub fn is_terminal(&self) -> bool {
        self.raw.is_terminal()
    }
}
