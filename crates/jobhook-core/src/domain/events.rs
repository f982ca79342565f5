//! Events - finalizer から発行されるドメインイベント
//!
//! `EventMetadata` は finalizer が組み立てる入力、`Event` は topic と ID が
//! 付与された発行可能な形。変換は `EventEmitter::build` が行う。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EventId, TaskId};
use super::report::DeletionResult;
use super::status::JobStatus;

/// Artifact coordinates carried by a scan event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedArtifact {
    pub namespace_id: i64,
    pub repository: String,
    pub digest: String,
    pub mime_type: String,
}

/// What a finalizer wants to announce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventMetadata {
    ScanImage {
        artifact: ScannedArtifact,
        /// Engine status string, verbatim.
        status: String,
    },
    Retention {
        task_id: TaskId,
        total: i64,
        retained: i64,
        deleted: Vec<DeletionResult>,
        status: String,
    },
}

/// Event topics understood by downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    ScanningCompleted,
    ScanningFailed,
    ScanningStopped,
    TagRetention,
}

impl EventMetadata {
    /// Resolve the topic this metadata is published under.
    ///
    /// Scan events only exist for terminal statuses; anything else yields `None`.
    pub fn topic(&self) -> Option<Topic> {
        match self {
            EventMetadata::ScanImage { status, .. } => match status.parse::<JobStatus>().ok()? {
                JobStatus::Success => Some(Topic::ScanningCompleted),
                JobStatus::Error => Some(Topic::ScanningFailed),
                JobStatus::Stopped => Some(Topic::ScanningStopped),
                _ => None,
            },
            EventMetadata::Retention { .. } => Some(Topic::TagRetention),
        }
    }
}

/// A fully built event, ready for the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub topic: Topic,
    pub occurred_at: DateTime<Utc>,
    pub data: EventMetadata,
}
