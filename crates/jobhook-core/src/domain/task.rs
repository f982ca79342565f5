//! Task records as seen by the callback core.
//!
//! The store owns these records. The core reads them and sends partial,
//! precondition-guarded patches back; it never writes a whole record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ArtifactId, NotificationJobId, RobotId, TaskId, TrackId};
use super::status::TaskStatus;

/// Attribute key holding the ephemeral robot credential of a scan task.
pub const ROBOT_ID_ATTR: &str = "robot_id";

/// Attribute key holding the artifact a scan task targets.
pub const ARTIFACT_ID_ATTR: &str = "artifact_id";

/// Open-ended, kind-specific attributes attached to a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraAttrs(serde_json::Map<String, serde_json::Value>);

impl ExtraAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Read a positive integer reference.
    ///
    /// Attribute maps round-trip through JSON, so integers may come back as
    /// floats or strings; zero and negative values mean "no reference".
    pub fn positive_id(&self, key: &str) -> Option<i64> {
        let id = match self.0.get(key)? {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    // `as` は飽和するので範囲外の float は弾く
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                })?,
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
            _ => return None,
        };
        (id > 0).then_some(id)
    }

    pub fn robot_id(&self) -> Option<RobotId> {
        self.positive_id(ROBOT_ID_ATTR).map(RobotId::new)
    }

    pub fn artifact_id(&self) -> Option<ArtifactId> {
        self.positive_id(ARTIFACT_ID_ATTR).map(ArtifactId::new)
    }
}

/// A scan or retention task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<TrackId>,

    pub status: TaskStatus,

    /// Revision of the last applied status write.
    #[serde(default)]
    pub revision: i64,

    #[serde(default)]
    pub extra_attrs: ExtraAttrs,

    /// Retention progress (candidates seen).
    #[serde(default)]
    pub total: i64,

    /// Retention progress (candidates kept).
    #[serde(default)]
    pub retained: i64,
}

impl Task {
    pub fn new(id: TaskId, status: TaskStatus) -> Self {
        Self {
            id,
            track_id: None,
            status,
            revision: 0,
            extra_attrs: ExtraAttrs::new(),
            total: 0,
            retained: 0,
        }
    }

    pub fn with_track_id(mut self, track_id: TrackId) -> Self {
        self.track_id = Some(track_id);
        self
    }

    pub fn with_revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }

    pub fn with_attrs(mut self, attrs: ExtraAttrs) -> Self {
        self.extra_attrs = attrs;
        self
    }
}

/// Fields of a [`Task`] the core is allowed to write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub revision: Option<i64>,
    pub total: Option<i64>,
    pub retained: Option<i64>,
}

impl TaskPatch {
    /// Status write; the stored revision is kept when `revision` is `None`.
    pub fn status(status: TaskStatus, revision: Option<i64>) -> Self {
        Self {
            status: Some(status),
            revision,
            ..Self::default()
        }
    }

    pub fn progress(total: i64, retained: i64) -> Self {
        Self {
            total: Some(total),
            retained: Some(retained),
            ..Self::default()
        }
    }

    /// Apply the populated fields onto a record.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(revision) = self.revision {
            task.revision = revision;
        }
        if let Some(total) = self.total {
            task.total = total;
        }
        if let Some(retained) = self.retained {
            task.retained = retained;
        }
    }
}

/// A notification delivery job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub id: NotificationJobId,
    pub status: TaskStatus,
    pub update_time: DateTime<Utc>,
}

/// Fields written on a notification job by a status callback.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationJobPatch {
    pub status: TaskStatus,
    pub update_time: DateTime<Utc>,
}
