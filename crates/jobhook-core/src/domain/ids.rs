//! Domain identifiers (strongly-typed IDs).
//!
//! 外部システム（task store, artifact service, robot account）が払い出す ID は
//! すべて i64 なので、Phantom type パターンで `Id<T>` に共通実装をまとめています。
//!
//! - `TaskId` / `ArtifactId` / `RobotId` / `NotificationJobId` は混同できない
//! - `TrackId` は engine が払い出す不透明な文字列 ID
//! - `EventId` はこのプロセスで採番する ULID（時刻でソート可能）

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
pub trait IdMarker: Send + Sync + 'static {
    /// Display で使うプレフィックス（例: "task-", "artifact-"）
    fn prefix() -> &'static str;
}

/// Numeric identifier issued by an external store.
#[repr(transparent)]
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: i64,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

// derive だと T: Clone/Copy を要求してしまうので手で実装する
impl<T: IdMarker> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: IdMarker> Copy for Id<T> {}

impl<T: IdMarker> Id<T> {
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl<T: IdMarker> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {}

impl IdMarker for Task {
    fn prefix() -> &'static str {
        "task-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Artifact {}

impl IdMarker for Artifact {
    fn prefix() -> &'static str {
        "artifact-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Robot {}

impl IdMarker for Robot {
    fn prefix() -> &'static str {
        "robot-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NotificationJob {}

impl IdMarker for NotificationJob {
    fn prefix() -> &'static str {
        "notification-job-"
    }
}

/// Identifier of a task record (scan / retention).
pub type TaskId = Id<Task>;

/// Identifier of an artifact referenced by a scan task.
pub type ArtifactId = Id<Artifact>;

/// Identifier of the ephemeral robot credential created for a scan.
pub type RobotId = Id<Robot>;

/// Identifier of a notification job record.
pub type NotificationJobId = Id<NotificationJob>;

/// Opaque job identifier assigned by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a callback addresses its task: by store ID or by the engine's track ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKey {
    Id(TaskId),
    Track(TrackId),
}

impl From<TaskId> for TaskKey {
    fn from(id: TaskId) -> Self {
        TaskKey::Id(id)
    }
}

impl From<TrackId> for TaskKey {
    fn from(id: TrackId) -> Self {
        TaskKey::Track(id)
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKey::Id(id) => id.fmt(f),
            TaskKey::Track(track) => write!(f, "track-{track}"),
        }
    }
}

/// Identifier of a published domain event (ULID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Ulid);

impl EventId {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(TaskId::new(7).to_string(), "task-7");
        assert_eq!(ArtifactId::new(42).to_string(), "artifact-42");
        assert_eq!(RobotId::new(3).to_string(), "robot-3");
        assert_eq!(NotificationJobId::new(1).to_string(), "notification-job-1");
        // let _: TaskId = ArtifactId::new(1); // <- does not compile
    }

    #[test]
    fn numeric_ids_serialize_as_plain_numbers() {
        let s = serde_json::to_string(&TaskId::new(12)).unwrap();
        assert_eq!(s, "12");
        let back: TaskId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, TaskId::new(12));
    }

    #[test]
    fn task_key_is_tagged_by_addressing_mode() {
        let key: TaskKey = serde_json::from_str(r#"{"track":"a1b2"}"#).unwrap();
        assert_eq!(key, TaskKey::Track(TrackId::new("a1b2")));
        assert_eq!(key.to_string(), "track-a1b2");

        let key: TaskKey = serde_json::from_str(r#"{"id":5}"#).unwrap();
        assert_eq!(key, TaskKey::Id(TaskId::new(5)));
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<TaskId>(), size_of::<i64>());
    }
}
