//! Retention finalizer - tag retention タスク
//!
//! # 2 つのモード（check-in の有無で排他）
//! - check-in: `{total, retained}` を部分更新してから retention イベントを発行
//! - status: revision 条件付きで status を更新（条件不一致は no-op）

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::app::emitter::EventEmitter;
use crate::app::registry::{CheckInProcessor, StatusChangeHandler};
use crate::domain::{
    CallbackError, DecodeTarget, EventMetadata, JobKind, Outcome, RetainObject, RevisionGuard,
    RevisionPolicy, StatusUpdate, TaskKey, TaskPatch, WriteResult,
};
use crate::ports::TaskStore;

pub struct RetentionFinalizer {
    tasks: Arc<dyn TaskStore>,
    emitter: Arc<EventEmitter>,
    policy: RevisionPolicy,
    /// Status marker stamped on every retention event.
    event_status: String,
}

impl RetentionFinalizer {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        emitter: Arc<EventEmitter>,
        policy: RevisionPolicy,
        event_status: impl Into<String>,
    ) -> Self {
        Self {
            tasks,
            emitter,
            policy,
            event_status: event_status.into(),
        }
    }
}

#[async_trait]
impl CheckInProcessor for RetentionFinalizer {
    async fn process(&self, key: &TaskKey, check_in: &str) -> Result<Outcome, CallbackError> {
        let TaskKey::Id(task_id) = key else {
            return Err(CallbackError::UnsupportedKey {
                kind: JobKind::Retention,
                key: key.clone(),
            });
        };

        let retain = RetainObject::from_json(check_in).map_err(|e| {
            error!(task = %key, error = %e, "failed to resolve check-in of retention task");
            CallbackError::decode(DecodeTarget::RetainObject, e)
        })?;

        self.tasks
            .update_fields(key, TaskPatch::progress(retain.total, retain.retained), None)
            .await
            .map_err(|e| {
                error!(task = %key, error = %e, "failed to update retention task");
                CallbackError::store(key, e)
            })?;

        // イベントはタスク自身の status ではなく「sweep の 1 ステップ完了」を表す
        let published = self
            .emitter
            .emit(EventMetadata::Retention {
                task_id: *task_id,
                total: retain.total,
                retained: retain.retained,
                deleted: retain.deleted,
                status: self.event_status.clone(),
            })
            .await;
        Ok(Outcome::applied().merge(published))
    }
}

#[async_trait]
impl StatusChangeHandler for RetentionFinalizer {
    async fn handle(&self, key: &TaskKey, update: &StatusUpdate) -> Result<Outcome, CallbackError> {
        debug!(task = %key, status = %update.raw, revision = ?update.revision, "received retention task status update event");

        let guard = RevisionGuard::new(update.revision, update.status, self.policy);
        let written = self
            .tasks
            .update_fields(
                key,
                TaskPatch::status(update.status, update.revision),
                Some(guard),
            )
            .await
            .map_err(|e| {
                error!(task = %key, error = %e, "failed to update the status of retention task");
                CallbackError::store(key, e)
            })?;

        match written {
            WriteResult::Applied => Ok(Outcome::applied()),
            WriteResult::Rejected => {
                debug!(task = %key, revision = ?update.revision, "stale retention status update dropped");
                Ok(Outcome::stale())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::Fixture;
    use crate::domain::{Disposition, JobStatus, StatusChange, Task, TaskId, TaskStatus, Topic};

    fn key() -> TaskKey {
        TaskKey::Id(TaskId::new(5))
    }

    fn update(status: &str, revision: i64) -> StatusUpdate {
        StatusChange::new(status)
            .with_revision(revision)
            .normalize()
            .unwrap()
    }

    const CHECK_IN: &str = r#"{
        "total": 10,
        "retained": 7,
        "deleted": [
            {"target": {"repository": "a"}},
            {"target": {"repository": "b"}},
            {"target": {"repository": "c"}}
        ]
    }"#;

    #[tokio::test]
    async fn check_in_updates_counters_and_publishes_one_event() {
        let fx = Fixture::new();
        fx.tasks
            .insert(Task::new(TaskId::new(5), TaskStatus::Error).with_revision(2))
            .await;

        let outcome = fx
            .retention_finalizer(RevisionPolicy::StrictlyNewer)
            .process(&key(), CHECK_IN)
            .await
            .unwrap();

        assert_eq!(outcome.events_published, 1);
        let task = fx.tasks.snapshot(&key()).await.unwrap();
        assert_eq!((task.total, task.retained), (10, 7));
        // status / revision には触れない
        assert_eq!(task.status, TaskStatus::Error);
        assert_eq!(task.revision, 2);

        let events = fx.bus.published().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].topic, Topic::TagRetention);
        match &events[0].data {
            EventMetadata::Retention {
                task_id,
                total,
                retained,
                deleted,
                status,
            } => {
                assert_eq!(*task_id, TaskId::new(5));
                assert_eq!((*total, *retained), (10, 7));
                let repos: Vec<_> = deleted.iter().map(|d| d.target.repository.as_str()).collect();
                assert_eq!(repos, vec!["a", "b", "c"]);
                assert_eq!(status, "SUCCESS");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_in_decode_failure_changes_nothing() {
        let fx = Fixture::new();
        fx.tasks.insert(Task::new(TaskId::new(5), TaskStatus::Running)).await;

        let err = fx
            .retention_finalizer(RevisionPolicy::StrictlyNewer)
            .process(&key(), r#"{"total": "ten"}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, CallbackError::Decode { .. }));
        let task = fx.tasks.snapshot(&key()).await.unwrap();
        assert_eq!((task.total, task.retained), (0, 0));
        assert!(fx.bus.published().await.is_empty());
    }

    #[tokio::test]
    async fn check_in_store_failure_is_mandatory() {
        let fx = Fixture::new();
        fx.tasks.insert(Task::new(TaskId::new(5), TaskStatus::Running)).await;
        fx.tasks.fail_writes_with("disk full").await;

        let err = fx
            .retention_finalizer(RevisionPolicy::StrictlyNewer)
            .process(&key(), CHECK_IN)
            .await
            .unwrap_err();

        assert!(matches!(err, CallbackError::Store { .. }));
        assert!(fx.bus.published().await.is_empty());
    }

    #[tokio::test]
    async fn check_in_survives_publish_failure() {
        let fx = Fixture::new();
        fx.tasks.insert(Task::new(TaskId::new(5), TaskStatus::Running)).await;
        fx.bus.fail_with("bus closed").await;

        let outcome = fx
            .retention_finalizer(RevisionPolicy::StrictlyNewer)
            .process(&key(), CHECK_IN)
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::Applied);
        assert_eq!(outcome.advisories.len(), 1);
        assert_eq!(fx.tasks.snapshot(&key()).await.unwrap().total, 10);
    }

    #[tokio::test]
    async fn newer_revision_replaces_status() {
        let fx = Fixture::new();
        fx.tasks
            .insert(Task::new(TaskId::new(5), TaskStatus::Running).with_revision(1))
            .await;

        let outcome = fx
            .retention_finalizer(RevisionPolicy::StrictlyNewer)
            .handle(&key(), &update("Success", 2))
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::Applied);
        let task = fx.tasks.snapshot(&key()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Finished);
        assert_eq!(task.revision, 2);
    }

    #[tokio::test]
    async fn stale_revision_is_a_no_op() {
        let fx = Fixture::new();
        fx.tasks
            .insert(Task::new(TaskId::new(5), TaskStatus::Finished).with_revision(3))
            .await;

        for revision in [1, 3] {
            let outcome = fx
                .retention_finalizer(RevisionPolicy::StrictlyNewer)
                .handle(&key(), &update("Running", revision))
                .await
                .unwrap();
            assert_eq!(outcome.disposition, Disposition::Stale);
        }

        let task = fx.tasks.snapshot(&key()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Finished);
        assert_eq!(task.revision, 3);
    }

    #[tokio::test]
    async fn advancing_policy_accepts_progress_within_a_revision() {
        let fx = Fixture::new();
        fx.tasks
            .insert(Task::new(TaskId::new(5), TaskStatus::Running).with_revision(3))
            .await;

        let outcome = fx
            .retention_finalizer(RevisionPolicy::NewerOrAdvancing)
            .handle(&key(), &update(JobStatus::Success.as_str(), 3))
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::Applied);
        assert_eq!(
            fx.tasks.snapshot(&key()).await.unwrap().status,
            TaskStatus::Finished
        );
    }

    #[tokio::test]
    async fn status_without_revision_advances_fresh_task() {
        let fx = Fixture::new();
        fx.tasks.insert(Task::new(TaskId::new(5), TaskStatus::Pending)).await;
        let finalizer = fx.retention_finalizer(RevisionPolicy::StrictlyNewer);

        let running = finalizer
            .handle(&key(), &StatusChange::new("Running").normalize().unwrap())
            .await
            .unwrap();
        let regressed = finalizer
            .handle(&key(), &StatusChange::new("Pending").normalize().unwrap())
            .await
            .unwrap();

        assert_eq!(running.disposition, Disposition::Applied);
        assert_eq!(regressed.disposition, Disposition::Stale);
        let task = fx.tasks.snapshot(&key()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Running);
        assert_eq!(task.revision, 0);
    }

    #[tokio::test]
    async fn status_store_failure_is_mandatory() {
        let fx = Fixture::new();
        let err = fx
            .retention_finalizer(RevisionPolicy::StrictlyNewer)
            .handle(&key(), &update("Success", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CallbackError::Store { .. }));
    }
}
