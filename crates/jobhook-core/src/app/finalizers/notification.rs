//! Notification finalizer - 通知ジョブの status 反映
//!
//! 通知ジョブ自体がイベント配送の手段なので、ここからイベントは発行しない。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::app::registry::StatusChangeHandler;
use crate::domain::{
    CallbackError, JobKind, NotificationJobId, NotificationJobPatch, Outcome, StatusUpdate,
    TaskKey,
};
use crate::ports::{Clock, NotificationJobStore};

pub struct NotificationFinalizer {
    jobs: Arc<dyn NotificationJobStore>,
    clock: Arc<dyn Clock>,
}

impl NotificationFinalizer {
    pub fn new(jobs: Arc<dyn NotificationJobStore>, clock: Arc<dyn Clock>) -> Self {
        Self { jobs, clock }
    }
}

#[async_trait]
impl StatusChangeHandler for NotificationFinalizer {
    async fn handle(&self, key: &TaskKey, update: &StatusUpdate) -> Result<Outcome, CallbackError> {
        let TaskKey::Id(task_id) = key else {
            return Err(CallbackError::UnsupportedKey {
                kind: JobKind::Notification,
                key: key.clone(),
            });
        };
        let id = NotificationJobId::new(task_id.value());
        debug!(job = %id, status = %update.status, "received notification job status update event");

        let patch = NotificationJobPatch {
            status: update.status,
            update_time: self.clock.now(),
        };
        self.jobs.update_fields(id, patch).await.map_err(|e| {
            error!(job = %id, status = %update.status, error = %e, "failed to update notification job status");
            CallbackError::store(id, e)
        })?;
        Ok(Outcome::applied())
    }
}
