//! InMemoryNotificationJobStore

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{NotificationJob, NotificationJobId, NotificationJobPatch, StoreError, TaskStatus};
use crate::ports::NotificationJobStore;

#[derive(Default)]
pub struct InMemoryNotificationJobStore {
    jobs: Mutex<HashMap<NotificationJobId, NotificationJob>>,
}

impl InMemoryNotificationJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: NotificationJobId, status: TaskStatus, update_time: DateTime<Utc>) {
        self.jobs.lock().await.insert(
            id,
            NotificationJob {
                id,
                status,
                update_time,
            },
        );
    }

    pub async fn snapshot(&self, id: NotificationJobId) -> Option<NotificationJob> {
        self.jobs.lock().await.get(&id).cloned()
    }

    pub async fn all(&self) -> Vec<NotificationJob> {
        let jobs = self.jobs.lock().await;
        let mut all: Vec<_> = jobs.values().cloned().collect();
        all.sort_by_key(|j| j.id);
        all
    }
}

#[async_trait]
impl NotificationJobStore for InMemoryNotificationJobStore {
    async fn update_fields(
        &self,
        id: NotificationJobId,
        patch: NotificationJobPatch,
    ) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        job.status = patch.status;
        job.update_time = patch.update_time;
        Ok(())
    }
}
