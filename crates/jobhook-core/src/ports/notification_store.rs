//! NotificationJobStore port - 通知ジョブの状態

use async_trait::async_trait;

use crate::domain::{NotificationJobId, NotificationJobPatch, StoreError};

#[async_trait]
pub trait NotificationJobStore: Send + Sync {
    /// Partial update of `status` and `update_time`.
    async fn update_fields(
        &self,
        id: NotificationJobId,
        patch: NotificationJobPatch,
    ) -> Result<(), StoreError>;
}
