//! Scan finalizer - scan ジョブの check-in と終端処理
//!
//! 終端時の後始末（robot account 削除、artifact 取得、イベント発行）はすべて
//! 任意の副作用。engine 側の状態更新はこの処理の前に適用済みなので、
//! ここでの失敗で状態遷移を巻き戻すことはない。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::app::emitter::EventEmitter;
use crate::app::registry::{CheckInProcessor, StatusChangePostFunc};
use crate::domain::{
    Advisory, AdvisoryKind, CallbackError, CheckInReport, DecodeTarget, EventMetadata, JobStatus,
    Outcome, ScannedArtifact, TaskKey,
};
use crate::ports::{ArtifactService, CredentialService, ScanController, TaskStore};

pub struct ScanFinalizer {
    tasks: Arc<dyn TaskStore>,
    credentials: Arc<dyn CredentialService>,
    artifacts: Arc<dyn ArtifactService>,
    scans: Arc<dyn ScanController>,
    emitter: Arc<EventEmitter>,
}

impl ScanFinalizer {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        credentials: Arc<dyn CredentialService>,
        artifacts: Arc<dyn ArtifactService>,
        scans: Arc<dyn ScanController>,
        emitter: Arc<EventEmitter>,
    ) -> Self {
        Self {
            tasks,
            credentials,
            artifacts,
            scans,
            emitter,
        }
    }
}

#[async_trait]
impl CheckInProcessor for ScanFinalizer {
    async fn process(&self, key: &TaskKey, check_in: &str) -> Result<Outcome, CallbackError> {
        let report = CheckInReport::from_json(check_in).map_err(|e| {
            error!(task = %key, error = %e, "failed to convert data to report");
            CallbackError::decode(DecodeTarget::ScanReport, e)
        })?;

        self.scans
            .update_report(report)
            .await
            .map_err(CallbackError::Controller)?;
        Ok(Outcome::applied())
    }
}

#[async_trait]
impl StatusChangePostFunc for ScanFinalizer {
    async fn post(&self, key: &TaskKey, status: JobStatus) -> Result<Outcome, CallbackError> {
        if !status.is_terminal() {
            return Ok(Outcome::applied());
        }

        let task = self
            .tasks
            .get(key)
            .await
            .map_err(|source| CallbackError::Fetch {
                key: key.clone(),
                source,
            })?;
        let mut outcome = Outcome::applied();

        if status == JobStatus::Success
            && let Some(robot_id) = task.extra_attrs.robot_id()
        {
            match self.credentials.delete(robot_id).await {
                Ok(()) => {
                    debug!(task = %key, robot_id = %robot_id, "robot account for the scan task is removed");
                }
                Err(e) => {
                    error!(task = %key, robot_id = %robot_id, error = %e, "delete robot account failed");
                    outcome = outcome.with_advisory(Advisory::new(
                        AdvisoryKind::CredentialCleanup,
                        format!("{robot_id}: {e}"),
                    ));
                }
            }
        }

        let Some(artifact_id) = task.extra_attrs.artifact_id() else {
            return Ok(outcome);
        };
        let artifact = match self.artifacts.get(artifact_id, None).await {
            Ok(artifact) => artifact,
            Err(e) => {
                error!(task = %key, artifact_id = %artifact_id, error = %e, "failed to get artifact");
                return Ok(outcome.with_advisory(Advisory::new(
                    AdvisoryKind::ArtifactLookup,
                    format!("{artifact_id}: {e}"),
                )));
            }
        };

        let published = self
            .emitter
            .emit(EventMetadata::ScanImage {
                artifact: ScannedArtifact {
                    namespace_id: artifact.project_id,
                    repository: artifact.repository_name,
                    digest: artifact.digest,
                    mime_type: artifact.manifest_media_type,
                },
                status: status.as_str().to_string(),
            })
            .await;
        Ok(outcome.merge(published))
    }
}
