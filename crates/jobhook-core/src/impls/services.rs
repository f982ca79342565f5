//! 外部サービスの記録用実装
//!
//! - **RecordingCredentialService**: 削除要求を記録
//! - **InMemoryArtifactService**: 登録済み artifact を返し、参照を記録
//! - **RecordingScanController**: 受け取ったレポートと scan-all 要求を記録
//! - **RecordingEventBus**: 発行されたイベントを記録
//!
//! いずれも `fail_with` で以降の呼び出しを失敗させられる。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ArtifactId, CheckInReport, Event, RobotId, ServiceError};
use crate::ports::{
    Artifact, ArtifactOption, ArtifactService, CredentialService, EventBus, ScanController,
    Trigger,
};

#[derive(Default)]
struct CredentialState {
    attempts: Vec<RobotId>,
    deleted: Vec<RobotId>,
    failure: Option<String>,
}

#[derive(Default)]
pub struct RecordingCredentialService {
    state: Mutex<CredentialState>,
}

impl RecordingCredentialService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().await.failure = Some(message.into());
    }

    /// Every delete request, successful or not.
    pub async fn attempts(&self) -> Vec<RobotId> {
        self.state.lock().await.attempts.clone()
    }

    pub async fn deleted(&self) -> Vec<RobotId> {
        self.state.lock().await.deleted.clone()
    }
}

#[async_trait]
impl CredentialService for RecordingCredentialService {
    async fn delete(&self, id: RobotId) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        state.attempts.push(id);
        if let Some(message) = &state.failure {
            return Err(ServiceError::Failed(message.clone()));
        }
        state.deleted.push(id);
        Ok(())
    }
}

#[derive(Default)]
struct ArtifactState {
    artifacts: HashMap<ArtifactId, Artifact>,
    lookups: Vec<ArtifactId>,
}

#[derive(Default)]
pub struct InMemoryArtifactService {
    state: Mutex<ArtifactState>,
}

impl InMemoryArtifactService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, artifact: Artifact) {
        self.state.lock().await.artifacts.insert(artifact.id, artifact);
    }

    pub async fn lookups(&self) -> Vec<ArtifactId> {
        self.state.lock().await.lookups.clone()
    }
}

#[async_trait]
impl ArtifactService for InMemoryArtifactService {
    async fn get(
        &self,
        id: ArtifactId,
        _option: Option<ArtifactOption>,
    ) -> Result<Artifact, ServiceError> {
        let mut state = self.state.lock().await;
        state.lookups.push(id);
        state
            .artifacts
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
struct ScanState {
    reports: Vec<CheckInReport>,
    scan_all_calls: Vec<(Trigger, bool)>,
    failure: Option<String>,
}

#[derive(Default)]
pub struct RecordingScanController {
    state: Mutex<ScanState>,
}

impl RecordingScanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().await.failure = Some(message.into());
    }

    pub async fn reports(&self) -> Vec<CheckInReport> {
        self.state.lock().await.reports.clone()
    }

    pub async fn scan_all_calls(&self) -> Vec<(Trigger, bool)> {
        self.state.lock().await.scan_all_calls.clone()
    }
}

#[async_trait]
impl ScanController for RecordingScanController {
    async fn update_report(&self, report: CheckInReport) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        if let Some(message) = &state.failure {
            return Err(ServiceError::Failed(message.clone()));
        }
        state.reports.push(report);
        Ok(())
    }

    /// Returns the execution number, counting from 1.
    async fn scan_all(&self, trigger: Trigger, full_rescan: bool) -> Result<i64, ServiceError> {
        let mut state = self.state.lock().await;
        if let Some(message) = &state.failure {
            return Err(ServiceError::Failed(message.clone()));
        }
        state.scan_all_calls.push((trigger, full_rescan));
        Ok(state.scan_all_calls.len() as i64)
    }
}

#[derive(Default)]
struct BusState {
    published: Vec<Event>,
    failure: Option<String>,
}

#[derive(Default)]
pub struct RecordingEventBus {
    state: Mutex<BusState>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().await.failure = Some(message.into());
    }

    pub async fn published(&self) -> Vec<Event> {
        self.state.lock().await.published.clone()
    }
}

#[async_trait]
impl EventBus for RecordingEventBus {
    async fn publish(&self, event: &Event) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        if let Some(message) = &state.failure {
            return Err(ServiceError::Failed(message.clone()));
        }
        state.published.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_deletes_are_attempted_but_not_recorded() {
        let credentials = RecordingCredentialService::new();
        credentials.delete(RobotId::new(1)).await.unwrap();
        credentials.fail_with("down").await;

        let err = credentials.delete(RobotId::new(2)).await.unwrap_err();

        assert_eq!(err, ServiceError::Failed("down".to_string()));
        assert_eq!(credentials.attempts().await, vec![RobotId::new(1), RobotId::new(2)]);
        assert_eq!(credentials.deleted().await, vec![RobotId::new(1)]);
    }

    #[tokio::test]
    async fn unknown_artifact_is_not_found() {
        let artifacts = InMemoryArtifactService::new();
        let err = artifacts.get(ArtifactId::new(9), None).await.unwrap_err();
        assert_eq!(err, ServiceError::NotFound("artifact-9".to_string()));
        assert_eq!(artifacts.lookups().await, vec![ArtifactId::new(9)]);
    }

    #[tokio::test]
    async fn scan_all_numbers_executions() {
        let scans = RecordingScanController::new();
        assert_eq!(scans.scan_all(Trigger::Manual, false).await, Ok(1));
        assert_eq!(scans.scan_all(Trigger::Schedule, true).await, Ok(2));
    }
}
