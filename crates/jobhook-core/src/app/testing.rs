//! テスト用の共通フィクスチャ

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::app::builder::{AppBuilder, Collaborators};
use crate::app::dispatcher::CallbackDispatcher;
use crate::app::emitter::EventEmitter;
use crate::app::finalizers::{NotificationFinalizer, RetentionFinalizer, ScanFinalizer};
use crate::config::{CallbackConfig, DEFAULT_RETENTION_EVENT_STATUS};
use crate::domain::{ArtifactId, JobKind, RevisionPolicy};
use crate::impls::{
    InMemoryArtifactService, InMemoryNotificationJobStore, InMemoryTaskStore,
    RecordingCredentialService, RecordingEventBus, RecordingScanController,
};
use crate::ports::{Artifact, FixedClock, UlidGenerator};

pub(crate) struct Fixture {
    pub tasks: Arc<InMemoryTaskStore>,
    pub notification_jobs: Arc<InMemoryNotificationJobStore>,
    pub credentials: Arc<RecordingCredentialService>,
    pub artifacts: Arc<InMemoryArtifactService>,
    pub scans: Arc<RecordingScanController>,
    pub bus: Arc<RecordingEventBus>,
    pub clock: FixedClock,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskStore::new()),
            notification_jobs: Arc::new(InMemoryNotificationJobStore::new()),
            credentials: Arc::new(RecordingCredentialService::new()),
            artifacts: Arc::new(InMemoryArtifactService::new()),
            scans: Arc::new(RecordingScanController::new()),
            bus: Arc::new(RecordingEventBus::new()),
            clock: FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
        }
    }

    /// A time strictly before `clock.now()`.
    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    pub fn artifact(id: i64, digest: &str) -> Artifact {
        Artifact {
            id: ArtifactId::new(id),
            project_id: 1,
            repository_name: "library/nginx".to_string(),
            digest: digest.to_string(),
            manifest_media_type: "application/vnd.oci.image.manifest.v1+json".to_string(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            tasks: self.tasks.clone(),
            notification_jobs: self.notification_jobs.clone(),
            credentials: self.credentials.clone(),
            artifacts: self.artifacts.clone(),
            scans: self.scans.clone(),
            bus: self.bus.clone(),
            ids: Arc::new(UlidGenerator::new(self.clock)),
            clock: Arc::new(self.clock),
        }
    }

    pub fn emitter(&self) -> Arc<EventEmitter> {
        Arc::new(EventEmitter::new(
            self.bus.clone(),
            Arc::new(UlidGenerator::new(self.clock)),
            Arc::new(self.clock),
        ))
    }

    pub fn scan_finalizer(&self) -> ScanFinalizer {
        ScanFinalizer::new(
            self.tasks.clone(),
            self.credentials.clone(),
            self.artifacts.clone(),
            self.scans.clone(),
            self.emitter(),
        )
    }

    pub fn retention_finalizer(&self, policy: RevisionPolicy) -> RetentionFinalizer {
        RetentionFinalizer::new(
            self.tasks.clone(),
            self.emitter(),
            policy,
            DEFAULT_RETENTION_EVENT_STATUS,
        )
    }

    pub fn notification_finalizer(&self) -> NotificationFinalizer {
        NotificationFinalizer::new(self.notification_jobs.clone(), Arc::new(self.clock))
    }

    /// Dispatcher over every built-in finalizer.
    pub fn dispatcher(&self, policy: RevisionPolicy) -> CallbackDispatcher {
        let config = CallbackConfig {
            revision_policy: policy,
            ..CallbackConfig::default()
        };
        let app = AppBuilder::new(self.collaborators(), config)
            .with_defaults()
            .and_then(|b| b.expect_kinds(&JobKind::ALL).build())
            .unwrap();
        app.dispatcher().clone()
    }
}
