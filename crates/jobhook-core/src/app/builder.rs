//! AppBuilder - コールバックコアの構築とワイヤリング
//!
//! # 起動時検証（Fail-fast）
//! - 登録の重複は即座に `BuildError::Registry`
//! - `expect_kinds()` で期待される job kind を設定し、`build()` 時に未登録があればエラー
//! - scheduler が設定されていれば `scanAll` コールバックを登録（失敗は致命的）
//!
//! # 使用例
//! ```ignore
//! let app = AppBuilder::new(collaborators, CallbackConfig::default())
//!     .with_defaults()?
//!     .expect_kinds(&JobKind::ALL)
//!     .with_scheduler(scheduler)
//!     .build()?;
//! app.dispatcher().handle(JobKind::ImageScan, key, body).await?;
//! ```

use std::sync::Arc;

use tracing::info;

use crate::app::dispatcher::CallbackDispatcher;
use crate::app::emitter::EventEmitter;
use crate::app::finalizers::{NotificationFinalizer, RetentionFinalizer, ScanFinalizer};
use crate::app::registry::{
    CallbackRegistry, CheckInProcessor, RegistryBuilder, RegistryError, StatusChangeHandler,
    StatusChangePostFunc,
};
use crate::app::scan_all::{SCAN_ALL_CALLBACK, ScanAllCallback};
use crate::config::{CallbackConfig, ConfigError};
use crate::domain::JobKind;
use crate::ports::{
    ArtifactService, Clock, CredentialService, EventBus, IdGenerator, NotificationJobStore,
    ScanController, Scheduler, SchedulerError, TaskStore,
};

/// External systems the core talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub tasks: Arc<dyn TaskStore>,
    pub notification_jobs: Arc<dyn NotificationJobStore>,
    pub credentials: Arc<dyn CredentialService>,
    pub artifacts: Arc<dyn ArtifactService>,
    pub scans: Arc<dyn ScanController>,
    pub bus: Arc<dyn EventBus>,
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to register schedule callback: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub struct AppBuilder {
    collab: Collaborators,
    config: CallbackConfig,
    emitter: Arc<EventEmitter>,
    registry: RegistryBuilder,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl AppBuilder {
    pub fn new(collab: Collaborators, config: CallbackConfig) -> Self {
        let emitter = Arc::new(EventEmitter::new(
            collab.bus.clone(),
            collab.ids.clone(),
            collab.clock.clone(),
        ));
        Self {
            collab,
            config,
            emitter,
            registry: RegistryBuilder::new(),
            scheduler: None,
        }
    }

    /// `IMAGE_SCAN`（check-in + post func）と `IMAGE_SCAN_ALL`（check-in のみ）
    pub fn with_scan(self) -> Result<Self, BuildError> {
        let scan = Arc::new(ScanFinalizer::new(
            self.collab.tasks.clone(),
            self.collab.credentials.clone(),
            self.collab.artifacts.clone(),
            self.collab.scans.clone(),
            self.emitter.clone(),
        ));
        self.register_check_in_processor(JobKind::ImageScan, scan.clone())?
            .register_status_change_post_func(JobKind::ImageScan, scan.clone())?
            .register_check_in_processor(JobKind::ImageScanAll, scan)
    }

    pub fn with_retention(self) -> Result<Self, BuildError> {
        let retention = Arc::new(RetentionFinalizer::new(
            self.collab.tasks.clone(),
            self.emitter.clone(),
            self.config.revision_policy,
            self.config.retention_event_status.clone(),
        ));
        self.register_check_in_processor(JobKind::Retention, retention.clone())?
            .register_status_change_handler(JobKind::Retention, retention)
    }

    pub fn with_notification(self) -> Result<Self, BuildError> {
        let notification = Arc::new(NotificationFinalizer::new(
            self.collab.notification_jobs.clone(),
            self.collab.clock.clone(),
        ));
        self.register_status_change_handler(JobKind::Notification, notification)
    }

    /// Every built-in finalizer.
    pub fn with_defaults(self) -> Result<Self, BuildError> {
        self.with_scan()?.with_retention()?.with_notification()
    }

    pub fn register_check_in_processor(
        mut self,
        kind: JobKind,
        processor: Arc<dyn CheckInProcessor>,
    ) -> Result<Self, BuildError> {
        self.registry.register_check_in_processor(kind, processor)?;
        Ok(self)
    }

    pub fn register_status_change_post_func(
        mut self,
        kind: JobKind,
        post: Arc<dyn StatusChangePostFunc>,
    ) -> Result<Self, BuildError> {
        self.registry.register_status_change_post_func(kind, post)?;
        Ok(self)
    }

    pub fn register_status_change_handler(
        mut self,
        kind: JobKind,
        handler: Arc<dyn StatusChangeHandler>,
    ) -> Result<Self, BuildError> {
        self.registry.register_status_change_handler(kind, handler)?;
        Ok(self)
    }

    pub fn expect_kinds(mut self, kinds: &[JobKind]) -> Self {
        self.registry.expect_kinds(kinds);
        self
    }

    /// Register the `scanAll` schedule on this scheduler during `build()`.
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        self.config.validate()?;
        let registry = Arc::new(self.registry.build()?);

        if let Some(scheduler) = &self.scheduler {
            scheduler.register_callback(
                SCAN_ALL_CALLBACK,
                Arc::new(ScanAllCallback::new(
                    self.collab.scans.clone(),
                    self.config.scan_all_full_rescan,
                )),
            )?;
            info!(callback = SCAN_ALL_CALLBACK, "schedule callback registered");
        }

        let dispatcher = CallbackDispatcher::new(
            registry,
            self.collab.tasks.clone(),
            self.config.revision_policy,
        );
        Ok(App {
            dispatcher,
            config: self.config,
        })
    }
}

/// A wired callback core.
pub struct App {
    dispatcher: CallbackDispatcher,
    config: CallbackConfig,
}

impl App {
    pub fn dispatcher(&self) -> &CallbackDispatcher {
        &self.dispatcher
    }

    pub fn registry(&self) -> &CallbackRegistry {
        self.dispatcher.registry()
    }

    pub fn config(&self) -> &CallbackConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::Fixture;
    use crate::domain::ProcessorKind;
    use crate::impls::InMemoryScheduler;
    use crate::ports::Trigger;

    #[test]
    fn defaults_fill_the_expected_table() {
        let fx = Fixture::new();
        let app = AppBuilder::new(fx.collaborators(), CallbackConfig::default())
            .with_defaults()
            .unwrap()
            .expect_kinds(&JobKind::ALL)
            .build()
            .unwrap();

        assert_eq!(
            app.registry().registrations(),
            vec![
                (JobKind::ImageScan, ProcessorKind::CheckIn),
                (JobKind::ImageScan, ProcessorKind::StatusChange),
                (JobKind::ImageScanAll, ProcessorKind::CheckIn),
                (JobKind::Retention, ProcessorKind::CheckIn),
                (JobKind::Retention, ProcessorKind::StatusChange),
                (JobKind::Notification, ProcessorKind::StatusChange),
            ]
        );
    }

    #[test]
    fn missing_kinds_fail_the_build() {
        let fx = Fixture::new();
        let result = AppBuilder::new(fx.collaborators(), CallbackConfig::default())
            .with_scan()
            .unwrap()
            .expect_kinds(&[JobKind::ImageScan, JobKind::Notification])
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Registry(RegistryError::MissingKinds(missing)))
                if missing == vec![JobKind::Notification]
        ));
    }

    #[test]
    fn installing_a_finalizer_twice_is_a_duplicate() {
        let fx = Fixture::new();
        let result = AppBuilder::new(fx.collaborators(), CallbackConfig::default())
            .with_retention()
            .unwrap()
            .with_retention();

        assert!(matches!(
            result,
            Err(BuildError::Registry(RegistryError::DuplicateRegistration {
                kind: JobKind::Retention,
                processor: ProcessorKind::CheckIn,
            }))
        ));
    }

    #[test]
    fn invalid_config_fails_the_build() {
        let fx = Fixture::new();
        let config = CallbackConfig {
            retention_event_status: String::new(),
            ..CallbackConfig::default()
        };
        let result = AppBuilder::new(fx.collaborators(), config).build();
        assert!(matches!(result, Err(BuildError::Config(_))));
    }

    #[tokio::test]
    async fn scheduler_receives_scan_all_callback() {
        let fx = Fixture::new();
        let scheduler = Arc::new(InMemoryScheduler::new());
        AppBuilder::new(fx.collaborators(), CallbackConfig::default())
            .with_scheduler(scheduler.clone())
            .build()
            .unwrap();

        assert_eq!(scheduler.callbacks(), vec![SCAN_ALL_CALLBACK.to_string()]);
        scheduler.fire(SCAN_ALL_CALLBACK, "").await.unwrap();
        assert_eq!(fx.scans.scan_all_calls().await, vec![(Trigger::Schedule, true)]);
    }

    #[test]
    fn second_scan_all_registration_is_fatal() {
        let fx = Fixture::new();
        let scheduler = Arc::new(InMemoryScheduler::new());
        AppBuilder::new(fx.collaborators(), CallbackConfig::default())
            .with_scheduler(scheduler.clone())
            .build()
            .unwrap();

        let result = AppBuilder::new(fx.collaborators(), CallbackConfig::default())
            .with_scheduler(scheduler)
            .build();
        assert!(matches!(
            result,
            Err(BuildError::Scheduler(SchedulerError::DuplicateCallback(_)))
        ));
    }
}
