//! Ports - 外部コラボレータへの抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。コアは以下を外部に委ねる:
//! - 状態の永続化（TaskStore, NotificationJobStore）
//! - robot account / artifact / scan の各サービス
//! - イベント配送（EventBus）と定期実行（Scheduler）
//! - 時刻と ID（Clock, IdGenerator）

pub mod artifact_service;
pub mod clock;
pub mod credential;
pub mod event_bus;
pub mod id_generator;
pub mod notification_store;
pub mod scan_controller;
pub mod scheduler;
pub mod task_store;

pub use self::artifact_service::{Artifact, ArtifactOption, ArtifactService};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::credential::CredentialService;
pub use self::event_bus::EventBus;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notification_store::NotificationJobStore;
pub use self::scan_controller::{ScanController, Trigger};
pub use self::scheduler::{ScheduleCallback, Scheduler, SchedulerError};
pub use self::task_store::TaskStore;
