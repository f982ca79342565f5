//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryTaskStore** / **InMemoryNotificationJobStore**: 正本の代わり
//! - **RecordingCredentialService** など: 外部サービスの呼び出しを記録
//! - **InMemoryScheduler**: 名前付きコールバックの登録と手動発火
//!
//! 本番用の実装（DB、メッセージバス、スケジューラ）はこのクレートの外に置く。

pub mod notification_store;
pub mod scheduler;
pub mod services;
pub mod task_store;

pub use self::notification_store::InMemoryNotificationJobStore;
pub use self::scheduler::InMemoryScheduler;
pub use self::services::{
    InMemoryArtifactService, RecordingCredentialService, RecordingEventBus,
    RecordingScanController,
};
pub use self::task_store::InMemoryTaskStore;
