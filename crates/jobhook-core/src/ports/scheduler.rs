//! Scheduler port - 定期実行コールバックの登録
//!
//! コールバックは起動時に一度だけ登録する。登録失敗は起動失敗。

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("callback '{0}' is already registered")]
    DuplicateCallback(String),

    #[error("callback '{0}' is not registered")]
    UnknownCallback(String),

    #[error("callback '{name}' failed: {message}")]
    CallbackFailed { name: String, message: String },
}

/// Function run by the scheduler when a schedule fires.
#[async_trait]
pub trait ScheduleCallback: Send + Sync {
    async fn run(&self, param: &str) -> Result<(), SchedulerError>;
}

pub trait Scheduler: Send + Sync {
    fn register_callback(
        &self,
        name: &str,
        callback: Arc<dyn ScheduleCallback>,
    ) -> Result<(), SchedulerError>;
}
