//! CallbackDispatcher - 受信したコールバックの分類と適用
//!
//! # フロー
//! 1. payload を decode（失敗は `Decode`）
//! 2. status を正規化（未知の status は acknowledge して捨てる）
//! 3. check-in があれば check-in processor へ
//! 4. なければ status-change スロットへ
//!    - handler: 状態更新を handler 自身が行う
//!    - post func: revision 条件付きで状態を更新し、適用された終端遷移のときだけ呼ぶ
//!      （状態更新の後の失敗は `PostProcess` で、再送対象にならない）
//!
//! revision のないコールバックは status が前進する場合だけ適用する。
//!
//! コールバックごとに独立して処理する。レジストリは読み取り専用なのでロック不要。

use std::sync::Arc;

use tracing::{Instrument, debug, error};

use crate::app::registry::{CallbackRegistry, Resolved, StatusChangeEntry};
use crate::domain::{
    CallbackError, DecodeTarget, JobKind, Outcome, ProcessorKind, RevisionGuard, RevisionPolicy,
    StatusChange, TaskKey, TaskPatch, WriteResult,
};
use crate::observability::callback_span;
use crate::ports::TaskStore;

#[derive(Clone)]
pub struct CallbackDispatcher {
    registry: Arc<CallbackRegistry>,
    tasks: Arc<dyn TaskStore>,
    policy: RevisionPolicy,
}

impl CallbackDispatcher {
    pub fn new(
        registry: Arc<CallbackRegistry>,
        tasks: Arc<dyn TaskStore>,
        policy: RevisionPolicy,
    ) -> Self {
        Self {
            registry,
            tasks,
            policy,
        }
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// Decode a raw callback body and apply it.
    pub async fn handle(
        &self,
        kind: JobKind,
        key: TaskKey,
        body: &[u8],
    ) -> Result<Outcome, CallbackError> {
        let change = StatusChange::from_slice(body)
            .map_err(|e| CallbackError::decode(DecodeTarget::StatusChange, e))?;
        self.dispatch(kind, key, &change).await
    }

    /// Apply an already decoded status change.
    pub async fn dispatch(
        &self,
        kind: JobKind,
        key: TaskKey,
        change: &StatusChange,
    ) -> Result<Outcome, CallbackError> {
        let span = callback_span(kind, &key);
        self.dispatch_inner(kind, key, change).instrument(span).await
    }

    async fn dispatch_inner(
        &self,
        kind: JobKind,
        key: TaskKey,
        change: &StatusChange,
    ) -> Result<Outcome, CallbackError> {
        let Some(update) = change.normalize() else {
            debug!(status = %change.status, "drop the job status update event");
            return Ok(Outcome::ignored());
        };

        let processor = if update.check_in.is_some() {
            ProcessorKind::CheckIn
        } else {
            ProcessorKind::StatusChange
        };
        let resolved = self
            .registry
            .resolve(kind, processor)
            .ok_or(CallbackError::ProcessorNotFound { kind, processor })?;

        match resolved {
            Resolved::CheckIn(processor) => {
                let check_in = update.check_in.as_deref().unwrap_or_default();
                processor.process(&key, check_in).await
            }
            Resolved::StatusChange(StatusChangeEntry::Handler(handler)) => {
                handler.handle(&key, &update).await
            }
            Resolved::StatusChange(StatusChangeEntry::PostFunc(post)) => {
                let guard = RevisionGuard::new(update.revision, update.status, self.policy);
                let written = self
                    .tasks
                    .update_fields(
                        &key,
                        TaskPatch::status(update.status, update.revision),
                        Some(guard),
                    )
                    .await
                    .map_err(|e| CallbackError::store(&key, e))?;

                if written == WriteResult::Rejected {
                    debug!(status = %update.raw, revision = ?update.revision, "stale status update dropped");
                    return Ok(Outcome::stale());
                }
                if !update.is_terminal() {
                    return Ok(Outcome::applied());
                }
                // 状態は確定済み。ここからの失敗は再送しても stale になる
                post.post(&key, update.raw).await.map_err(|e| {
                    error!(status = %update.raw, error = %e, "post-processing failed after status was written");
                    CallbackError::PostProcess {
                        key: key.clone(),
                        source: Box::new(e),
                    }
                })
            }
        }
    }
}
