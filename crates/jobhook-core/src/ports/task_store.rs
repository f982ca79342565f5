//! TaskStore port - scan / retention タスクの正本（source of truth）
//!
//! # 設計原則
//! - コアはレコード全体を書き戻さない（部分更新のみ）
//! - revision 条件の評価と書き込みは store 側で不可分に行う
//! - 条件不一致は `WriteResult::Rejected`（エラーではない）

use async_trait::async_trait;

use crate::domain::{RevisionGuard, StoreError, Task, TaskKey, TaskPatch, WriteResult};

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get(&self, key: &TaskKey) -> Result<Task, StoreError>;

    /// Write the populated fields of `patch`, optionally conditioned on `guard`.
    async fn update_fields(
        &self,
        key: &TaskKey,
        patch: TaskPatch,
        guard: Option<RevisionGuard>,
    ) -> Result<WriteResult, StoreError>;
}
