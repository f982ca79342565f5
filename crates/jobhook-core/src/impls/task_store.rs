//! InMemoryTaskStore - 開発用・テスト用のタスク正本
//!
//! # 実装詳細
//! - `HashMap<TaskId, Task>` を tokio の Mutex で保護
//! - track ID での参照は線形探索（件数が少ない前提）
//! - revision guard はロックを保持したまま評価するので、比較と書き込みは原子的

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RevisionGuard, StoreError, Task, TaskId, TaskKey, TaskPatch, WriteResult};
use crate::ports::TaskStore;

#[derive(Default)]
struct State {
    tasks: HashMap<TaskId, Task>,
    /// `update_fields` の呼び出し回数（guard で弾かれたものも含む）
    writes: usize,
    failure: Option<String>,
    /// 次の `get` だけを失敗させる
    get_failure: Option<String>,
}

impl State {
    fn find_mut(&mut self, key: &TaskKey) -> Option<&mut Task> {
        match key {
            TaskKey::Id(id) => self.tasks.get_mut(id),
            TaskKey::Track(track) => self
                .tasks
                .values_mut()
                .find(|t| t.track_id.as_ref() == Some(track)),
        }
    }
}

#[derive(Default)]
pub struct InMemoryTaskStore {
    state: Mutex<State>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub async fn insert(&self, task: Task) {
        self.state.lock().await.tasks.insert(task.id, task);
    }

    pub async fn snapshot(&self, key: &TaskKey) -> Option<Task> {
        self.state.lock().await.find_mut(key).map(|t| t.clone())
    }

    /// All records ordered by ID.
    pub async fn all(&self) -> Vec<Task> {
        let state = self.state.lock().await;
        let mut tasks: Vec<_> = state.tasks.values().cloned().collect();
        tasks.sort_by_key(|t| t.id);
        tasks
    }

    pub async fn write_count(&self) -> usize {
        self.state.lock().await.writes
    }

    /// Make the next `get` fail as unavailable; later reads succeed.
    pub async fn fail_next_get_with(&self, message: impl Into<String>) {
        self.state.lock().await.get_failure = Some(message.into());
    }

    /// Make every subsequent write fail as unavailable.
    pub async fn fail_writes_with(&self, message: impl Into<String>) {
        self.state.lock().await.failure = Some(message.into());
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get(&self, key: &TaskKey) -> Result<Task, StoreError> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.get_failure.take() {
            return Err(StoreError::Unavailable(message));
        }
        state
            .find_mut(key)
            .map(|t| t.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn update_fields(
        &self,
        key: &TaskKey,
        patch: TaskPatch,
        guard: Option<RevisionGuard>,
    ) -> Result<WriteResult, StoreError> {
        let mut state = self.state.lock().await;
        state.writes += 1;
        if let Some(message) = &state.failure {
            return Err(StoreError::Unavailable(message.clone()));
        }

        let task = state
            .find_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        if let Some(guard) = guard
            && !guard.admits(task.revision, task.status)
        {
            return Ok(WriteResult::Rejected);
        }
        patch.apply_to(task);
        Ok(WriteResult::Applied)
    }
}
