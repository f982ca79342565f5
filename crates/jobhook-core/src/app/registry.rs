//! CallbackRegistry - job kind ごとのコールバック処理の登録と解決
//!
//! # 二段構成
//! - **RegistryBuilder**（起動時のみ、mutable）: 登録・重複検出・期待集合チェック
//! - **CallbackRegistry**（実行時、immutable）: `Arc` で共有し、ロックなしで参照
//!
//! # スロット
//! job kind ごとに 2 つのスロットがある:
//! - check-in: `CheckInProcessor`
//! - status-change: `StatusChangePostFunc`（engine 側の状態更新の後に終端で呼ばれる）
//!   または `StatusChangeHandler`（状態更新そのものを自前で行う）

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    CallbackError, JobKind, JobStatus, Outcome, ProcessorKind, StatusUpdate, TaskKey,
};

/// Applies incremental progress carried in a check-in.
#[async_trait]
pub trait CheckInProcessor: Send + Sync {
    async fn process(&self, key: &TaskKey, check_in: &str) -> Result<Outcome, CallbackError>;
}

/// Runs after the engine-level status write has been applied.
///
/// Only invoked for terminal statuses, and only once per applied write.
#[async_trait]
pub trait StatusChangePostFunc: Send + Sync {
    async fn post(&self, key: &TaskKey, status: JobStatus) -> Result<Outcome, CallbackError>;
}

/// Owns the status write for its job kind.
#[async_trait]
pub trait StatusChangeHandler: Send + Sync {
    async fn handle(&self, key: &TaskKey, update: &StatusUpdate) -> Result<Outcome, CallbackError>;
}

/// What occupies a kind's status-change slot.
#[derive(Clone)]
pub enum StatusChangeEntry {
    PostFunc(Arc<dyn StatusChangePostFunc>),
    Handler(Arc<dyn StatusChangeHandler>),
}

/// A resolved registration.
#[derive(Clone)]
pub enum Resolved<'a> {
    CheckIn(&'a Arc<dyn CheckInProcessor>),
    StatusChange(&'a StatusChangeEntry),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{processor} handler for job kind {kind} is already registered")]
    DuplicateRegistration {
        kind: JobKind,
        processor: ProcessorKind,
    },

    #[error("missing registrations for job kinds {0:?}")]
    MissingKinds(Vec<JobKind>),
}

#[derive(Default)]
pub struct RegistryBuilder {
    check_in: HashMap<JobKind, Arc<dyn CheckInProcessor>>,
    status_change: HashMap<JobKind, StatusChangeEntry>,
    expected: Option<Vec<JobKind>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_check_in_processor(
        &mut self,
        kind: JobKind,
        processor: Arc<dyn CheckInProcessor>,
    ) -> Result<(), RegistryError> {
        if self.check_in.contains_key(&kind) {
            return Err(RegistryError::DuplicateRegistration {
                kind,
                processor: ProcessorKind::CheckIn,
            });
        }
        self.check_in.insert(kind, processor);
        Ok(())
    }

    pub fn register_status_change_post_func(
        &mut self,
        kind: JobKind,
        post: Arc<dyn StatusChangePostFunc>,
    ) -> Result<(), RegistryError> {
        self.insert_status_change(kind, StatusChangeEntry::PostFunc(post))
    }

    pub fn register_status_change_handler(
        &mut self,
        kind: JobKind,
        handler: Arc<dyn StatusChangeHandler>,
    ) -> Result<(), RegistryError> {
        self.insert_status_change(kind, StatusChangeEntry::Handler(handler))
    }

    fn insert_status_change(
        &mut self,
        kind: JobKind,
        entry: StatusChangeEntry,
    ) -> Result<(), RegistryError> {
        if self.status_change.contains_key(&kind) {
            return Err(RegistryError::DuplicateRegistration {
                kind,
                processor: ProcessorKind::StatusChange,
            });
        }
        self.status_change.insert(kind, entry);
        Ok(())
    }

    /// Job kinds that must have at least one registration when `build()` runs.
    pub fn expect_kinds(&mut self, kinds: &[JobKind]) {
        self.expected = Some(kinds.to_vec());
    }

    /// Freeze the table.
    ///
    /// Fails with `MissingKinds` when an expected kind has no registration.
    pub fn build(self) -> Result<CallbackRegistry, RegistryError> {
        if let Some(expected) = &self.expected {
            let missing: Vec<JobKind> = expected
                .iter()
                .filter(|&kind| {
                    !self.check_in.contains_key(kind) && !self.status_change.contains_key(kind)
                })
                .copied()
                .collect();
            if !missing.is_empty() {
                return Err(RegistryError::MissingKinds(missing));
            }
        }
        Ok(CallbackRegistry {
            check_in: self.check_in,
            status_change: self.status_change,
        })
    }
}

/// Read-only callback table shared by all in-flight callbacks.
pub struct CallbackRegistry {
    check_in: HashMap<JobKind, Arc<dyn CheckInProcessor>>,
    status_change: HashMap<JobKind, StatusChangeEntry>,
}

impl CallbackRegistry {
    pub fn resolve(&self, kind: JobKind, processor: ProcessorKind) -> Option<Resolved<'_>> {
        match processor {
            ProcessorKind::CheckIn => self.check_in.get(&kind).map(Resolved::CheckIn),
            ProcessorKind::StatusChange => {
                self.status_change.get(&kind).map(Resolved::StatusChange)
            }
        }
    }

    /// Every filled slot, sorted.
    pub fn registrations(&self) -> Vec<(JobKind, ProcessorKind)> {
        let mut slots: Vec<_> = self
            .check_in
            .keys()
            .map(|kind| (*kind, ProcessorKind::CheckIn))
            .chain(
                self.status_change
                    .keys()
                    .map(|kind| (*kind, ProcessorKind::StatusChange)),
            )
            .collect();
        slots.sort();
        slots
    }
}
