//! Errors - コールバック処理のエラー分類
//!
//! # 分類
//! - 必須（mandatory）: decode / store / controller の失敗 → `CallbackError` として返す
//! - 任意（advisory）: 後始末・artifact 取得・イベント発行 → ログのみ（`Outcome` 参照）

use thiserror::Error;

use super::ids::TaskKey;
use super::job_kind::{JobKind, ProcessorKind};

/// Failure of a persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a non-store collaborator (credentials, artifacts, scans, bus).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("service call failed: {0}")]
    Failed(String),
}

/// What the callback is being decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTarget {
    StatusChange,
    ScanReport,
    RetainObject,
}

impl std::fmt::Display for DecodeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeTarget::StatusChange => f.write_str("status change"),
            DecodeTarget::ScanReport => f.write_str("scan check-in report"),
            DecodeTarget::RetainObject => f.write_str("retention check-in"),
        }
    }
}

/// Mandatory-path failure of a callback.
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("failed to decode {target}: {source}")]
    Decode {
        target: DecodeTarget,
        #[source]
        source: serde_json::Error,
    },

    #[error("no {processor} handler registered for job kind {kind}")]
    ProcessorNotFound {
        kind: JobKind,
        processor: ProcessorKind,
    },

    #[error("job kind {kind} cannot address task {key}")]
    UnsupportedKey { kind: JobKind, key: TaskKey },

    #[error("failed to fetch task {key}: {source}")]
    Fetch {
        key: TaskKey,
        #[source]
        source: StoreError,
    },

    #[error("failed to update {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("scan controller: {0}")]
    Controller(#[source] ServiceError),

    /// The status write was committed, then post-processing failed.
    ///
    /// A redelivery would be stale, so this is not retryable; the post-processing
    /// side effects are best-effort.
    #[error("status of {key} was written but post-processing failed: {source}")]
    PostProcess {
        key: TaskKey,
        #[source]
        source: Box<CallbackError>,
    },
}

impl CallbackError {
    pub fn decode(target: DecodeTarget, source: serde_json::Error) -> Self {
        CallbackError::Decode { target, source }
    }

    pub fn store(key: impl ToString, source: StoreError) -> Self {
        CallbackError::Store {
            key: key.to_string(),
            source,
        }
    }

    /// Should the transport ask the engine to redeliver?
    ///
    /// Decode and routing failures will fail the same way again, and a
    /// failure after a committed status write would come back as stale.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CallbackError::Fetch { .. } | CallbackError::Store { .. } | CallbackError::Controller(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::TaskId;

    #[test]
    fn store_failures_are_retryable_decode_failures_are_not() {
        let err = CallbackError::store(
            TaskKey::Id(TaskId::new(1)),
            StoreError::Unavailable("timeout".to_string()),
        );
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "failed to update task-1: store unavailable: timeout");

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CallbackError::decode(DecodeTarget::RetainObject, source);
        assert!(!err.is_retryable());
        assert!(err.to_string().starts_with("failed to decode retention check-in"));
    }

    #[test]
    fn post_processing_failures_are_not_retryable() {
        let key = TaskKey::Id(TaskId::new(1));
        let fetch = CallbackError::Fetch {
            key: key.clone(),
            source: StoreError::Unavailable("blip".to_string()),
        };
        assert!(fetch.is_retryable());

        let err = CallbackError::PostProcess {
            key,
            source: Box::new(fetch),
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("store unavailable: blip"));
    }
}
