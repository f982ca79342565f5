//! JobKind - engine が扱うジョブ種別
//!
//! 文字列の job kind は起動時・受信時に一度だけ parse し、以降は enum で扱う。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobKind {
    /// Vulnerability scan of a single artifact.
    ImageScan,
    /// Scan task spawned by a "scan all" execution.
    ImageScanAll,
    /// Tag retention sweep.
    Retention,
    /// Webhook / notification delivery.
    Notification,
}

impl JobKind {
    pub const ALL: [JobKind; 4] = [
        JobKind::ImageScan,
        JobKind::ImageScanAll,
        JobKind::Retention,
        JobKind::Notification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::ImageScan => "IMAGE_SCAN",
            JobKind::ImageScanAll => "IMAGE_SCAN_ALL",
            JobKind::Retention => "RETENTION",
            JobKind::Notification => "NOTIFICATION",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job kind '{0}'")]
pub struct UnknownJobKind(pub String);

impl FromStr for JobKind {
    type Err = UnknownJobKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownJobKind(s.to_string()))
    }
}

/// The two handler slots a job kind can fill in the callback registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProcessorKind {
    /// Incremental progress (non-empty check-in).
    CheckIn,
    /// Status transition (post-processor or self-managed handler).
    StatusChange,
}

impl fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorKind::CheckIn => f.write_str("check-in"),
            ProcessorKind::StatusChange => f.write_str("status-change"),
        }
    }
}
