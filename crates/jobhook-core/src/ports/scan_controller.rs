//! ScanController port - scan 結果の反映と scan all の起動

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{CheckInReport, ServiceError};

/// Why an execution was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trigger {
    Manual,
    Schedule,
    Event,
}

#[async_trait]
pub trait ScanController: Send + Sync {
    /// Merge a scanner report into the persisted scan result.
    async fn update_report(&self, report: CheckInReport) -> Result<(), ServiceError>;

    /// Start a scan of every artifact; returns the execution ID.
    async fn scan_all(&self, trigger: Trigger, full_rescan: bool) -> Result<i64, ServiceError>;
}
