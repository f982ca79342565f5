//! Scheduled "scan all" trigger.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::ports::{ScanController, ScheduleCallback, SchedulerError, Trigger};

/// Scheduler callback name of the scan-all schedule.
pub const SCAN_ALL_CALLBACK: &str = "scanAll";

pub struct ScanAllCallback {
    scans: Arc<dyn ScanController>,
    full_rescan: bool,
}

impl ScanAllCallback {
    pub fn new(scans: Arc<dyn ScanController>, full_rescan: bool) -> Self {
        Self { scans, full_rescan }
    }
}

#[async_trait]
impl ScheduleCallback for ScanAllCallback {
    async fn run(&self, _param: &str) -> Result<(), SchedulerError> {
        let execution = self
            .scans
            .scan_all(Trigger::Schedule, self.full_rescan)
            .await
            .map_err(|e| SchedulerError::CallbackFailed {
                name: SCAN_ALL_CALLBACK.to_string(),
                message: e.to_string(),
            })?;
        info!(execution, full_rescan = self.full_rescan, "scheduled scan all started");
        Ok(())
    }
}
