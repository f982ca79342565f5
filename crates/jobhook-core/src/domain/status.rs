//! Status vocabulary - engine の外部ステータスと内部ステータスの対応
//!
//! # 状態遷移
//! - pending → scheduled → running → {stopped, error, finished}
//! - 終端（stopped / error / finished）からは遷移しない

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Progress code shared by all terminal statuses.
const TERMINAL_CODE: u8 = 3;

/// Status string as reported by the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Scheduled,
    Running,
    Stopped,
    Error,
    Success,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Scheduled => "Scheduled",
            JobStatus::Running => "Running",
            JobStatus::Stopped => "Stopped",
            JobStatus::Error => "Error",
            JobStatus::Success => "Success",
        }
    }

    /// Internal status this engine status maps to.
    pub fn normalize(self) -> TaskStatus {
        match self {
            JobStatus::Pending => TaskStatus::Pending,
            JobStatus::Scheduled => TaskStatus::Scheduled,
            JobStatus::Running => TaskStatus::Running,
            JobStatus::Stopped => TaskStatus::Stopped,
            JobStatus::Error => TaskStatus::Error,
            JobStatus::Success => TaskStatus::Finished,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.normalize().is_terminal()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when the engine reports a status outside the known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(JobStatus::Pending),
            "Scheduled" => Ok(JobStatus::Scheduled),
            "Running" => Ok(JobStatus::Running),
            "Stopped" => Ok(JobStatus::Stopped),
            "Error" => Ok(JobStatus::Error),
            "Success" => Ok(JobStatus::Success),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Status persisted on task and notification job records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Scheduled,
    Running,
    Stopped,
    Error,
    Finished,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::Running => "running",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Error => "error",
            TaskStatus::Finished => "finished",
        }
    }

    /// Progress code: pending 0, scheduled 1, running 2, any terminal status 3.
    pub fn code(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::Scheduled => 1,
            TaskStatus::Running => 2,
            TaskStatus::Stopped | TaskStatus::Error | TaskStatus::Finished => TERMINAL_CODE,
        }
    }

    /// Is this a terminal status (no further transitions)?
    pub fn is_terminal(self) -> bool {
        self.code() == TERMINAL_CODE
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an external status string to the internal vocabulary.
///
/// `None` means "acknowledge and drop": the callback is not an error, but
/// nothing may be written for it.
pub fn normalize(external: &str) -> Option<TaskStatus> {
    external.parse::<JobStatus>().ok().map(JobStatus::normalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::pending("Pending", TaskStatus::Pending)]
    #[case::scheduled("Scheduled", TaskStatus::Scheduled)]
    #[case::running("Running", TaskStatus::Running)]
    #[case::stopped("Stopped", TaskStatus::Stopped)]
    #[case::error("Error", TaskStatus::Error)]
    #[case::success("Success", TaskStatus::Finished)]
    fn known_statuses_are_normalized(#[case] external: &str, #[case] expected: TaskStatus) {
        assert_eq!(normalize(external), Some(expected));
    }

    #[rstest]
    #[case::empty("")]
    #[case::lowercase("success")]
    #[case::internal_name("finished")]
    #[case::garbage("Exploded")]
    fn unknown_statuses_are_ignorable(#[case] external: &str) {
        assert_eq!(normalize(external), None);
    }

    #[test]
    fn terminal_statuses_share_the_highest_code() {
        assert!(JobStatus::Success.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(JobStatus::Stopped.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(TaskStatus::Running.code() < TaskStatus::Finished.code());
        assert_eq!(TaskStatus::Error.code(), TaskStatus::Stopped.code());
    }

    #[test]
    fn task_status_serializes_snake_case() {
        let s = serde_json::to_string(&TaskStatus::Finished).unwrap();
        assert_eq!(s, "\"finished\"");
    }
}
