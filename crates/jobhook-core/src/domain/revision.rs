//! Revision guard for status writes.
//!
//! The store evaluates the guard atomically with the write; a rejected guard
//! is a no-op, never an error.

use serde::{Deserialize, Serialize};

use super::status::TaskStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionPolicy {
    /// Apply only when `incoming > stored`.
    #[default]
    StrictlyNewer,
    /// Also apply an equal revision when the status progress code advances
    /// (e.g. `running` → `finished` within one run).
    NewerOrAdvancing,
}

/// Precondition attached to a status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionGuard {
    /// `None` when the callback carried no revision.
    pub revision: Option<i64>,
    pub status: TaskStatus,
    pub policy: RevisionPolicy,
}

impl RevisionGuard {
    pub fn new(revision: Option<i64>, status: TaskStatus, policy: RevisionPolicy) -> Self {
        Self {
            revision,
            status,
            policy,
        }
    }

    /// Does the stored state allow this write?
    ///
    /// Without a revision only a strictly advancing status is admitted, so a
    /// redelivered terminal status is still rejected.
    pub fn admits(&self, stored_revision: i64, stored_status: TaskStatus) -> bool {
        let Some(revision) = self.revision else {
            return self.status.code() > stored_status.code();
        };
        if revision > stored_revision {
            return true;
        }
        match self.policy {
            RevisionPolicy::StrictlyNewer => false,
            RevisionPolicy::NewerOrAdvancing => {
                revision == stored_revision && self.status.code() > stored_status.code()
            }
        }
    }
}

/// Result of a (possibly guarded) write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Applied,
    /// The precondition did not hold; nothing was written.
    Rejected,
}
