//! Outcome model: what a handled callback did.
//!
//! A callback result is `Result<Outcome, CallbackError>`:
//! - `Err`: a mandatory step (decode, status/field persistence) failed.
//! - `Ok(outcome)`: mandatory work is done; `outcome.advisories` lists optional
//!   side effects (cleanup, artifact lookup, event publish) that failed and were
//!   only logged.

use serde::{Deserialize, Serialize};

/// What happened to the callback's mandatory write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    /// State was written (or the step had nothing to write).
    Applied,
    /// Unknown status; acknowledged and dropped.
    Ignored,
    /// The store rejected the write on its revision precondition.
    Stale,
}

/// Optional side effects that may fail without failing the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    CredentialCleanup,
    ArtifactLookup,
    EventBuild,
    EventPublish,
}

/// A swallowed side-effect failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub message: String,
}

impl Advisory {
    pub fn new(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub disposition: Disposition,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,

    /// Number of events handed to the bus.
    #[serde(default)]
    pub events_published: usize,
}

impl Outcome {
    pub fn applied() -> Self {
        Self {
            disposition: Disposition::Applied,
            advisories: Vec::new(),
            events_published: 0,
        }
    }

    pub fn ignored() -> Self {
        Self {
            disposition: Disposition::Ignored,
            ..Self::applied()
        }
    }

    pub fn stale() -> Self {
        Self {
            disposition: Disposition::Stale,
            ..Self::applied()
        }
    }

    pub fn with_advisory(mut self, advisory: Advisory) -> Self {
        self.advisories.push(advisory);
        self
    }

    pub fn with_published(mut self, count: usize) -> Self {
        self.events_published += count;
        self
    }

    /// Fold another step's side effects into this outcome.
    pub fn merge(mut self, other: Outcome) -> Self {
        self.advisories.extend(other.advisories);
        self.events_published += other.events_published;
        self
    }

    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }
}
