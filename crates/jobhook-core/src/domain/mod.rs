//! Domain model (IDs, statuses, payloads, records, events, outcomes).

pub mod errors;
pub mod events;
pub mod ids;
pub mod job_kind;
pub mod outcome;
pub mod payload;
pub mod report;
pub mod revision;
pub mod status;
pub mod task;

pub use self::errors::{CallbackError, DecodeTarget, ServiceError, StoreError};
pub use self::events::{Event, EventMetadata, ScannedArtifact, Topic};
pub use self::ids::{
    ArtifactId, EventId, NotificationJobId, RobotId, TaskId, TaskKey, TrackId,
};
pub use self::job_kind::{JobKind, ProcessorKind, UnknownJobKind};
pub use self::outcome::{Advisory, AdvisoryKind, Disposition, Outcome};
pub use self::payload::{StatusChange, StatusChangeMetadata, StatusUpdate};
pub use self::report::{Candidate, CheckInReport, DeletionResult, RetainObject};
pub use self::revision::{RevisionGuard, RevisionPolicy, WriteResult};
pub use self::status::{JobStatus, TaskStatus, UnknownStatus, normalize};
pub use self::task::{
    ExtraAttrs, NotificationJob, NotificationJobPatch, Task, TaskPatch,
};
