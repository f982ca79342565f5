//! Seed loading and callback replay.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use jobhook_core::app::CallbackDispatcher;
use jobhook_core::domain::{
    Event, JobKind, NotificationJob, Outcome, RobotId, Task, TaskKey,
};
use jobhook_core::ports::Artifact;

use crate::Harness;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Seed {
    tasks: Vec<Task>,
    notification_jobs: Vec<NotificationJob>,
    artifacts: Vec<Artifact>,
}

/// One line of the callbacks file.
#[derive(Debug, Deserialize)]
struct CallbackLine {
    kind: JobKind,
    task: TaskKey,
    body: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct LineResult<'a> {
    line: usize,
    kind: JobKind,
    task: &'a TaskKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    retryable: bool,
}

#[derive(Debug, Serialize)]
struct FinalState {
    tasks: Vec<Task>,
    notification_jobs: Vec<NotificationJob>,
    deleted_robots: Vec<RobotId>,
    events: Vec<Event>,
}

pub async fn seed(harness: &Harness, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed {}", path.display()))?;
    let seed: Seed = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse seed {}", path.display()))?;

    for task in seed.tasks {
        harness.tasks.insert(task).await;
    }
    for job in seed.notification_jobs {
        harness
            .notification_jobs
            .insert(job.id, job.status, job.update_time)
            .await;
    }
    for artifact in seed.artifacts {
        harness.artifacts.insert(artifact).await;
    }
    Ok(())
}

/// Replay every callback in order; a failing callback does not stop the run.
///
/// Writes one JSON line per callback, then the final store state.
pub async fn run(
    harness: &Harness,
    dispatcher: &CallbackDispatcher,
    path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read callbacks {}", path.display()))?;

    for (index, text) in raw.lines().enumerate() {
        let line = index + 1;
        if text.trim().is_empty() {
            continue;
        }
        let callback: CallbackLine = serde_json::from_str(text)
            .with_context(|| format!("malformed callback at line {line}"))?;
        let body = serde_json::to_vec(&callback.body)?;

        let result = dispatcher
            .handle(callback.kind, callback.task.clone(), &body)
            .await;
        let printed = match result {
            Ok(outcome) => LineResult {
                line,
                kind: callback.kind,
                task: &callback.task,
                outcome: Some(outcome),
                error: None,
                retryable: false,
            },
            Err(e) => {
                warn!(line, kind = %callback.kind, task = %callback.task, error = %e, "callback failed");
                LineResult {
                    line,
                    kind: callback.kind,
                    task: &callback.task,
                    outcome: None,
                    retryable: e.is_retryable(),
                    error: Some(e.to_string()),
                }
            }
        };
        writeln!(out, "{}", serde_json::to_string(&printed)?)?;
    }

    let state = FinalState {
        tasks: harness.tasks.all().await,
        notification_jobs: harness.notification_jobs.all().await,
        deleted_robots: harness.credentials.deleted().await,
        events: harness.bus.published().await,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&state)?)?;
    Ok(())
}
