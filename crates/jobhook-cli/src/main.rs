//! jobhook - drive the callback core against in-memory collaborators.
//!
//! - `jobhook replay --seed tasks.json --callbacks callbacks.ndjson`
//! - `jobhook fire-schedule scanAll`

mod replay;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use jobhook_core::app::{AppBuilder, Collaborators};
use jobhook_core::config::CallbackConfig;
use jobhook_core::domain::JobKind;
use jobhook_core::impls::{
    InMemoryArtifactService, InMemoryNotificationJobStore, InMemoryScheduler, InMemoryTaskStore,
    RecordingCredentialService, RecordingEventBus, RecordingScanController,
};
use jobhook_core::observability::{LogFormat, init_logging};
use jobhook_core::ports::{SystemClock, UlidGenerator};

#[derive(Debug, Parser)]
#[command(name = "jobhook", version, about, long_about = None)]
struct Cli {
    /// JSON config file; defaults apply when omitted.
    #[arg(long, env = "JOBHOOK_CONFIG")]
    config: Option<PathBuf>,

    /// `pretty` or `json`.
    #[arg(long, env = "JOBHOOK_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay recorded callbacks against seeded stores.
    Replay {
        /// JSON file with the initial tasks, notification jobs and artifacts.
        #[arg(long)]
        seed: PathBuf,

        /// NDJSON file, one `{kind, task, body}` callback per line.
        #[arg(long)]
        callbacks: PathBuf,
    },
    /// Run a registered schedule callback once.
    FireSchedule {
        name: String,

        #[arg(long, default_value = "")]
        param: String,
    },
}

/// In-memory collaborators, kept concrete so their state can be printed.
struct Harness {
    tasks: Arc<InMemoryTaskStore>,
    notification_jobs: Arc<InMemoryNotificationJobStore>,
    credentials: Arc<RecordingCredentialService>,
    artifacts: Arc<InMemoryArtifactService>,
    scans: Arc<RecordingScanController>,
    bus: Arc<RecordingEventBus>,
}

impl Harness {
    fn new() -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskStore::new()),
            notification_jobs: Arc::new(InMemoryNotificationJobStore::new()),
            credentials: Arc::new(RecordingCredentialService::new()),
            artifacts: Arc::new(InMemoryArtifactService::new()),
            scans: Arc::new(RecordingScanController::new()),
            bus: Arc::new(RecordingEventBus::new()),
        }
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            tasks: self.tasks.clone(),
            notification_jobs: self.notification_jobs.clone(),
            credentials: self.credentials.clone(),
            artifacts: self.artifacts.clone(),
            scans: self.scans.clone(),
            bus: self.bus.clone(),
            ids: Arc::new(UlidGenerator::new(SystemClock)),
            clock: Arc::new(SystemClock),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<CallbackConfig> {
    match path {
        Some(path) => Ok(CallbackConfig::from_json_file(path)?),
        None => Ok(CallbackConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let config = load_config(cli.config.as_ref())?;
    let harness = Harness::new();
    let scheduler = Arc::new(InMemoryScheduler::new());
    let app = AppBuilder::new(harness.collaborators(), config)
        .with_defaults()?
        .expect_kinds(&JobKind::ALL)
        .with_scheduler(scheduler.clone())
        .build()
        .context("failed to initialize callback core")?;
    info!(registrations = app.registry().registrations().len(), "callback core ready");

    match cli.command {
        Command::Replay { seed, callbacks } => {
            replay::seed(&harness, &seed).await?;
            replay::run(&harness, app.dispatcher(), &callbacks, &mut std::io::stdout()).await
        }
        Command::FireSchedule { name, param } => {
            scheduler
                .fire(&name, &param)
                .await
                .with_context(|| format!("schedule callback '{name}' failed"))?;
            let calls = harness.scans.scan_all_calls().await;
            println!("{}", serde_json::to_string(&calls)?);
            Ok(())
        }
    }
}
