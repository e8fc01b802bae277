//! Job Runner
//!
//! Spawns each command as a child process on a [`JoinSet`]. Every task
//! streams the child's output as [`JobEvent`]s and reports its exit.
//!
//! In queue mode each task also holds a [`LoadGuard`], so the overlay's
//! counter is exactly the number of commands still running. Aborting the
//! set drops the tasks, which kills the children and releases the guards.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use memeload_core::{LoadGuard, MaskHandle};

use super::state::{JobEvent, JobStatus};

/// Exit code reported when a command can't be started (shell convention)
const SPAWN_FAILED_EXIT_CODE: i32 = 127;

/// A command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCommand {
    /// Run through `sh -c`
    Shell(String),
    /// Program and arguments, run directly
    Argv(Vec<String>),
}

impl JobCommand {
    /// Command line for display
    pub fn display(&self) -> String {
        match self {
            JobCommand::Shell(line) => line.clone(),
            JobCommand::Argv(argv) => argv.join(" "),
        }
    }

    fn build(&self) -> Option<Command> {
        match self {
            JobCommand::Shell(line) => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(line);
                Some(command)
            }
            JobCommand::Argv(argv) => {
                let (program, args) = argv.split_first()?;
                let mut command = Command::new(program);
                command.args(args);
                Some(command)
            }
        }
    }
}

/// Spawn every command; job ids follow slice order
///
/// Must be called from within a tokio runtime. When `queue_mode` is set
/// each job registers with `mask` for as long as it runs.
pub fn spawn_jobs(
    commands: &[JobCommand],
    mask: &MaskHandle,
    queue_mode: bool,
    events_tx: &mpsc::UnboundedSender<JobEvent>,
) -> JoinSet<()> {
    let mut tasks = JoinSet::new();
    for (id, command) in commands.iter().enumerate() {
        let guard = queue_mode.then(|| mask.begin());
        tasks.spawn(run_job(id, command.clone(), events_tx.clone(), guard));
    }
    tasks
}

async fn run_job(
    id: usize,
    command: JobCommand,
    events_tx: mpsc::UnboundedSender<JobEvent>,
    _guard: Option<LoadGuard>,
) {
    let spawned = command.build().map(|mut cmd| {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    });

    let mut child = match spawned {
        Some(Ok(child)) => child,
        Some(Err(e)) => {
            warn!(id, command = %command.display(), "failed to start: {e}");
            let _ = events_tx.send(JobEvent::Output {
                id,
                line: e.to_string(),
            });
            let _ = events_tx.send(JobEvent::Exited {
                id,
                status: JobStatus::Failed(SPAWN_FAILED_EXIT_CODE),
            });
            return;
        }
        None => {
            warn!(id, "empty command");
            let _ = events_tx.send(JobEvent::Exited {
                id,
                status: JobStatus::Failed(SPAWN_FAILED_EXIT_CODE),
            });
            return;
        }
    };

    debug!(id, command = %command.display(), "job started");

    let stdout = forward_lines(id, child.stdout.take(), events_tx.clone());
    let stderr = forward_lines(id, child.stderr.take(), events_tx.clone());
    let (status, (), ()) = tokio::join!(child.wait(), stdout, stderr);

    let status = match status {
        Ok(status) => JobStatus::from_exit(status),
        Err(e) => {
            warn!(id, "failed to wait for job: {e}");
            JobStatus::Failed(1)
        }
    };
    debug!(id, ?status, "job finished");
    let _ = events_tx.send(JobEvent::Exited { id, status });
}

async fn forward_lines<R>(id: usize, reader: Option<R>, events_tx: mpsc::UnboundedSender<JobEvent>)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if events_tx.send(JobEvent::Output { id, line }).is_err() {
            break;
        }
    }
}
