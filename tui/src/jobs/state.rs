//! Job State
//!
//! Pure bookkeeping: no processes are touched here.

use std::process::ExitStatus;
use std::time::{Duration, Instant};

/// Exit code reported when the user aborts (matches a shell's Ctrl-C)
pub const ABORT_EXIT_CODE: i32 = 130;

/// Status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Succeeded,
    Failed(i32),
    Aborted,
}

impl JobStatus {
    /// Map a process exit status (killed by signal counts as code 1)
    pub fn from_exit(status: ExitStatus) -> Self {
        if status.success() {
            JobStatus::Succeeded
        } else {
            JobStatus::Failed(status.code().unwrap_or(1))
        }
    }

    /// Get a status icon
    pub fn icon(&self) -> &'static str {
        match self {
            JobStatus::Running => "⏳",
            JobStatus::Succeeded => "✅",
            JobStatus::Failed(_) => "❌",
            JobStatus::Aborted => "⛔",
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }

    /// Process-style exit code (0 while running)
    pub fn exit_code(&self) -> i32 {
        match self {
            JobStatus::Running | JobStatus::Succeeded => 0,
            JobStatus::Failed(code) => *code,
            JobStatus::Aborted => ABORT_EXIT_CODE,
        }
    }
}

/// Report from a running job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// One line of stdout or stderr
    Output { id: usize, line: String },
    /// The process ended (or never started)
    Exited { id: usize, status: JobStatus },
}

/// One command being run
#[derive(Debug, Clone)]
pub struct Job {
    pub id: usize,
    /// Command as typed, for display
    pub command: String,
    pub status: JobStatus,
    /// Most recent output line
    pub last_line: Option<String>,
    started_at: Instant,
    elapsed: Option<Duration>,
}

impl Job {
    fn new(id: usize, command: String) -> Self {
        Self {
            id,
            command,
            status: JobStatus::Running,
            last_line: None,
            started_at: Instant::now(),
            elapsed: None,
        }
    }

    /// Wall time the job ran for, once finished
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

/// All jobs of one `memeload` invocation
#[derive(Debug, Clone, Default)]
pub struct JobSet {
    jobs: Vec<Job>,
}

impl JobSet {
    /// Track one job per command, ids in order
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let jobs = commands
            .into_iter()
            .enumerate()
            .map(|(id, command)| Job::new(id, command.into()))
            .collect();
        Self { jobs }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Jobs still running
    pub fn outstanding(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| !job.status.is_finished())
            .count()
    }

    pub fn all_finished(&self) -> bool {
        self.outstanding() == 0
    }

    /// Fold one report into the set; unknown ids are ignored
    pub fn apply(&mut self, event: JobEvent) {
        match event {
            JobEvent::Output { id, line } => {
                if let Some(job) = self.jobs.get_mut(id) {
                    job.last_line = Some(line);
                }
            }
            JobEvent::Exited { id, status } => {
                if let Some(job) = self.jobs.get_mut(id) {
                    if !job.status.is_finished() {
                        job.status = status;
                        job.elapsed = Some(job.started_at.elapsed());
                    }
                }
            }
        }
    }

    /// Mark every running job as aborted
    pub fn abort_running(&mut self) {
        for job in &mut self.jobs {
            if !job.status.is_finished() {
                job.status = JobStatus::Aborted;
                job.elapsed = Some(job.started_at.elapsed());
            }
        }
    }

    /// Worst exit code across jobs (highest non-zero code wins)
    pub fn exit_code(&self) -> i32 {
        self.jobs
            .iter()
            .map(|job| job.status.exit_code())
            .max()
            .unwrap_or(0)
    }
}
