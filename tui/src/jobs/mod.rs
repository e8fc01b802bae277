//! Job Tracking
//!
//! The commands `memeload` runs while the overlay is up. Each job reports
//! output lines and its exit through a channel; [`JobSet`] folds those
//! reports into what the panel shows and the final exit code.

mod runner;
mod state;

pub use runner::{spawn_jobs, JobCommand};
pub use state::{Job, JobEvent, JobSet, JobStatus, ABORT_EXIT_CODE};
