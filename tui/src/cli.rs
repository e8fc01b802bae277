//! Command Line
//!
//! ```text
//! memeload [OPTIONS] -c <SHELL>...
//! memeload [OPTIONS] -- <PROGRAM> [ARGS]...
//! ```
//!
//! Overlay options start from `--config <FILE>` when given, otherwise from
//! the `MEMELOAD_*` environment; flags on the command line win over both.

use std::path::PathBuf;

use clap::Parser;

use memeload_core::{ConfigError, MaskConfig};

use crate::jobs::JobCommand;

/// Run commands behind a meme-typing loading overlay
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "memeload", version, about)]
pub struct Cli {
    /// Shell command to run (repeatable)
    #[arg(short = 'c', long = "command", value_name = "SHELL")]
    pub commands: Vec<String>,

    /// Count outstanding commands instead of a plain busy flag
    #[arg(long = "queue")]
    pub queue: bool,

    /// Always show the easter-egg message
    #[arg(long = "true-fan")]
    pub true_fan: bool,

    /// No text, fixed 100ms timings
    #[arg(long = "safe-mode")]
    pub safe_mode: bool,

    /// Minimum seconds the overlay stays up
    #[arg(long = "min-duration", value_name = "SECS")]
    pub min_duration: Option<f64>,

    /// Seconds to finish typing once loading is done
    #[arg(long = "boost-duration", value_name = "SECS")]
    pub boost_duration: Option<f64>,

    /// Overlay background (name, #rrggbb, rgb(), rgba())
    #[arg(long = "background", value_name = "COLOR")]
    pub background: Option<String>,

    /// TOML file with overlay options and messages
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Program and arguments to run directly
    #[arg(last = true, value_name = "PROGRAM")]
    pub argv: Vec<String>,
}

impl Cli {
    /// Commands in run order: `-c` entries first, then the trailing program
    pub fn job_commands(&self) -> Vec<JobCommand> {
        let mut jobs: Vec<JobCommand> = self
            .commands
            .iter()
            .cloned()
            .map(JobCommand::Shell)
            .collect();
        if !self.argv.is_empty() {
            jobs.push(JobCommand::Argv(self.argv.clone()));
        }
        jobs
    }

    /// Overlay configuration with command-line overrides applied
    pub fn mask_config(&self) -> Result<MaskConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => MaskConfig::load(path)?,
            None => MaskConfig::from_env(),
        };
        Ok(self.apply_overrides(base))
    }

    fn apply_overrides(&self, mut config: MaskConfig) -> MaskConfig {
        if self.queue {
            config = config.with_queue_mode(true);
        }
        if self.true_fan {
            config = config.with_easter_egg(true);
        }
        if self.safe_mode {
            config = config.with_safe_mode(true);
        }
        if let Some(secs) = self.min_duration {
            config = config.with_min_duration(secs);
        }
        if let Some(secs) = self.boost_duration {
            config = config.with_boost_duration(secs);
        }
        if let Some(background) = &self.background {
            config = config.with_background(background.clone());
        }
        config
    }
}
