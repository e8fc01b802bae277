//! Memeload TUI - Terminal surface for the loading overlay
//!
//! Runs commands and covers the terminal with a meme-typing mask while
//! they work, using `memeload-core` for all of the overlay's behavior.
//!
//! # Architecture
//!
//! - **App**: select! loop over terminal events, job reports and views
//! - **Jobs**: child processes, their output, and the final exit code
//! - **Widgets**: the mask overlay and the job panel beneath it
//! - **Theme**: palette and background-value parsing
//! - **Cli**: clap arguments layered over file/env config

pub mod app;
pub mod cli;
pub mod jobs;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use cli::Cli;
