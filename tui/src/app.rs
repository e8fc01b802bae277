//! Main Application
//!
//! The App ties the pieces together:
//! - Event loop (keyboard, job reports, overlay views)
//! - JobSet for what the commands are doing
//! - MaskHandle for the overlay driver
//!
//! # Loop
//!
//! ```text
//!   terminal events ──┐
//!   job reports ──────┼──▶ select! ──▶ state update ──▶ draw
//!   mask views ───────┘
//! ```
//!
//! Nothing redraws on a timer: the overlay driver publishes a view each
//! time a character is typed or the cursor blinks, which is the only
//! animation on screen. The app exits once every job is finished and the
//! overlay has hidden again, or right away on Esc / Ctrl-C.

use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{Stream, StreamExt};
use ratatui::backend::Backend;
use ratatui::{Frame, Terminal};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use memeload_core::{MaskConfig, MaskDriver, MaskError, MaskHandle, MaskView};

use crate::jobs::{spawn_jobs, JobCommand, JobEvent, JobSet, ABORT_EXIT_CODE};
use crate::widgets::{JobPanel, MaskWidget};

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Did the user abort?
    aborted: bool,

    // === Jobs ===
    jobs: JobSet,
    tasks: JoinSet<()>,
    events_rx: mpsc::UnboundedReceiver<JobEvent>,

    // === Overlay ===
    mask: MaskHandle,
    view_rx: watch::Receiver<MaskView>,
    view: MaskView,
    /// Whether the driver is still publishing
    driver_alive: bool,
    queue_mode: bool,
}

impl App {
    /// Start the overlay driver and every command
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: MaskConfig, commands: &[JobCommand]) -> Self {
        Self::with_mask(MaskDriver::spawn(config.clone()), config.queue_mode, commands)
    }

    /// Start the commands against an existing driver
    pub fn with_mask(mask: MaskHandle, queue_mode: bool, commands: &[JobCommand]) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let jobs = JobSet::new(commands.iter().map(JobCommand::display));
        let tasks = spawn_jobs(commands, &mask, queue_mode, &events_tx);
        let view_rx = mask.subscribe();
        let view = view_rx.borrow().clone();

        info!(jobs = jobs.len(), queue_mode, "starting jobs");

        let app = Self {
            running: true,
            aborted: false,
            jobs,
            tasks,
            events_rx,
            mask,
            view_rx,
            view,
            driver_alive: true,
            queue_mode,
        };
        app.sync_flag();
        app
    }

    /// Main event loop; returns the exit code to report
    pub async fn run<B, S>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut events: S,
    ) -> anyhow::Result<i32>
    where
        B: Backend,
        S: Stream<Item = io::Result<Event>> + Unpin,
    {
        let mut events_open = true;
        self.check_done();
        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority so Esc is never starved
                maybe_event = events.next(), if events_open => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("terminal event error: {e}");
                        events_open = false;
                    }
                    None => events_open = false,
                },

                Some(event) = self.events_rx.recv() => self.apply_job_event(event),

                changed = self.view_rx.changed(), if self.driver_alive => match changed {
                    Ok(()) => self.view = self.view_rx.borrow_and_update().clone(),
                    Err(_) => {
                        warn!("overlay driver stopped early");
                        self.driver_alive = false;
                        self.view = MaskView::hidden(self.view.background.clone());
                    }
                },

                else => break,
            }

            self.check_done();
            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(self.exit_code())
    }

    /// Exit code for the process: abort wins, then the worst job status
    pub fn exit_code(&self) -> i32 {
        if self.aborted {
            ABORT_EXIT_CODE
        } else {
            self.jobs.exit_code()
        }
    }

    pub fn jobs(&self) -> &JobSet {
        &self.jobs
    }

    /// Latest overlay view
    pub fn view(&self) -> &MaskView {
        &self.view
    }

    /// Stop the overlay driver
    pub async fn shutdown(self) -> Result<(), MaskError> {
        self.mask.shutdown().await
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || ctrl_c {
            self.abort();
        }
    }

    fn abort(&mut self) {
        info!(outstanding = self.jobs.outstanding(), "aborted by user");
        self.tasks.abort_all();
        self.jobs.abort_running();
        self.aborted = true;
        self.running = false;
        self.sync_flag();
    }

    fn apply_job_event(&mut self, event: JobEvent) {
        if let JobEvent::Exited { id, status } = &event {
            debug!(id, ?status, "job exited");
        }
        self.jobs.apply(event);
        self.sync_flag();
    }

    /// Outside queue mode the signal is a plain "anything running" flag
    fn sync_flag(&self) {
        if self.queue_mode {
            return;
        }
        if let Err(e) = self.mask.set_signal(!self.jobs.all_finished()) {
            warn!("could not update overlay: {e}");
        }
    }

    fn check_done(&mut self) {
        let view_pending = self.driver_alive && self.view_rx.has_changed().unwrap_or(false);
        if self.jobs.all_finished() && !self.view.is_visible() && !view_pending {
            self.running = false;
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(JobPanel::new(&self.jobs), area);
        frame.render_widget(MaskWidget::new(&self.view), area);
    }
}
