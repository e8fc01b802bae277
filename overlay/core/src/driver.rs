//! Async Driver
//!
//! Runs a [`LoadingMask`] inside a tokio task so hosts don't have to poll
//! deadlines themselves. Inputs and output are `watch` channels: the host
//! pushes signal/config updates, the driver publishes a fresh [`MaskView`]
//! whenever what's on screen changes.
//!
//! ```text
//!   host ──signal──┐                       ┌──▶ MaskView (watch)
//!   host ──config──┼──▶ driver task ───────┤
//!                  │    (LoadingMask +     │
//!   LoadGuard ─────┘     sleep_until)      └──▶ surfaces
//! ```
//!
//! Dropping the [`MaskHandle`] aborts the task, which cancels every pending
//! timer with it.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::MaskConfig;
use crate::error::MaskError;
use crate::machine::{LoadingMask, PhaseKind};
use crate::messages::{MessagePicker, RandomPicker};
use crate::signal::LoadingSignal;
use crate::view::MaskView;

/// Spawns overlay driver tasks
pub struct MaskDriver;

impl MaskDriver {
    /// Spawn a driver with random message selection
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: MaskConfig) -> MaskHandle {
        Self::spawn_with_picker(config, RandomPicker)
    }

    /// Spawn a driver with an injected message picker
    pub fn spawn_with_picker<P>(config: MaskConfig, picker: P) -> MaskHandle
    where
        P: MessagePicker + Send + 'static,
    {
        let background = config.background_color.clone();
        let (signal_tx, signal_rx) = watch::channel(LoadingSignal::IDLE);
        let (config_tx, config_rx) = watch::channel(config.clone());
        let (view_tx, view_rx) = watch::channel(MaskView::hidden(background));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let mask = LoadingMask::with_picker(config, picker);
        let task = tokio::spawn(run(mask, signal_rx, config_rx, view_tx, shutdown_rx));

        MaskHandle {
            signal_tx: Arc::new(signal_tx),
            config_tx,
            view_rx,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

/// Host-side handle to a running driver
pub struct MaskHandle {
    signal_tx: Arc<watch::Sender<LoadingSignal>>,
    config_tx: watch::Sender<MaskConfig>,
    view_rx: watch::Receiver<MaskView>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MaskHandle {
    /// Replace the signal value
    pub fn set_signal(&self, signal: impl Into<LoadingSignal>) -> Result<(), MaskError> {
        self.signal_tx
            .send(signal.into())
            .map_err(|_| MaskError::DriverClosed)
    }

    /// Current signal value
    pub fn signal(&self) -> LoadingSignal {
        *self.signal_tx.borrow()
    }

    /// Replace the configuration
    ///
    /// An equal config is not forwarded, so hosts may re-supply it freely.
    pub fn set_config(&self, config: MaskConfig) -> Result<(), MaskError> {
        if self.config_tx.is_closed() {
            return Err(MaskError::DriverClosed);
        }
        self.config_tx.send_if_modified(|current| {
            if *current == config {
                false
            } else {
                *current = config;
                true
            }
        });
        Ok(())
    }

    /// Latest published view
    pub fn view(&self) -> MaskView {
        self.view_rx.borrow().clone()
    }

    /// Independent receiver for another surface
    pub fn subscribe(&self) -> watch::Receiver<MaskView> {
        self.view_rx.clone()
    }

    /// Wait for the next published view
    pub async fn changed(&mut self) -> Result<MaskView, MaskError> {
        self.view_rx
            .changed()
            .await
            .map_err(|_| MaskError::DriverClosed)?;
        Ok(self.view_rx.borrow_and_update().clone())
    }

    /// Wait until the mask has hidden again
    pub async fn wait_hidden(&mut self) -> Result<(), MaskError> {
        self.view_rx
            .wait_for(|view| view.phase == PhaseKind::Off)
            .await
            .map(|_| ())
            .map_err(|_| MaskError::DriverClosed)
    }

    /// Register one outstanding request
    ///
    /// Bumps the counter signal now and drops it back when the guard goes
    /// out of scope. Intended for queue mode, where the mask stays up
    /// while any guard is alive.
    ///
    /// The driver only sees the latest counter value, so a guard taken and
    /// dropped before the driver next runs never shows the mask.
    /// Short-lived requests are batched away, the same as two signal
    /// updates landing between polls.
    pub fn begin(&self) -> LoadGuard {
        self.signal_tx.send_modify(|s| *s = s.incremented());
        LoadGuard {
            signal_tx: Arc::clone(&self.signal_tx),
        }
    }

    /// Stop the driver, hiding the mask and cancelling its timers
    pub async fn shutdown(mut self) -> Result<(), MaskError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.task.take() {
            Some(task) => task.await.map_err(|_| MaskError::DriverClosed),
            None => Ok(()),
        }
    }
}

impl Drop for MaskHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// RAII ticket for one outstanding request (see [`MaskHandle::begin`])
#[must_use = "the request is considered finished as soon as the guard is dropped"]
pub struct LoadGuard {
    signal_tx: Arc<watch::Sender<LoadingSignal>>,
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        self.signal_tx.send_modify(|s| *s = s.decremented());
    }
}

async fn run<P: MessagePicker>(
    mut mask: LoadingMask<P>,
    mut signal_rx: watch::Receiver<LoadingSignal>,
    mut config_rx: watch::Receiver<MaskConfig>,
    view_tx: watch::Sender<MaskView>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    info!("overlay driver started");

    loop {
        let deadline = mask.next_deadline();

        tokio::select! {
            _ = &mut shutdown_rx => break,

            changed = signal_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let signal = *signal_rx.borrow_and_update();
                debug!(?signal, "signal updated");
                let at = now();
                mask.advance(at);
                mask.set_signal(signal, at);
            }

            changed = config_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let config = config_rx.borrow_and_update().clone();
                let at = now();
                mask.advance(at);
                mask.set_config(config, at);
            }

            () = wait_deadline(deadline) => {
                mask.advance(now());
            }
        }

        publish(&view_tx, mask.view());
    }

    mask.shutdown();
    publish(&view_tx, mask.view());
    info!("overlay driver stopped");
}

/// Runtime clock as a std `Instant`, so paused test time flows through
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn publish(view_tx: &watch::Sender<MaskView>, view: MaskView) {
    view_tx.send_if_modified(|current| {
        if *current == view {
            false
        } else {
            *current = view;
            true
        }
    });
}
