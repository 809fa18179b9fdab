//! Monitoring scheduler.
//!
//! Drives the recurring evaluation loop: while the registry is non-empty
//! the scheduler ticks at a fixed interval and runs one evaluation cycle
//! per tick. Cycles run one at a time on a single task; a tick that comes
//! due while a cycle is still in flight is skipped, never queued.
//!
//! The engine arms and disarms the scheduler from its add/remove side
//! effects, so callers never start it by hand in normal operation.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Handle to the recurring evaluation task. Present-and-running iff
/// monitoring is active.
#[derive(Debug, Default)]
pub struct MonitoringScheduler {
    running: Option<(JoinHandle<()>, watch::Sender<bool>)>,
}

impl MonitoringScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the evaluation task is currently live.
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map(|(handle, _)| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Spawn the recurring evaluation task. Idempotent: calling while
    /// already running has no effect.
    ///
    /// `cycle` is invoked once per tick, starting immediately. The first
    /// tick fires on start so a freshly armed alarm evaluates without
    /// waiting a full interval.
    pub fn start<F, Fut>(&mut self, poll_interval: Duration, mut cycle: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_running() {
            tracing::debug!("Monitoring scheduler already running");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                "Geofence monitoring started (interval: {}s)",
                poll_interval.as_secs()
            );

            loop {
                tokio::select! {
                    // Checked first so a stop request wins over a due tick.
                    biased;

                    _ = shutdown_rx.changed() => {
                        break;
                    }

                    _ = interval.tick() => {
                        cycle().await;
                    }
                }
            }

            tracing::info!("Geofence monitoring stopped");
        });

        self.running = Some((handle, shutdown_tx));
    }

    /// Signal the evaluation task to stop. Idempotent. An in-flight cycle
    /// is allowed to complete; no further ticks fire afterwards.
    pub fn stop(&mut self) {
        if let Some((_handle, shutdown_tx)) = self.running.take() {
            let _ = shutdown_tx.send(true);
        }
    }
}
