//! Geofence Engine - central orchestrator for arrival monitoring

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::time;

use crate::geofence::config::EngineConfig;
use crate::geofence::dispatcher::AlertDispatcher;
use crate::geofence::distance;
use crate::geofence::error::{GeofenceError, PositionError};
use crate::geofence::provider::PositionSource;
use crate::geofence::registry::GeofenceRegistry;
use crate::geofence::types::{CycleSummary, Geofence, PositionSample};
use crate::metrics::AppMetrics;
use crate::scheduler::MonitoringScheduler;

/// Everything one evaluation cycle needs, shared with the scheduler task.
struct EngineCore {
    config: EngineConfig,
    registry: RwLock<GeofenceRegistry>,
    position_source: Arc<dyn PositionSource + Send + Sync>,
    dispatcher: Arc<dyn AlertDispatcher + Send + Sync>,
    metrics: Arc<AppMetrics>,
    /// Serializes evaluation cycles across a scheduler stop/start and
    /// manually driven cycles.
    cycle_lock: Mutex<()>,
}

/// Central geofence engine owning the registry, the per-geofence entry
/// state, and the monitoring scheduler.
///
/// Explicitly constructed and explicitly owned: create one per
/// application (or one per test). There is no process-wide instance, and
/// nothing survives the engine being dropped.
pub struct GeofenceEngine {
    core: Arc<EngineCore>,
    scheduler: Mutex<MonitoringScheduler>,
}

impl GeofenceEngine {
    pub fn new(
        config: EngineConfig,
        position_source: Arc<dyn PositionSource + Send + Sync>,
        dispatcher: Arc<dyn AlertDispatcher + Send + Sync>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        tracing::debug!(
            "Geofence engine created (source: {}, dispatcher: {})",
            position_source.source_name(),
            dispatcher.dispatcher_name(),
        );
        Self {
            core: Arc::new(EngineCore {
                config,
                registry: RwLock::new(GeofenceRegistry::new()),
                position_source,
                dispatcher,
                metrics,
                cycle_lock: Mutex::new(()),
            }),
            scheduler: Mutex::new(MonitoringScheduler::new()),
        }
    }

    /// Register a geofence. Duplicate ids follow the configured
    /// [`DuplicatePolicy`](crate::geofence::DuplicatePolicy). Adding the
    /// first geofence starts the monitoring scheduler.
    pub async fn add_geofence(&self, geofence: Geofence) -> Result<(), GeofenceError> {
        let id = geofence.id.clone();
        let was_empty = {
            let mut registry = self.core.registry.write().await;
            let was_empty = registry.is_empty();
            registry.add(geofence, self.core.config.duplicate_policy)?;
            self.core.metrics.geofences_active.set(registry.len() as f64);
            was_empty
        };

        tracing::info!("Geofence '{}' registered", id);

        if was_empty {
            let core = self.core.clone();
            self.scheduler
                .lock()
                .await
                .start(self.core.config.poll_interval, move || {
                    let core = core.clone();
                    async move {
                        core.evaluate_once().await;
                    }
                });
        }

        Ok(())
    }

    /// Remove a geofence and its entry state. Removing an absent id is a
    /// no-op. Removing the last geofence stops the monitoring scheduler.
    pub async fn remove_geofence(&self, id: &str) {
        let now_empty = {
            let mut registry = self.core.registry.write().await;
            if registry.remove(id) {
                tracing::info!("Geofence '{}' removed", id);
            }
            self.core.metrics.geofences_active.set(registry.len() as f64);
            registry.is_empty()
        };

        if now_empty {
            self.scheduler.lock().await.stop();
        }
    }

    /// Snapshot of all registered geofences in insertion order.
    pub async fn list_geofences(&self) -> Vec<Geofence> {
        self.core.registry.read().await.snapshot()
    }

    /// Whether the monitoring scheduler is currently ticking.
    pub async fn is_monitoring(&self) -> bool {
        self.scheduler.lock().await.is_running()
    }

    /// Stop the monitoring scheduler regardless of registry occupancy.
    /// Idempotent; registered geofences stay registered.
    pub async fn shutdown(&self) {
        self.scheduler.lock().await.stop();
    }

    /// Run a single evaluation cycle. Normally driven by the scheduler;
    /// extracted for testability.
    ///
    /// Returns `None` when the cycle was skipped (no geofences, or the
    /// position query failed), in which case no state changed and nothing
    /// was dispatched.
    pub async fn evaluate_once(&self) -> Option<CycleSummary> {
        self.core.evaluate_once().await
    }
}

impl EngineCore {
    async fn evaluate_once(&self) -> Option<CycleSummary> {
        let _cycle = self.cycle_lock.lock().await;

        {
            let registry = self.registry.read().await;
            if registry.is_empty() {
                tracing::debug!("No geofences registered, nothing to evaluate");
                return None;
            }
        }

        self.metrics.evaluation_cycles_total.inc();

        // One position query per cycle, bounded by the configured timeout.
        // Any failure skips the whole cycle: no flag changes, no alerts.
        let query = self.position_source.current_position();
        let coordinates = match time::timeout(self.config.position_timeout, query).await {
            Ok(Ok(coordinates)) => coordinates,
            Ok(Err(err)) => {
                self.metrics.position_errors_total.inc();
                tracing::error!("Position query failed, skipping cycle: {}", err);
                return None;
            }
            Err(_) => {
                self.metrics.position_errors_total.inc();
                tracing::error!(
                    "Position query failed, skipping cycle: {}",
                    PositionError::TimedOut
                );
                return None;
            }
        };

        let sample = PositionSample {
            coordinates,
            timestamp: Utc::now(),
        };

        // Classify every geofence and apply entry/exit transitions in one
        // write-lock section, so a concurrent add/remove never observes a
        // half-applied cycle. Per geofence: OUTSIDE -> INSIDE fires the
        // alert, INSIDE -> OUTSIDE re-arms silently, self-transitions are
        // silent.
        let mut entries_detected = Vec::new();
        let geofences_evaluated;
        {
            let mut registry = self.registry.write().await;
            geofences_evaluated = registry.len();
            for entry in registry.entries_mut() {
                let inside = distance::is_inside(coordinates, &entry.geofence);
                if inside && !entry.inside {
                    entry.inside = true;
                    entries_detected.push(entry.geofence.id.clone());
                } else if !inside {
                    entry.inside = false;
                }
            }
        }

        // Dispatch outside the lock; a slow or failing presenter must not
        // block registry access. Failures are logged and counted, never
        // retried, and the entry state stands.
        for id in &entries_detected {
            tracing::info!("Entered geofence '{}', dispatching arrival alert", id);
            self.metrics.alerts_dispatched_total.inc();
            if let Err(err) = self.dispatcher.dispatch(id).await {
                self.metrics.dispatch_errors_total.inc();
                tracing::error!("Alert dispatch for '{}' failed: {}", id, err);
            }
        }

        tracing::debug!(
            "Evaluation cycle complete: {} geofences, {} entries",
            geofences_evaluated,
            entries_detected.len()
        );

        Some(CycleSummary {
            sample,
            geofences_evaluated,
            entries_detected,
        })
    }
}
