//! Alert Dispatcher Interface
//!
//! The engine decides *when* an arrival alert fires; the dispatcher owns
//! *how* it is presented (notification, haptics, webhook, log line) and
//! any further lifecycle. The engine calls it at most once per detected
//! entry transition and never retries.

use async_trait::async_trait;

use crate::geofence::error::DispatchError;

/// Trait for alert presenters.
#[async_trait]
pub trait AlertDispatcher {
    /// Present an alert for the triggered geofence. A failure here is
    /// reported by the engine but does not roll back the entry
    /// transition.
    async fn dispatch(&self, geofence_id: &str) -> Result<(), DispatchError>;

    /// Name of this dispatcher for logging/debugging.
    fn dispatcher_name(&self) -> &str;
}
