use async_trait::async_trait;

use crate::geofence::dispatcher::AlertDispatcher;
use crate::geofence::error::DispatchError;

/// Dispatcher that presents arrival alerts as log lines.
///
/// The default presenter for headless runs; a platform build would swap
/// in a dispatcher that raises a local notification with haptics.
#[derive(Debug, Default)]
pub struct LogAlertDispatcher;

impl LogAlertDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertDispatcher for LogAlertDispatcher {
    async fn dispatch(&self, geofence_id: &str) -> Result<(), DispatchError> {
        tracing::warn!("ARRIVAL: entered geofence '{}', wake up!", geofence_id);
        Ok(())
    }

    fn dispatcher_name(&self) -> &str {
        "log"
    }
}
