//! Recording alert dispatcher for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::geofence::dispatcher::AlertDispatcher;
use crate::geofence::error::DispatchError;

/// Test double that records every dispatched geofence id.
#[derive(Debug, Default)]
pub struct MockAlertDispatcher {
    dispatched: Mutex<Vec<String>>,
    failure: Option<DispatchError>,
}

impl MockAlertDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every dispatch attempt fail with the given error. The attempt
    /// is still recorded.
    pub fn with_failure(mut self, error: DispatchError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Ids dispatched so far, in order.
    pub fn dispatched(&self) -> Vec<String> {
        self.dispatched
            .lock()
            .expect("dispatched mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl AlertDispatcher for MockAlertDispatcher {
    async fn dispatch(&self, geofence_id: &str) -> Result<(), DispatchError> {
        self.dispatched
            .lock()
            .expect("dispatched mutex poisoned")
            .push(geofence_id.to_string());
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn dispatcher_name(&self) -> &str {
        "mock"
    }
}
