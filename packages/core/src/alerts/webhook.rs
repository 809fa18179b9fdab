//! Webhook alert delivery.
//!
//! Dispatches an HTTP POST notification to a configured webhook target
//! when a geofence entry transition fires. Useful when the alarm runs
//! headless and the actual wake-up happens on another device (a phone
//! notification relay, a smart speaker bridge).

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;

use crate::geofence::dispatcher::AlertDispatcher;
use crate::geofence::error::DispatchError;

/// Payload describing a triggered arrival alert.
#[derive(Debug, Clone, Serialize)]
pub struct AlertPayload {
    /// Id of the geofence whose entry transition fired.
    pub geofence_id: String,
    /// RFC 3339 timestamp of the dispatch.
    pub triggered_at: String,
}

/// Dispatcher that POSTs [`AlertPayload`] JSON to a webhook URL.
pub struct WebhookAlertDispatcher {
    webhook_url: String,
    http: Client,
}

impl WebhookAlertDispatcher {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            http: Client::new(),
        }
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl AlertDispatcher for WebhookAlertDispatcher {
    async fn dispatch(&self, geofence_id: &str) -> Result<(), DispatchError> {
        let payload = AlertPayload {
            geofence_id: geofence_id.to_string(),
            triggered_at: Utc::now().to_rfc3339(),
        };

        let response = self
            .http
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| DispatchError::delivery_failed(err.to_string()))?;

        if !response.status().is_success() {
            return Err(DispatchError::delivery_failed(format!(
                "webhook returned HTTP {}",
                response.status()
            )));
        }

        tracing::debug!(
            "Arrival alert for '{}' delivered to {}",
            payload.geofence_id,
            self.webhook_url
        );

        Ok(())
    }

    fn dispatcher_name(&self) -> &str {
        "webhook"
    }
}
