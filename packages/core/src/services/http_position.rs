use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::geofence::error::PositionError;
use crate::geofence::provider::PositionSource;
use crate::geofence::types::Coordinates;

/// Position source backed by a companion-device HTTP endpoint.
///
/// Expects `GET {base_url}/position` to return
/// `{"latitude": <degrees>, "longitude": <degrees>}`.
#[derive(Clone)]
pub struct HttpPositionSource {
    base_url: String,
    http: Client,
}

impl HttpPositionSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct PositionResponse {
    latitude: f64,
    longitude: f64,
}

#[async_trait]
impl PositionSource for HttpPositionSource {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        let url = format!("{}/position", self.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| PositionError::network_error(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PositionError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(PositionError::unavailable(format!(
                "position endpoint returned HTTP {}",
                status
            )));
        }

        let body = response
            .json::<PositionResponse>()
            .await
            .map_err(|err| PositionError::format_error(err.to_string()))?;

        Ok(Coordinates::new(body.latitude, body.longitude))
    }

    fn source_name(&self) -> &str {
        "http-position"
    }
}
