//! Position Source Interface
//!
//! Abstraction layer over whatever supplies the device's current
//! coordinates: an OS location service, a companion-device HTTP endpoint,
//! or a test double. A platform with a push-based native geofencing
//! service would also be wrapped here, feeding the same engine.

use async_trait::async_trait;

use crate::geofence::error::PositionError;
use crate::geofence::types::Coordinates;

/// Trait for position sources to keep the engine source-independent.
#[async_trait]
pub trait PositionSource {
    /// Fetch the current position. The engine bounds each call with its
    /// configured timeout; an elapsed timeout counts as a failed query.
    async fn current_position(&self) -> Result<Coordinates, PositionError>;

    /// Name of this source for logging/debugging.
    fn source_name(&self) -> &str;

    /// Check if the source is currently available.
    async fn health_check(&self) -> Result<(), PositionError> {
        // Default implementation - just try to fetch a position
        self.current_position().await.map(|_| ())
    }
}
