//! Core data types for geofence monitoring

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A circular trigger region around a destination.
///
/// Immutable once created; identity is `id`. The registry never holds a
/// geofence the caller has not explicitly added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub id: String,
    pub center: Coordinates,
    /// Trigger radius in meters; strictly positive.
    pub radius_m: f64,
}

/// One position reading from the position source.
///
/// Transient: only the most recent sample matters for evaluation, nothing
/// is persisted across cycles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionSample {
    pub coordinates: Coordinates,
    pub timestamp: DateTime<Utc>,
}

/// Result of one evaluation cycle.
#[derive(Debug, Clone)]
pub struct CycleSummary {
    pub sample: PositionSample,
    pub geofences_evaluated: usize,
    /// Ids of geofences whose entry transition fired this cycle.
    pub entries_detected: Vec<String>,
}
