//! Configuration for the geofence engine

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a [`GeofenceEngine`](crate::geofence::GeofenceEngine).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Interval between evaluation cycles while the registry is non-empty.
    pub poll_interval: Duration,
    /// Maximum time to wait for one position query. A query that exceeds
    /// this is treated as a failed query and the cycle is skipped.
    pub position_timeout: Duration,
    /// How `add` behaves when the id is already registered.
    pub duplicate_policy: DuplicatePolicy,
}

/// Duplicate-id handling on `add`.
///
/// The two policies are never mixed: an engine either rejects duplicates
/// or replaces them, as configured up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Fail the add with `GeofenceError::DuplicateId`. The default:
    /// silently overwriting would silently reset an unrelated alarm's
    /// entry state.
    Reject,
    /// Replace the existing entry and reset its inside flag, so the
    /// re-added geofence can re-trigger even for an unchanged position.
    Replace,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            position_timeout: Duration::from_secs(5),
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }
}
