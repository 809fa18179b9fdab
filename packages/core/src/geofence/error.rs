//! Error types for geofence monitoring

use thiserror::Error;

/// Errors returned by registry operations.
#[derive(Error, Debug)]
pub enum GeofenceError {
    #[error("Geofence id '{id}' is already registered")]
    DuplicateId { id: String },

    #[error("Geofence radius must be a positive number of meters, got {radius_m}")]
    InvalidRadius { radius_m: f64 },

    #[error("Coordinates out of range: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// Errors from position sources.
///
/// Any of these makes the engine skip the current evaluation cycle; none
/// of them stops the scheduler.
#[derive(Error, Debug, Clone)]
pub enum PositionError {
    #[error("Position source unavailable: {message}")]
    Unavailable { message: String },

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position query timed out")]
    TimedOut,

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Data format error: {message}")]
    FormatError { message: String },
}

/// Errors from alert dispatchers.
///
/// Logged and counted, never retried: the engine guarantees an attempted
/// alert per entry, not a delivered one.
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    #[error("Alert delivery failed: {message}")]
    DeliveryFailed { message: String },
}

impl PositionError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    pub fn format_error(message: impl Into<String>) -> Self {
        Self::FormatError { message: message.into() }
    }
}

impl DispatchError {
    pub fn delivery_failed(message: impl Into<String>) -> Self {
        Self::DeliveryFailed { message: message.into() }
    }
}
