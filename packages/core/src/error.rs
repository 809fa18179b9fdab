use std::fmt;
use std::error::Error;

/// Unified application error for the binary wiring.
///
/// This ensures the startup layers (config, geofence registration)
/// fail in a predictable and debuggable way.
#[derive(Debug)]
pub enum AppError {
    Config(String),
    Geofence(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Geofence(msg) => write!(f, "Geofence error: {}", msg),
        }
    }
}

impl Error for AppError {}
