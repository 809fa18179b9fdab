//! Geofence Monitoring Module
//!
//! This module decides when an arrival alert fires: it keeps the registry
//! of target geofences, classifies position samples against them, and
//! detects entry transitions exactly once per continuous dwell.

pub mod config;
pub mod dispatcher;
pub mod distance;
pub mod engine;
pub mod error;
pub mod provider;
pub mod registry;
pub mod types;

pub use config::{DuplicatePolicy, EngineConfig};
pub use engine::GeofenceEngine;
pub use error::{DispatchError, GeofenceError, PositionError};
pub use registry::GeofenceRegistry;
pub use types::*;
