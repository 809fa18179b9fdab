//! Scripted position source for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::geofence::error::PositionError;
use crate::geofence::provider::PositionSource;
use crate::geofence::types::Coordinates;

/// Test double that replays a scripted sequence of position results.
///
/// Each query consumes the next scripted result; the final one repeats
/// forever so scheduler-driven tests see a stable position after the
/// script plays out.
#[derive(Debug, Default)]
pub struct MockPositionSource {
    script: Mutex<VecDeque<Result<Coordinates, PositionError>>>,
}

impl MockPositionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(self, coordinates: Coordinates) -> Self {
        self.push(Ok(coordinates));
        self
    }

    pub fn with_positions<I>(self, positions: I) -> Self
    where
        I: IntoIterator<Item = Coordinates>,
    {
        for coordinates in positions {
            self.push(Ok(coordinates));
        }
        self
    }

    pub fn with_error(self, error: PositionError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, result: Result<Coordinates, PositionError>) {
        self.script
            .lock()
            .expect("position script mutex poisoned")
            .push_back(result);
    }
}

#[async_trait]
impl PositionSource for MockPositionSource {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        let mut script = self.script.lock().expect("position script mutex poisoned");
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        match next {
            Some(result) => result,
            None => Err(PositionError::unavailable("mock position script is empty")),
        }
    }

    fn source_name(&self) -> &str {
        "mock-position"
    }
}
