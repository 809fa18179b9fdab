//! In-memory geofence registry.
//!
//! `GeofenceRegistry` holds the active target geofences in insertion order,
//! keyed by id (unique at rest), together with the per-geofence
//! last-known-inside flag the engine uses to detect entry transitions.
//! The flag is created alongside the entry and removed with it.
//!
//! The registry carries no locking of its own; callers wrap it in
//! `Arc<RwLock<GeofenceRegistry>>` so registry mutations issued from a
//! caller context (a UI interaction, a CLI) serialize with the evaluation
//! cycle reading and writing it.

use crate::geofence::config::DuplicatePolicy;
use crate::geofence::error::GeofenceError;
use crate::geofence::types::Geofence;

/// A registered geofence plus its entry-transition state.
#[derive(Debug, Clone)]
pub struct GeofenceEntry {
    pub geofence: Geofence,
    /// Whether the last evaluated sample fell inside this geofence.
    /// Starts false so the first inside sample fires an entry transition.
    pub(crate) inside: bool,
}

/// Ordered, id-unique store of active geofences.
#[derive(Debug, Default)]
pub struct GeofenceRegistry {
    entries: Vec<GeofenceEntry>,
}

impl GeofenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a geofence. Under [`DuplicatePolicy::Reject`] an already
    /// registered id is an error; under [`DuplicatePolicy::Replace`] the
    /// existing entry is replaced in place. Either way the entry's inside
    /// flag ends up false.
    pub fn add(
        &mut self,
        geofence: Geofence,
        policy: DuplicatePolicy,
    ) -> Result<(), GeofenceError> {
        if !geofence.radius_m.is_finite() || geofence.radius_m <= 0.0 {
            return Err(GeofenceError::InvalidRadius {
                radius_m: geofence.radius_m,
            });
        }
        let center = geofence.center;
        if !center.latitude.is_finite()
            || !center.longitude.is_finite()
            || center.latitude.abs() > 90.0
            || center.longitude.abs() > 180.0
        {
            return Err(GeofenceError::InvalidCoordinates {
                latitude: center.latitude,
                longitude: center.longitude,
            });
        }

        let entry = GeofenceEntry {
            geofence,
            inside: false,
        };

        match self.position_of(&entry.geofence.id) {
            Some(index) => match policy {
                DuplicatePolicy::Reject => Err(GeofenceError::DuplicateId {
                    id: entry.geofence.id,
                }),
                DuplicatePolicy::Replace => {
                    self.entries[index] = entry;
                    Ok(())
                }
            },
            None => {
                self.entries.push(entry);
                Ok(())
            }
        }
    }

    /// Remove the entry with this id, flag included. Returns whether an
    /// entry was removed; removing an absent id is a no-op, not an error.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copy of all geofences in insertion order. Mutating the returned
    /// vector does not affect the registry.
    pub fn snapshot(&self) -> Vec<Geofence> {
        self.entries.iter().map(|e| e.geofence.clone()).collect()
    }

    /// Last-known-inside flag for an id, if registered.
    pub fn is_inside(&self, id: &str) -> Option<bool> {
        self.position_of(id).map(|i| self.entries[i].inside)
    }

    /// Number of registered geofences.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no geofence is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all geofences and their flags.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Mutable view of the entries for one evaluation cycle's write-back.
    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut GeofenceEntry> {
        self.entries.iter_mut()
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.geofence.id == id)
    }
}
