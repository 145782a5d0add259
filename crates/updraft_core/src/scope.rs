//! Mutable view over the lifecycle collections
//!
//! Spawning, reclamation and collision all need the pool, the age map and
//! the animation service at once. The manager owns them; a
//! [`LifecycleScope`] borrows them together for the duration of one
//! operation.

use crate::age::AgeTracker;
use crate::animation::AnimationService;
use crate::entity::{EntityId, EntityStore};
use crate::pool::{EntityPool, ReleaseOutcome};
use crate::zone::ZoneClassifier;

/// Borrowed lifecycle state for one operation
pub struct LifecycleScope<'a> {
    /// Entity pool and arena
    pub pool: &'a mut EntityPool,
    /// Creation-day map
    pub ages: &'a mut AgeTracker,
    /// Animation service
    pub animation: &'a mut dyn AnimationService,
    /// Zone table
    pub zones: &'a ZoneClassifier,
    /// World `y` of the ground
    pub ground_reference: f32,
    /// Current in-game day
    pub day: u32,
}

impl LifecycleScope<'_> {
    /// Take an active entity out of the world: forget its age and pool it
    pub fn retire(&mut self, id: EntityId) -> ReleaseOutcome {
        self.ages.remove(id);
        self.pool.release(id, &mut *self.animation)
    }

    /// Destroy an entity outright (age purge)
    pub fn destroy(&mut self, id: EntityId) -> bool {
        self.ages.remove(id);
        self.pool.destroy(id, &mut *self.animation)
    }

    /// Entity arena
    pub fn store(&self) -> &EntityStore {
        self.pool.store()
    }

    /// World `y` for an altitude
    pub fn altitude_to_y(&self, altitude: f32) -> f32 {
        self.ground_reference - altitude
    }
}
