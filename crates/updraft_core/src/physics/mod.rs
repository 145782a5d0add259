//! # Physics Seam
//!
//! The lifecycle core consumes a physics/world service for velocity
//! integration, horizontal wrap and player overlap detection. Overlaps
//! carry generation-checked handles so an overlap reported for an entity
//! that was retired earlier in the frame is recognised as stale.

pub mod arcade;

pub use arcade::ArcadePhysics;

use crate::entity::{EntityHandle, EntityStore};
use crate::foundation::math::{Circle, Vec2, WorldBounds};

/// The player as seen by physics and the collision resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    /// World position (upward is negative `y`)
    pub position: Vec2,
    /// Velocity in world units per second
    pub velocity: Vec2,
    /// Collider radius
    pub radius: f32,
}

impl PlayerBody {
    /// Create a player at rest
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec2::zeros(),
            radius,
        }
    }

    /// World-space collider
    pub fn collider(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }
}

/// Player/entity contact reported by a physics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Entity touched, at the generation it had when the overlap was found
    pub entity: EntityHandle,
    /// How far the colliders interpenetrate
    pub depth: f32,
}

/// Physics/world service consumed by the lifecycle core
pub trait PhysicsService {
    /// Playfield bounds
    fn world_bounds(&self) -> WorldBounds;

    /// Integrate one frame and report player overlaps with collidable entities
    fn step(&mut self, store: &mut EntityStore, player: &mut PlayerBody, dt: f32) -> Vec<Overlap>;
}
