//! # Animation Seam
//!
//! The lifecycle core never animates anything itself; it registers
//! recurring motions and one-shot fades with an [`AnimationService`] and
//! tears them down when entities leave the world. [`MotionTimeline`] is the
//! in-crate implementation used by the demo and tests.

pub mod timeline;

pub use timeline::{MotionTimeline, TimelineStats};

use crate::entity::{EntityHandle, EntityId, EntityStore};

/// Handle to a motion registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MotionId(pub(crate) u64);

/// Kinds of motion the core asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Endless vertical oscillation around the spawn position
    Bob {
        /// Peak offset in world units
        amplitude: f32,
        /// Seconds per cycle
        period: f32,
    },
    /// Endless horizontal oscillation layered on top of drift
    Sway {
        /// Peak offset in world units
        amplitude: f32,
        /// Seconds per cycle
        period: f32,
    },
    /// One-shot alpha ramp from 0 to 1
    FadeIn {
        /// Seconds until fully opaque
        duration: f32,
    },
}

/// Timeline/tween engine consumed by the lifecycle core
pub trait AnimationService {
    /// Register a motion against a specific activation of an entity
    fn start(&mut self, target: EntityHandle, motion: Motion) -> MotionId;

    /// Cancel one registration; returns whether it was still running
    fn cancel(&mut self, id: MotionId) -> bool;

    /// Cancel every registration targeting `entity`, whatever its generation
    fn kill_tweens_of(&mut self, entity: EntityId) -> usize;

    /// Cancel every registration
    fn kill_all(&mut self) -> usize;

    /// Apply one frame of motion to the entities in `store`
    fn advance(&mut self, store: &mut EntityStore, dt: f32);

    /// Number of registrations targeting `entity`
    fn motions_for(&self, entity: EntityId) -> usize;

    /// Number of registrations overall
    fn active_count(&self) -> usize;
}
