//! Entity record and handles

use bitflags::bitflags;

use crate::animation::MotionId;
use crate::entity::{Category, Variant};
use crate::foundation::math::{Circle, Vec2};

slotmap::new_key_type! {
    /// Stable identity token of an entity; survives pooling and reuse
    pub struct EntityId;
}

/// Identity plus the activation generation it was issued for
///
/// Overlap reports and motion registrations carry a handle, so anything
/// issued for a previous activation of a reused entity can be recognised
/// as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    /// Arena key
    pub id: EntityId,
    /// Activation generation
    pub generation: u32,
}

bitflags! {
    /// Liveness flags, always written together
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntityFlags: u8 {
        /// Present in the active world
        const ACTIVE = 1 << 0;
        /// Rendered
        const VISIBLE = 1 << 1;
        /// Collision shape enabled
        const COLLIDABLE = 1 << 2;
        /// All three liveness flags
        const LIVE = Self::ACTIVE.bits() | Self::VISIBLE.bits() | Self::COLLIDABLE.bits();
    }
}

/// A reusable world object (obstacle or collectible)
#[derive(Debug, Clone)]
pub struct Entity {
    category: Category,
    variant: Variant,
    /// Free-list this entity returns to; fixed at allocation
    owner: Variant,
    flags: EntityFlags,
    generation: u32,
    motions: Vec<MotionId>,

    /// World position (center)
    pub position: Vec2,
    /// Velocity in world units per second
    pub velocity: Vec2,
    /// Display size (width, height)
    pub size: Vec2,
    /// Radius of the circular collider
    pub collider_radius: f32,
    /// Rotation in radians
    pub rotation: f32,
    /// Opacity in `[0, 1]`
    pub alpha: f32,
    /// Mirrored horizontally (facing left)
    pub flip_x: bool,
}

impl Entity {
    /// Create an inactive entity owned by `variant`'s free-list
    pub fn new(variant: Variant) -> Self {
        let spec = variant.spec();
        Self {
            category: spec.category,
            variant,
            owner: variant,
            flags: EntityFlags::empty(),
            generation: 0,
            motions: Vec::new(),
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            size: Vec2::new(spec.width, spec.height),
            collider_radius: spec.width.min(spec.height) * 0.5,
            rotation: 0.0,
            alpha: 1.0,
            flip_x: false,
        }
    }

    /// Gameplay category
    pub fn category(&self) -> Category {
        self.category
    }

    /// Current visual variant
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Variant free-list that owns this entity
    pub fn owner(&self) -> Variant {
        self.owner
    }

    /// Liveness flags
    pub fn flags(&self) -> EntityFlags {
        self.flags
    }

    /// Whether the entity is in the active world
    pub fn is_active(&self) -> bool {
        self.flags.contains(EntityFlags::ACTIVE)
    }

    /// Whether the collision shape is enabled
    pub fn is_collidable(&self) -> bool {
        self.flags.contains(EntityFlags::COLLIDABLE)
    }

    /// Activation generation
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Motion registrations owned by this activation
    pub fn motions(&self) -> &[MotionId] {
        &self.motions
    }

    /// World-space collider
    pub fn collider(&self) -> Circle {
        Circle::new(self.position, self.collider_radius)
    }

    /// Switch to another variant of the same category (size is refreshed by the reset policy)
    pub(crate) fn set_variant(&mut self, variant: Variant) {
        debug_assert_eq!(variant.category(), self.category);
        self.variant = variant;
    }

    pub(crate) fn add_motion(&mut self, motion: MotionId) {
        self.motions.push(motion);
    }

    pub(crate) fn remove_motion(&mut self, motion: MotionId) {
        self.motions.retain(|owned| *owned != motion);
    }

    pub(crate) fn take_motions(&mut self) -> Vec<MotionId> {
        std::mem::take(&mut self.motions)
    }

    /// Enter the active world under a new generation
    pub(crate) fn activate(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.flags = EntityFlags::LIVE;
        self.generation
    }

    /// Leave the active world and return to the default transform
    pub(crate) fn deactivate(&mut self) {
        self.flags = EntityFlags::empty();
        self.variant = self.owner;
        self.position = Vec2::zeros();
        self.velocity = Vec2::zeros();
        self.rotation = 0.0;
        self.alpha = 1.0;
        self.flip_x = false;
    }

    /// Whether the entity is in the state a free-list expects
    pub(crate) fn is_poolable(&self) -> bool {
        self.flags.is_empty() && self.velocity == Vec2::zeros() && self.motions.is_empty()
    }
}
