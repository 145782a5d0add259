//! Brute-force arcade physics
//!
//! Euler integration, horizontal wrap for entities drifting off screen and
//! circle-circle overlap tests against the player. Entity counts are capped
//! by the zone controller, so a linear scan is enough.

use crate::entity::{EntityHandle, EntityStore};
use crate::foundation::math::WorldBounds;
use crate::physics::{Overlap, PhysicsService, PlayerBody};

/// Minimal [`PhysicsService`] for headless runs
#[derive(Debug, Clone)]
pub struct ArcadePhysics {
    bounds: WorldBounds,
    /// Downward acceleration applied to the player
    pub gravity: f32,
    /// Distance past the side edges before an entity wraps
    pub wrap_margin: f32,
}

impl ArcadePhysics {
    /// Create physics for the given playfield, without gravity
    pub fn new(bounds: WorldBounds) -> Self {
        Self {
            bounds,
            gravity: 0.0,
            wrap_margin: 0.0,
        }
    }

    /// Set player gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the wrap margin
    pub fn with_wrap_margin(mut self, margin: f32) -> Self {
        self.wrap_margin = margin;
        self
    }
}

impl PhysicsService for ArcadePhysics {
    fn world_bounds(&self) -> WorldBounds {
        self.bounds
    }

    fn step(&mut self, store: &mut EntityStore, player: &mut PlayerBody, dt: f32) -> Vec<Overlap> {
        for (_, entity) in store.iter_mut() {
            if !entity.is_active() {
                continue;
            }
            entity.position += entity.velocity * dt;
            entity.position.x = self.bounds.wrap_x(entity.position.x, self.wrap_margin);
        }

        player.velocity.y += self.gravity * dt;
        player.position += player.velocity * dt;
        player.position.x = self.bounds.wrap_x(player.position.x, 0.0);
        if player.position.y > self.bounds.max_y {
            // Landed
            player.position.y = self.bounds.max_y;
            player.velocity.y = player.velocity.y.min(0.0);
        }

        let player_collider = player.collider();
        store
            .iter_active()
            .filter(|(_, entity)| entity.is_collidable())
            .filter_map(|(id, entity)| {
                let collider = entity.collider();
                player_collider.intersects(&collider).then(|| Overlap {
                    entity: EntityHandle {
                        id,
                        generation: entity.generation(),
                    },
                    depth: player_collider.penetration_depth(&collider),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, Variant};
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;

    fn bounds() -> WorldBounds {
        WorldBounds::new(0.0, 800.0, -20_000.0, 0.0)
    }

    #[test]
    fn test_integrates_and_wraps() {
        let mut store = EntityStore::new();
        let id = store.insert(Entity::new(Variant::Sparrow));
        let entity = store.get_mut(id).unwrap();
        entity.activate();
        entity.position = Vec2::new(790.0, -300.0);
        entity.velocity = Vec2::new(40.0, 0.0);

        let mut physics = ArcadePhysics::new(bounds());
        let mut player = PlayerBody::new(Vec2::new(400.0, -5_000.0), 16.0);
        let overlaps = physics.step(&mut store, &mut player, 0.5);

        assert!(overlaps.is_empty());
        assert_relative_eq!(store.get(id).unwrap().position.x, 10.0);
    }

    #[test]
    fn test_reports_collidable_overlaps_only() {
        let mut store = EntityStore::new();
        let hit = store.insert(Entity::new(Variant::Balloon));
        let pooled = store.insert(Entity::new(Variant::Balloon));
        store.get_mut(hit).unwrap().activate();
        store.get_mut(hit).unwrap().position = Vec2::new(400.0, -300.0);
        store.get_mut(pooled).unwrap().position = Vec2::new(400.0, -300.0);

        let mut physics = ArcadePhysics::new(bounds());
        let mut player = PlayerBody::new(Vec2::new(410.0, -300.0), 16.0);
        let overlaps = physics.step(&mut store, &mut player, 0.0);

        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].entity, store.handle(hit).unwrap());
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut store = EntityStore::new();
        let mut physics = ArcadePhysics::new(bounds()).with_gravity(500.0);
        let mut player = PlayerBody::new(Vec2::new(400.0, -1.0), 16.0);
        physics.step(&mut store, &mut player, 1.0);
        assert_relative_eq!(player.position.y, 0.0);
        assert_relative_eq!(player.velocity.y, 0.0);
    }
}
