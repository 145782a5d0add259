//! Collision resolver

use crate::core::CollisionConfig;
use crate::entity::{Category, Variant};
use crate::foundation::math::{clamp_axes, Vec2};
use crate::physics::Overlap;
use crate::scope::LifecycleScope;
use crate::spawn::{BehaviorTable, ContactResponse, Pickup};
use crate::state::GameState;

/// An entity the player consumed this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consumed {
    /// Category of the entity
    pub category: Category,
    /// Variant it was showing
    pub variant: Variant,
}

/// Applies contact responses and retires touched entities
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    behaviors: BehaviorTable,
    max_speed: f32,
}

impl CollisionResolver {
    /// Create a resolver
    pub fn new(config: &CollisionConfig, behaviors: BehaviorTable) -> Self {
        Self {
            behaviors,
            max_speed: config.max_player_speed,
        }
    }

    /// Player velocity after touching an entity with `response`
    ///
    /// Every push is clamped per axis to the configured maximum.
    pub fn respond(&self, response: ContactResponse, player: Vec2, entity: Vec2) -> Vec2 {
        let pushed = match response {
            ContactResponse::Lift { boost, horizontal_bonus } => {
                let heading = if player.x > 0.0 {
                    1.0
                } else if player.x < 0.0 {
                    -1.0
                } else {
                    0.0
                };
                Vec2::new(player.x + horizontal_bonus * heading, player.y + boost)
            }
            ContactResponse::Slipstream { boost, transfer } => {
                Vec2::new(player.x + transfer * entity.x, player.y + boost)
            }
            ContactResponse::Drag { damping } => player * damping,
            ContactResponse::Collect(_) => return player,
        };
        clamp_axes(pushed, self.max_speed)
    }

    /// Resolve this frame's overlaps in order
    ///
    /// Overlaps whose handle no longer resolves (the entity was retired
    /// earlier this frame, or reused since) are skipped.
    pub fn resolve(
        &self,
        scope: &mut LifecycleScope<'_>,
        state: &mut dyn GameState,
        overlaps: &[Overlap],
    ) -> Vec<Consumed> {
        let mut consumed = Vec::new();

        for overlap in overlaps {
            let Some(entity) = scope.store().resolve(overlap.entity) else {
                log::trace!("Skipping stale overlap {:?}", overlap.entity);
                continue;
            };
            let category = entity.category();
            let variant = entity.variant();
            let entity_velocity = entity.velocity;
            let response = self.behaviors.get(category).response;

            match response {
                ContactResponse::Collect(Pickup::Coins) => {
                    state.add_coins(variant.spec().pickup_value.round() as u32);
                }
                ContactResponse::Collect(Pickup::Fuel) => {
                    state.add_fuel(variant.spec().pickup_value);
                }
                _ => {
                    let player = state.player_mut();
                    player.velocity = self.respond(response, player.velocity, entity_velocity);
                }
            }

            scope.retire(overlap.entity.id);
            log::debug!("Player consumed {variant}");
            consumed.push(Consumed { category, variant });
        }

        consumed
    }
}
