//! Per-category behaviour table
//!
//! Resolved once from configuration. Spawn motion and the contact response
//! are looked up here rather than matched on category throughout the code.

use crate::animation::Motion;
use crate::core::{CollisionConfig, SpawnConfig};
use crate::entity::Category;

/// Economy resource granted by a collectible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickup {
    /// Currency
    Coins,
    /// Fuel
    Fuel,
}

/// What touching an entity does to the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactResponse {
    /// Upward kick plus a nudge along the player's heading
    Lift {
        /// Vertical impulse (negative is up)
        boost: f32,
        /// Horizontal impulse magnitude
        horizontal_bonus: f32,
    },
    /// Upward kick plus a share of the entity's horizontal velocity
    Slipstream {
        /// Vertical impulse (negative is up)
        boost: f32,
        /// Share of the entity's horizontal velocity
        transfer: f32,
    },
    /// Scale the player's velocity on both axes
    Drag {
        /// Velocity multiplier below one
        damping: f32,
    },
    /// No push; credit the economy
    Collect(Pickup),
}

/// Behaviour of one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryBehavior {
    /// Vertical bob started on spawn
    pub bob: Option<Motion>,
    /// Horizontal sway started on spawn
    pub sway: Option<Motion>,
    /// Contact response
    pub response: ContactResponse,
}

/// Behaviour for every category, indexed by [`Category::index`]
#[derive(Debug, Clone)]
pub struct BehaviorTable {
    entries: [CategoryBehavior; Category::ALL.len()],
}

impl BehaviorTable {
    /// Resolve the table from configuration
    pub fn new(spawn: &SpawnConfig, collision: &CollisionConfig) -> Self {
        let bob = Some(Motion::Bob {
            amplitude: spawn.bob_amplitude,
            period: spawn.bob_period,
        });
        let sway = Some(Motion::Sway {
            amplitude: spawn.sway_amplitude,
            period: spawn.sway_period,
        });

        let entry = |category: Category| match category {
            Category::Floater => CategoryBehavior {
                bob,
                sway: None,
                response: ContactResponse::Lift {
                    boost: collision.floater_boost,
                    horizontal_bonus: collision.floater_horizontal_bonus,
                },
            },
            Category::Flyer => CategoryBehavior {
                bob: None,
                sway: None,
                response: ContactResponse::Slipstream {
                    boost: collision.flyer_boost,
                    transfer: collision.flyer_velocity_transfer,
                },
            },
            Category::Cloud => CategoryBehavior {
                bob,
                sway,
                response: ContactResponse::Drag {
                    damping: collision.cloud_damping,
                },
            },
            Category::Coin => CategoryBehavior {
                bob,
                sway: None,
                response: ContactResponse::Collect(Pickup::Coins),
            },
            Category::FuelCanister => CategoryBehavior {
                bob,
                sway: None,
                response: ContactResponse::Collect(Pickup::Fuel),
            },
        };

        Self {
            entries: Category::ALL.map(entry),
        }
    }

    /// Behaviour of a category
    pub fn get(&self, category: Category) -> &CategoryBehavior {
        &self.entries[category.index()]
    }
}

impl Default for BehaviorTable {
    fn default() -> Self {
        Self::new(&SpawnConfig::default(), &CollisionConfig::default())
    }
}
