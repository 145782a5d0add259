//! Game-state seam
//!
//! The day counter, player transform and economy belong to the host game;
//! the lifecycle core only reads and nudges them through [`GameState`].

use crate::foundation::math::Vec2;
use crate::physics::PlayerBody;

/// Game-state collaborator
pub trait GameState {
    /// Current in-game day
    fn current_day(&self) -> u32;

    /// World `y` of the ground; altitude is `ground_reference - y`
    fn ground_reference(&self) -> f32;

    /// Player body
    fn player(&self) -> &PlayerBody;

    /// Mutable player body
    fn player_mut(&mut self) -> &mut PlayerBody;

    /// Credit collected currency
    fn add_coins(&mut self, amount: u32);

    /// Credit collected fuel
    fn add_fuel(&mut self, amount: f32);

    /// Player altitude above the ground
    fn player_altitude(&self) -> f32 {
        self.ground_reference() - self.player().position.y
    }
}

/// Plain [`GameState`] used by the demo and tests
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Current day
    pub day: u32,
    /// Ground `y`
    pub ground_reference: f32,
    /// Player body
    pub player: PlayerBody,
    /// Currency collected this session
    pub coins: u32,
    /// Fuel collected this session
    pub fuel: f32,
}

impl SessionState {
    /// Start a session on day 1 with the player resting on the ground
    pub fn new(ground_reference: f32, player_x: f32, player_radius: f32) -> Self {
        Self {
            day: 1,
            ground_reference,
            player: PlayerBody::new(Vec2::new(player_x, ground_reference), player_radius),
            coins: 0,
            fuel: 0.0,
        }
    }

    /// Place the player at an altitude
    pub fn set_altitude(&mut self, altitude: f32) {
        self.player.position.y = self.ground_reference - altitude;
    }

    /// Advance to the next day and put the player back on the ground
    pub fn next_day(&mut self) -> u32 {
        self.day += 1;
        self.player.position.y = self.ground_reference;
        self.player.velocity = Vec2::zeros();
        self.day
    }
}

impl GameState for SessionState {
    fn current_day(&self) -> u32 {
        self.day
    }

    fn ground_reference(&self) -> f32 {
        self.ground_reference
    }

    fn player(&self) -> &PlayerBody {
        &self.player
    }

    fn player_mut(&mut self) -> &mut PlayerBody {
        &mut self.player
    }

    fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    fn add_fuel(&mut self, amount: f32) {
        self.fuel += amount;
    }
}
