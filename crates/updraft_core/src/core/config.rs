//! # Lifecycle Configuration
//!
//! Every tunable of the lifecycle core in one serializable tree. Sections
//! default to the shipped gameplay values, so a config file only needs to
//! list what it changes.
//!
//! ## Sections
//!
//! - **Pool**: free-list sizing and health monitoring
//! - **Zones**: the authoritative altitude zone table and population rules
//! - **Spawn**: placement and motion of freshly reset entities
//! - **Collision**: player responses to contact
//! - **Aging**: how many in-game days entities survive
//! - **Assets**: which variant assets are available

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::entity::Category;
use crate::zone::{ZoneDescriptor, ZoneName};

/// One value per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryCounts {
    /// Floater count
    pub floater: u32,
    /// Flyer count
    pub flyer: u32,
    /// Cloud count
    pub cloud: u32,
    /// Coin count
    pub coin: u32,
    /// Fuel canister count
    pub fuel_canister: u32,
}

impl CategoryCounts {
    /// Create counts for all categories
    pub fn new(floater: u32, flyer: u32, cloud: u32, coin: u32, fuel_canister: u32) -> Self {
        Self { floater, flyer, cloud, coin, fuel_canister }
    }

    /// Value for a category
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Floater => self.floater,
            Category::Flyer => self.flyer,
            Category::Cloud => self.cloud,
            Category::Coin => self.coin,
            Category::FuelCanister => self.fuel_canister,
        }
    }

    /// Mutable value for a category
    pub fn get_mut(&mut self, category: Category) -> &mut u32 {
        match category {
            Category::Floater => &mut self.floater,
            Category::Flyer => &mut self.flyer,
            Category::Cloud => &mut self.cloud,
            Category::Coin => &mut self.coin,
            Category::FuelCanister => &mut self.fuel_canister,
        }
    }

    /// Sum over all categories
    pub fn total(&self) -> u32 {
        Category::ALL.iter().map(|category| self.get(*category)).sum()
    }
}

/// # Pool Configuration
///
/// Free-list sizing and the health monitor's double threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Initial free-list size per variant, by category
    pub initial_size: CategoryCounts,
    /// Soft cap as a multiple of the initial size
    pub soft_cap_ratio: f32,
    /// Fill free-lists to their initial size at construction
    pub prewarm: bool,
    /// A variant with fewer pooled entities than this is flagged
    pub low_water_mark: usize,
    /// Replenishment runs only when more than this many variants are flagged
    pub flagged_variant_trigger: usize,
    /// Maximum entities allocated per flagged variant per check
    pub replenish_batch: usize,
    /// Ticks between health checks
    pub health_check_interval_ticks: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: CategoryCounts::new(8, 8, 6, 10, 4),
            soft_cap_ratio: 1.5,
            prewarm: true,
            low_water_mark: 2,
            flagged_variant_trigger: 2,
            replenish_batch: 5,
            health_check_interval_ticks: 300,
        }
    }
}

/// # Zone Table Configuration
///
/// The single authoritative altitude table plus the population rules the
/// spawn controller applies per zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTableConfig {
    /// Zones ordered by increasing altitude
    pub zones: Vec<ZoneDescriptor>,
    /// Ticks between zone classifications
    pub classify_interval_ticks: u64,
    /// Distance to a boundary at which the next zone is pre-staged
    pub buffer_distance: f32,
    /// Distance past which a pre-staged zone is released (defaults to `buffer_distance`)
    pub buffer_clear_distance: Option<f32>,
    /// Minimum entities pre-staged per boundary
    pub prestage_min: u32,
    /// Maximum entities pre-staged per boundary
    pub prestage_max: u32,
    /// Top-up runs when active entities drop below this share of the zone target
    pub top_up_ratio: f32,
    /// Ceiling on simultaneously active pooled entities
    pub max_active_objects: u32,
    /// Catalog maximum per category, scaled by each zone's density
    pub catalog_max: CategoryCounts,
}

impl ZoneTableConfig {
    /// Effective hysteresis distance for clearing pre-staged zones
    pub fn clear_distance(&self) -> f32 {
        self.buffer_clear_distance.unwrap_or(self.buffer_distance)
    }
}

impl Default for ZoneTableConfig {
    fn default() -> Self {
        Self {
            zones: vec![
                ZoneDescriptor::new(ZoneName::Ground, 0.0, 1_000.0, 0.5),
                ZoneDescriptor::new(ZoneName::Low, 1_000.0, 3_000.0, 0.5),
                ZoneDescriptor::new(ZoneName::Mid, 3_000.0, 6_000.0, 0.45),
                ZoneDescriptor::new(ZoneName::High, 6_000.0, 10_000.0, 0.4),
                ZoneDescriptor::new(ZoneName::Space, 10_000.0, 20_000.0, 0.6),
            ],
            classify_interval_ticks: 10,
            buffer_distance: 500.0,
            buffer_clear_distance: None,
            prestage_min: 3,
            prestage_max: 5,
            top_up_ratio: 0.15,
            max_active_objects: 60,
            catalog_max: CategoryCounts::new(20, 16, 12, 24, 6),
        }
    }
}

/// # Spawn Configuration
///
/// Placement and recurring motion applied by the reset policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Playfield width
    pub screen_width: f32,
    /// Horizontal margin kept free on both sides
    pub horizontal_margin: f32,
    /// Distance kept from zone edges when picking a spawn altitude
    pub band_inset: f32,
    /// Chance of spawning in the variant's primary zone when it spans two
    pub primary_zone_weight: f32,
    /// Slowest horizontal drift
    pub drift_speed_min: f32,
    /// Fastest horizontal drift
    pub drift_speed_max: f32,
    /// Vertical bob amplitude for floating categories
    pub bob_amplitude: f32,
    /// Vertical bob period in seconds
    pub bob_period: f32,
    /// Horizontal sway amplitude for clouds
    pub sway_amplitude: f32,
    /// Horizontal sway period in seconds
    pub sway_period: f32,
    /// Fade-in duration for pre-staged entities
    pub prestage_fade_in: f32,
    /// Fixed seed for placement randomness; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            horizontal_margin: 40.0,
            band_inset: 50.0,
            primary_zone_weight: 0.7,
            drift_speed_min: 10.0,
            drift_speed_max: 40.0,
            bob_amplitude: 12.0,
            bob_period: 3.0,
            sway_amplitude: 30.0,
            sway_period: 6.0,
            prestage_fade_in: 0.6,
            rng_seed: None,
        }
    }
}

/// # Collision Configuration
///
/// Upward is negative `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Vertical impulse added by a floater
    pub floater_boost: f32,
    /// Horizontal impulse added by a floater, along the player's heading
    pub floater_horizontal_bonus: f32,
    /// Vertical impulse added by a flyer
    pub flyer_boost: f32,
    /// Share of the flyer's horizontal velocity handed to the player
    pub flyer_velocity_transfer: f32,
    /// Velocity multiplier applied by a cloud
    pub cloud_damping: f32,
    /// Per-axis speed limit after any impulse
    pub max_player_speed: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            floater_boost: -240.0,
            floater_horizontal_bonus: 50.0,
            flyer_boost: -180.0,
            flyer_velocity_transfer: 0.5,
            cloud_damping: 0.85,
            max_player_speed: 600.0,
        }
    }
}

/// # Aging Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgingConfig {
    /// Days floaters, flyers and clouds survive
    pub obstacle_max_age_days: u32,
    /// Days coins and fuel canisters survive
    pub collectible_max_age_days: u32,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            obstacle_max_age_days: 4,
            collectible_max_age_days: 2,
        }
    }
}

/// # Asset Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssetConfig {
    /// Asset keys that loaded; `None` means every variant asset is present
    pub available: Option<Vec<String>>,
    /// Fail construction when a category has no canonical asset
    pub strict: bool,
}

/// # Complete Lifecycle Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Pool sizing
    pub pool: PoolConfig,
    /// Zone table
    pub zones: ZoneTableConfig,
    /// Spawn placement
    pub spawn: SpawnConfig,
    /// Contact responses
    pub collision: CollisionConfig,
    /// Aging thresholds
    pub aging: AgingConfig,
    /// Asset availability
    pub assets: AssetConfig,
}

impl LifecycleConfig {
    /// Validate values that would make the core misbehave
    ///
    /// The zone table's shape (ordering, contiguity) is checked when the
    /// classifier is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| Err(ConfigError::Invalid(reason.to_string()));

        if self.pool.soft_cap_ratio < 1.0 {
            return invalid("pool.soft_cap_ratio must be at least 1.0");
        }
        if self.pool.health_check_interval_ticks == 0 {
            return invalid("pool.health_check_interval_ticks must be positive");
        }
        if self.zones.zones.is_empty() {
            return invalid("zones.zones must not be empty");
        }
        if self.zones.classify_interval_ticks == 0 {
            return invalid("zones.classify_interval_ticks must be positive");
        }
        if self.zones.buffer_distance < 0.0 || self.zones.clear_distance() < 0.0 {
            return invalid("zone buffer distances must not be negative");
        }
        if self.zones.prestage_min > self.zones.prestage_max {
            return invalid("zones.prestage_min exceeds zones.prestage_max");
        }
        if !(0.0..=1.0).contains(&self.zones.top_up_ratio) {
            return invalid("zones.top_up_ratio must be within [0, 1]");
        }
        if self.zones.zones.iter().any(|zone| !(0.0..=1.0).contains(&zone.density)) {
            return invalid("zone density must be within [0, 1]");
        }
        if self.spawn.screen_width <= 2.0 * self.spawn.horizontal_margin {
            return invalid("spawn.screen_width must exceed both margins");
        }
        if self.spawn.drift_speed_min > self.spawn.drift_speed_max {
            return invalid("spawn.drift_speed_min exceeds spawn.drift_speed_max");
        }
        if !(0.0..=1.0).contains(&self.spawn.primary_zone_weight) {
            return invalid("spawn.primary_zone_weight must be within [0, 1]");
        }
        if self.spawn.bob_period <= 0.0 || self.spawn.sway_period <= 0.0 {
            return invalid("oscillation periods must be positive");
        }
        if !(0.0..1.0).contains(&self.collision.cloud_damping) {
            return invalid("collision.cloud_damping must be within [0, 1)");
        }
        if self.collision.max_player_speed <= 0.0 {
            return invalid("collision.max_player_speed must be positive");
        }
        Ok(())
    }
}

impl Config for LifecycleConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LifecycleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_prestage_range() {
        let mut config = LifecycleConfig::default();
        config.zones.prestage_min = 6;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_boosting_cloud() {
        let mut config = LifecycleConfig::default();
        config.collision.cloud_damping = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = r#"
            [zones]
            buffer_distance = 750.0

            [collision]
            max_player_speed = 450.0
        "#;
        let config: LifecycleConfig = toml::from_str(text).unwrap();
        assert_eq!(config.zones.buffer_distance, 750.0);
        assert_eq!(config.zones.clear_distance(), 750.0);
        assert_eq!(config.collision.max_player_speed, 450.0);
        assert_eq!(config.pool, PoolConfig::default());
        assert_eq!(config.zones.zones.len(), 5);
    }

    #[test]
    fn test_toml_zone_table() {
        let text = r#"
            [[zones.zones]]
            name = "Ground"
            min_altitude = 0.0
            max_altitude = 500.0
            density = 0.3

            [[zones.zones]]
            name = "Low"
            min_altitude = 500.0
            max_altitude = 900.0
            density = 0.3
        "#;
        let config: LifecycleConfig = toml::from_str(text).unwrap();
        assert_eq!(config.zones.zones.len(), 2);
        assert_eq!(config.zones.zones[1].name, ZoneName::Low);
        assert_eq!(config.zones.zones[1].max_altitude, 900.0);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = LifecycleConfig::default();
        let text = ron::ser::to_string(&config).unwrap();
        let parsed: LifecycleConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_category_counts_total() {
        let counts = CategoryCounts::new(1, 2, 3, 4, 5);
        assert_eq!(counts.total(), 15);
        assert_eq!(counts.get(Category::Cloud), 3);
    }
}
