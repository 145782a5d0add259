//! Entity categories and visual variants
//!
//! Both sets are closed: every category and variant is known at compile time,
//! and the per-variant profile (size, home zones, asset key, pickup value)
//! lives in a static table indexed by the variant.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::zone::ZoneName;

/// Gameplay category of a pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Balloons and other buoyant obstacles that give the player a lift
    Floater,
    /// Birds and aircraft crossing the sky
    Flyer,
    /// Clouds that slow the player down
    Cloud,
    /// Currency pickup
    Coin,
    /// Fuel pickup
    FuelCanister,
}

/// Category groups aged out independently on day restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeGroup {
    /// Floaters, flyers and clouds
    Obstacles,
    /// Coins and fuel canisters
    Collectibles,
}

impl Category {
    /// All categories in table order
    pub const ALL: [Category; 5] = [
        Category::Floater,
        Category::Flyer,
        Category::Cloud,
        Category::Coin,
        Category::FuelCanister,
    ];

    /// Index into per-category tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Variants belonging to this category; the first one is canonical
    pub fn variants(self) -> &'static [Variant] {
        match self {
            Category::Floater => &[
                Variant::Balloon,
                Variant::HotAirBalloon,
                Variant::Blimp,
                Variant::WeatherBalloon,
                Variant::Satellite,
            ],
            Category::Flyer => &[
                Variant::Sparrow,
                Variant::Crow,
                Variant::Goose,
                Variant::Glider,
                Variant::Jet,
                Variant::Ufo,
            ],
            Category::Cloud => &[
                Variant::Cumulus,
                Variant::StormCloud,
                Variant::Cirrus,
                Variant::Nebula,
            ],
            Category::Coin => &[
                Variant::CopperCoin,
                Variant::SilverCoin,
                Variant::GoldCoin,
            ],
            Category::FuelCanister => &[Variant::FuelCan, Variant::FuelCell],
        }
    }

    /// Fallback variant used when a requested variant has no asset
    pub fn canonical_variant(self) -> Variant {
        self.variants()[0]
    }

    /// Aging group this category belongs to
    pub fn age_group(self) -> AgeGroup {
        match self {
            Category::Floater | Category::Flyer | Category::Cloud => AgeGroup::Obstacles,
            Category::Coin | Category::FuelCanister => AgeGroup::Collectibles,
        }
    }

    /// Whether contact collects the entity instead of pushing the player
    pub fn is_collectible(self) -> bool {
        self.age_group() == AgeGroup::Collectibles
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Floater => "floater",
            Category::Flyer => "flyer",
            Category::Cloud => "cloud",
            Category::Coin => "coin",
            Category::FuelCanister => "fuel_canister",
        };
        f.write_str(name)
    }
}

/// Visual variant of an entity (appearance, size and behaviour profile)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    // Floaters
    /// Party balloon, low altitude
    Balloon,
    /// Hot air balloon
    HotAirBalloon,
    /// Blimp
    Blimp,
    /// Weather balloon
    WeatherBalloon,
    /// Satellite drifting in orbit
    Satellite,
    // Flyers
    /// Sparrow
    Sparrow,
    /// Crow
    Crow,
    /// Goose
    Goose,
    /// Glider
    Glider,
    /// Jet
    Jet,
    /// Flying saucer
    Ufo,
    // Clouds
    /// Fair weather cloud
    Cumulus,
    /// Storm cloud
    StormCloud,
    /// High wispy cloud
    Cirrus,
    /// Space dust cloud
    Nebula,
    // Coins
    /// Copper coin
    CopperCoin,
    /// Silver coin
    SilverCoin,
    /// Gold coin
    GoldCoin,
    // Fuel
    /// Fuel can
    FuelCan,
    /// Fuel cell
    FuelCell,
}

/// Static profile of a variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSpec {
    /// Owning category
    pub category: Category,
    /// Texture/asset key the presentation layer loads for this variant
    pub asset_key: &'static str,
    /// Display width in world units
    pub width: f32,
    /// Display height in world units
    pub height: f32,
    /// Zone this variant is characteristic of
    pub primary_zone: ZoneName,
    /// Adjacent zone the variant may also appear in
    pub secondary_zone: Option<ZoneName>,
    /// Coin value or fuel amount granted on pickup (zero for obstacles)
    pub pickup_value: f32,
}

const fn spec(
    category: Category,
    asset_key: &'static str,
    width: f32,
    height: f32,
    primary_zone: ZoneName,
    secondary_zone: Option<ZoneName>,
    pickup_value: f32,
) -> VariantSpec {
    VariantSpec {
        category,
        asset_key,
        width,
        height,
        primary_zone,
        secondary_zone,
        pickup_value,
    }
}

// Indexed by `Variant as usize`; order must match the enum.
const VARIANT_SPECS: [VariantSpec; 20] = [
    spec(Category::Floater, "floater_balloon", 48.0, 64.0, ZoneName::Ground, Some(ZoneName::Low), 0.0),
    spec(Category::Floater, "floater_hot_air_balloon", 96.0, 128.0, ZoneName::Low, Some(ZoneName::Mid), 0.0),
    spec(Category::Floater, "floater_blimp", 160.0, 72.0, ZoneName::Mid, None, 0.0),
    spec(Category::Floater, "floater_weather_balloon", 56.0, 80.0, ZoneName::High, Some(ZoneName::Mid), 0.0),
    spec(Category::Floater, "floater_satellite", 88.0, 60.0, ZoneName::Space, None, 0.0),
    spec(Category::Flyer, "flyer_sparrow", 40.0, 28.0, ZoneName::Ground, None, 0.0),
    spec(Category::Flyer, "flyer_crow", 48.0, 32.0, ZoneName::Ground, Some(ZoneName::Low), 0.0),
    spec(Category::Flyer, "flyer_goose", 64.0, 40.0, ZoneName::Low, Some(ZoneName::Ground), 0.0),
    spec(Category::Flyer, "flyer_glider", 120.0, 40.0, ZoneName::Mid, Some(ZoneName::Low), 0.0),
    spec(Category::Flyer, "flyer_jet", 140.0, 48.0, ZoneName::High, None, 0.0),
    spec(Category::Flyer, "flyer_ufo", 96.0, 48.0, ZoneName::Space, Some(ZoneName::High), 0.0),
    spec(Category::Cloud, "cloud_cumulus", 180.0, 100.0, ZoneName::Low, Some(ZoneName::Mid), 0.0),
    spec(Category::Cloud, "cloud_storm", 220.0, 130.0, ZoneName::Mid, Some(ZoneName::High), 0.0),
    spec(Category::Cloud, "cloud_cirrus", 240.0, 80.0, ZoneName::High, None, 0.0),
    spec(Category::Cloud, "cloud_nebula", 260.0, 160.0, ZoneName::Space, None, 0.0),
    spec(Category::Coin, "coin_copper", 32.0, 32.0, ZoneName::Ground, Some(ZoneName::Low), 1.0),
    spec(Category::Coin, "coin_silver", 32.0, 32.0, ZoneName::Mid, Some(ZoneName::Low), 5.0),
    spec(Category::Coin, "coin_gold", 36.0, 36.0, ZoneName::High, Some(ZoneName::Space), 20.0),
    spec(Category::FuelCanister, "fuel_can", 36.0, 48.0, ZoneName::Low, Some(ZoneName::Ground), 25.0),
    spec(Category::FuelCanister, "fuel_cell", 40.0, 52.0, ZoneName::High, Some(ZoneName::Mid), 50.0),
];

impl Variant {
    /// All variants in table order
    pub const ALL: [Variant; 20] = [
        Variant::Balloon,
        Variant::HotAirBalloon,
        Variant::Blimp,
        Variant::WeatherBalloon,
        Variant::Satellite,
        Variant::Sparrow,
        Variant::Crow,
        Variant::Goose,
        Variant::Glider,
        Variant::Jet,
        Variant::Ufo,
        Variant::Cumulus,
        Variant::StormCloud,
        Variant::Cirrus,
        Variant::Nebula,
        Variant::CopperCoin,
        Variant::SilverCoin,
        Variant::GoldCoin,
        Variant::FuelCan,
        Variant::FuelCell,
    ];

    /// Static profile for this variant
    pub fn spec(self) -> &'static VariantSpec {
        &VARIANT_SPECS[self as usize]
    }

    /// Owning category
    pub fn category(self) -> Category {
        self.spec().category
    }

    /// Asset key used to validate the variant against the loaded manifest
    pub fn asset_key(self) -> &'static str {
        self.spec().asset_key
    }

    /// Whether the variant belongs to the ground tier
    pub fn is_ground_tier(self) -> bool {
        self.spec().primary_zone == ZoneName::Ground
    }

    /// Variants of `category` that characterise `zone`
    pub fn characteristic_of(zone: ZoneName, category: Category) -> impl Iterator<Item = Variant> {
        category
            .variants()
            .iter()
            .copied()
            .filter(move |variant| variant.spec().primary_zone == zone)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_table_matches_category_lists() {
        for category in Category::ALL {
            for variant in category.variants() {
                assert_eq!(variant.category(), category, "{variant:?} listed under wrong category");
            }
        }
        let listed: usize = Category::ALL.iter().map(|c| c.variants().len()).sum();
        assert_eq!(listed, Variant::ALL.len());
    }

    #[test]
    fn test_variant_all_is_in_enum_order() {
        for (index, variant) in Variant::ALL.iter().enumerate() {
            assert_eq!(*variant as usize, index);
        }
    }

    #[test]
    fn test_secondary_zone_is_adjacent() {
        for variant in Variant::ALL {
            let spec = variant.spec();
            if let Some(secondary) = spec.secondary_zone {
                let gap = (secondary.index() as i32 - spec.primary_zone.index() as i32).abs();
                assert_eq!(gap, 1, "{variant:?} spans non-adjacent zones");
            }
        }
    }

    #[test]
    fn test_every_zone_has_obstacles() {
        for zone in ZoneName::ALL {
            let floaters = Variant::characteristic_of(zone, Category::Floater).count();
            let flyers = Variant::characteristic_of(zone, Category::Flyer).count();
            assert!(floaters >= 1 && floaters <= 2, "{zone:?} floaters: {floaters}");
            assert!(flyers >= 1 && flyers <= 2, "{zone:?} flyers: {flyers}");
        }
    }

    #[test]
    fn test_ground_tier() {
        assert!(Variant::Balloon.is_ground_tier());
        assert!(Variant::Sparrow.is_ground_tier());
        assert!(!Variant::Goose.is_ground_tier());
        assert_eq!(Category::Cloud.canonical_variant(), Variant::Cumulus);
    }
}
