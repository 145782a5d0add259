//! # Altitude Zones
//!
//! The world is split into contiguous altitude bands. The classifier maps
//! the player's altitude to a band on a throttled cadence; the spawn
//! controller reacts to the result.

pub mod classifier;
pub mod controller;

pub use classifier::ZoneClassifier;
pub use controller::{ZoneSpawnController, ZoneUpdate};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named altitude band, ordered from the ground up
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZoneName {
    /// Near the ground
    Ground,
    /// Low sky
    Low,
    /// Mid sky
    Mid,
    /// High sky
    High,
    /// Above the atmosphere
    Space,
}

impl ZoneName {
    /// All zones from lowest to highest
    pub const ALL: [ZoneName; 5] = [
        ZoneName::Ground,
        ZoneName::Low,
        ZoneName::Mid,
        ZoneName::High,
        ZoneName::Space,
    ];

    /// Position in altitude order
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZoneName::Ground => "ground",
            ZoneName::Low => "low",
            ZoneName::Mid => "mid",
            ZoneName::High => "high",
            ZoneName::Space => "space",
        };
        f.write_str(name)
    }
}

/// One row of the zone table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneDescriptor {
    /// Zone name
    pub name: ZoneName,
    /// Lowest altitude, inclusive
    pub min_altitude: f32,
    /// Highest altitude, inclusive
    pub max_altitude: f32,
    /// Share of the catalog maximum populated in this zone
    pub density: f32,
}

impl ZoneDescriptor {
    /// Create a descriptor
    pub fn new(name: ZoneName, min_altitude: f32, max_altitude: f32, density: f32) -> Self {
        Self {
            name,
            min_altitude,
            max_altitude,
            density,
        }
    }

    /// Whether `altitude` lies in `[min_altitude, max_altitude]`
    pub fn contains(&self, altitude: f32) -> bool {
        altitude >= self.min_altitude && altitude <= self.max_altitude
    }
}
