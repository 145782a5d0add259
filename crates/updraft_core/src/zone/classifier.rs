//! Altitude to zone mapping

use crate::core::LifecycleError;
use crate::zone::{ZoneDescriptor, ZoneName};

/// Validated, ordered zone table
///
/// Built once from configuration. The table must start at altitude zero,
/// list every [`ZoneName`] once in altitude order, and be contiguous, so
/// every altitude up to the ceiling lands in exactly one zone (shared
/// boundaries resolve to the lower zone).
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    zones: Vec<ZoneDescriptor>,
}

impl ZoneClassifier {
    /// Validate and build the table
    pub fn new(zones: Vec<ZoneDescriptor>) -> Result<Self, LifecycleError> {
        let invalid = |reason: String| Err(LifecycleError::InvalidZoneTable(reason));

        if zones.len() != ZoneName::ALL.len() {
            return invalid(format!(
                "expected {} zones, found {}",
                ZoneName::ALL.len(),
                zones.len()
            ));
        }
        for (zone, expected) in zones.iter().zip(ZoneName::ALL) {
            if zone.name != expected {
                return invalid(format!("expected {expected} zone, found {}", zone.name));
            }
            if zone.max_altitude <= zone.min_altitude {
                return invalid(format!("{} zone has an empty range", zone.name));
            }
        }
        if zones[0].min_altitude != 0.0 {
            return invalid(format!("table starts at {}, not 0", zones[0].min_altitude));
        }
        for pair in zones.windows(2) {
            if pair[0].max_altitude != pair[1].min_altitude {
                return invalid(format!(
                    "gap or overlap between {} ({}) and {} ({})",
                    pair[0].name, pair[0].max_altitude, pair[1].name, pair[1].min_altitude
                ));
            }
        }

        Ok(Self { zones })
    }

    /// Zone containing `altitude`
    ///
    /// Altitudes at or below zero, and anything the table does not cover,
    /// classify as the lowest zone.
    pub fn classify(&self, altitude: f32) -> &ZoneDescriptor {
        let lowest = self.lowest();
        if altitude <= 0.0 || altitude.is_nan() {
            return lowest;
        }
        self.zones
            .iter()
            .find(|zone| zone.contains(altitude))
            .unwrap_or(lowest)
    }

    /// Descriptor for a zone name
    pub fn descriptor(&self, name: ZoneName) -> &ZoneDescriptor {
        // Construction guarantees one row per name in index order
        &self.zones[name.index()]
    }

    /// The zone directly below, if any
    pub fn below(&self, name: ZoneName) -> Option<&ZoneDescriptor> {
        name.index().checked_sub(1).map(|index| &self.zones[index])
    }

    /// The zone directly above, if any
    pub fn above(&self, name: ZoneName) -> Option<&ZoneDescriptor> {
        self.zones.get(name.index() + 1)
    }

    /// Lowest zone
    pub fn lowest(&self) -> &ZoneDescriptor {
        &self.zones[0]
    }

    /// Top of the highest zone
    pub fn ceiling(&self) -> f32 {
        self.zones[self.zones.len() - 1].max_altitude
    }

    /// All zones in altitude order
    pub fn zones(&self) -> &[ZoneDescriptor] {
        &self.zones
    }
}
