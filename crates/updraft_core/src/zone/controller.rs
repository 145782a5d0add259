//! Zone spawn controller
//!
//! State machine over the player's current zone.
//!
//! - first classification: reclaim anything left over from another zone
//!   (survivors of a day restart), then populate the zone
//! - zone change: reclaim everything but what was pre-staged for the new
//!   zone, then populate it (entering Space also sweeps ground-tier variants)
//! - same zone: top up when the zone's population fell below a share of
//!   its target
//! - near an adjacent zone's boundary: pre-stage a handful of that zone's
//!   entities once, until the player backs off past the clear distance

use std::collections::BTreeSet;

use rand::Rng;

use crate::core::{CategoryCounts, ZoneTableConfig};
use crate::entity::{Category, EntityHandle, Variant};
use crate::scope::LifecycleScope;
use crate::spawn::ResetPolicy;
use crate::zone::{ZoneDescriptor, ZoneName};

/// What one controller update did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneUpdate {
    /// `(from, to)` when the zone changed; `from` is `None` on first classification
    pub changed: Option<(Option<ZoneName>, ZoneName)>,
    /// Entities spawned by populate or top-up
    pub spawned: usize,
    /// Entities reclaimed into the pool
    pub reclaimed: usize,
    /// Entities pre-staged for adjacent zones
    pub prestaged: usize,
}

/// Population state machine driven by zone classification
#[derive(Debug, Clone)]
pub struct ZoneSpawnController {
    config: ZoneTableConfig,
    current: Option<ZoneName>,
    buffered: BTreeSet<ZoneName>,
    /// Entities spawned for the current zone
    population: Vec<(Category, EntityHandle)>,
    /// Entities pre-staged for a neighbouring zone
    prestaged: Vec<(ZoneName, Category, EntityHandle)>,
}

impl ZoneSpawnController {
    /// Create a controller with no current zone
    pub fn new(config: &ZoneTableConfig) -> Self {
        Self {
            config: config.clone(),
            current: None,
            buffered: BTreeSet::new(),
            population: Vec::new(),
            prestaged: Vec::new(),
        }
    }

    /// Zone of the last classification
    pub fn current_zone(&self) -> Option<ZoneName> {
        self.current
    }

    /// Zones pre-staged and not yet cleared
    pub fn buffered_zones(&self) -> impl Iterator<Item = ZoneName> + '_ {
        self.buffered.iter().copied()
    }

    /// Forget the current zone so the next update populates from scratch
    pub fn reset(&mut self) {
        self.current = None;
        self.buffered.clear();
        self.population.clear();
        self.prestaged.clear();
    }

    /// Per-category population target for a zone
    ///
    /// Catalog maximums scaled by the zone's density, then scaled down
    /// together if their sum exceeds the global active ceiling. Categories
    /// with no variant characteristic of the zone get no target.
    pub fn targets(&self, zone: &ZoneDescriptor) -> CategoryCounts {
        let mut targets = CategoryCounts::default();
        for category in Category::ALL {
            if Variant::characteristic_of(zone.name, category).next().is_none() {
                continue;
            }
            let scaled = (self.config.catalog_max.get(category) as f32 * zone.density).floor();
            *targets.get_mut(category) = scaled as u32;
        }

        let total = targets.total();
        let ceiling = self.config.max_active_objects;
        if total > ceiling {
            let ratio = ceiling as f32 / total as f32;
            for category in Category::ALL {
                let target = targets.get_mut(category);
                *target = (*target as f32 * ratio).floor() as u32;
            }
        }
        targets
    }

    /// Entities of the current zone's population still in the world
    pub fn population_count(&self) -> usize {
        self.population.len()
    }

    /// Run one classification step at `altitude`
    pub fn update(
        &mut self,
        scope: &mut LifecycleScope<'_>,
        policy: &mut ResetPolicy,
        altitude: f32,
    ) -> ZoneUpdate {
        let zone = scope.zones.classify(altitude).name;
        let mut update = ZoneUpdate::default();

        let store = scope.store();
        self.population.retain(|(_, handle)| store.resolve(*handle).is_some());
        self.prestaged.retain(|(_, _, handle)| store.resolve(*handle).is_some());

        match self.current {
            None => {
                log::info!("Entering {zone} zone at altitude {altitude:.0}");
                self.current = Some(zone);
                update.changed = Some((None, zone));
                update.reclaimed = self.reclaim_foreign(scope, zone);
                update.spawned = self.populate(scope, policy, zone);
            }
            Some(previous) if previous != zone => {
                log::info!("Zone changed {previous} -> {zone} at altitude {altitude:.0}");
                update.reclaimed = self.transition(scope, previous, zone);
                update.changed = Some((Some(previous), zone));
                update.spawned = self.populate(scope, policy, zone);
            }
            Some(_) => {
                update.spawned = self.top_up(scope, policy, zone);
            }
        }

        update.prestaged = self.prestage(scope, policy, zone, altitude);
        update
    }

    /// Leave `from` for `to`; returns the number of entities reclaimed
    fn transition(&mut self, scope: &mut LifecycleScope<'_>, from: ZoneName, to: ZoneName) -> usize {
        let mut keep: Vec<EntityHandle> = Vec::new();
        self.population.clear();
        for (zone, category, handle) in self.prestaged.drain(..) {
            if zone == to {
                keep.push(handle);
                self.population.push((category, handle));
            }
        }

        let doomed: Vec<_> = scope
            .store()
            .iter_active()
            .filter(|(id, _)| !keep.iter().any(|handle| handle.id == *id))
            .map(|(id, _)| id)
            .collect();
        let mut reclaimed = doomed.len();
        for id in doomed {
            scope.retire(id);
        }

        if to == ZoneName::Space {
            reclaimed += self.reclaim_ground_tier(scope);
        }

        // The zone just left counts as staged until the player backs away from it
        self.buffered.clear();
        self.buffered.insert(from);
        self.current = Some(to);

        log::debug!("Reclaimed {reclaimed} entities, kept {} pre-staged", keep.len());
        reclaimed
    }

    /// Reclaim active entities that do not belong to `zone`
    fn reclaim_foreign(&mut self, scope: &mut LifecycleScope<'_>, zone: ZoneName) -> usize {
        let foreign: Vec<_> = scope
            .store()
            .iter_active()
            .filter(|(_, entity)| entity.variant().spec().primary_zone != zone)
            .map(|(id, _)| id)
            .collect();
        for id in &foreign {
            scope.retire(*id);
        }
        if !foreign.is_empty() {
            log::debug!("Reclaimed {} entities outside {zone}", foreign.len());
        }
        foreign.len()
    }

    /// Reclaim every active ground-tier entity, pre-staged ones included
    fn reclaim_ground_tier(&mut self, scope: &mut LifecycleScope<'_>) -> usize {
        let ground: Vec<_> = scope
            .store()
            .iter_active()
            .filter(|(_, entity)| entity.variant().is_ground_tier())
            .map(|(id, _)| id)
            .collect();
        for id in &ground {
            scope.retire(*id);
        }
        self.population.retain(|(_, handle)| !ground.contains(&handle.id));
        ground.len()
    }

    /// Fill every category of `zone` up to its target
    fn populate(&mut self, scope: &mut LifecycleScope<'_>, policy: &mut ResetPolicy, zone: ZoneName) -> usize {
        let targets = self.targets(scope.zones.descriptor(zone));
        let mut spawned = 0;

        // Entities already living in this zone (e.g. re-seated after a day restart) count
        let store = scope.store();
        let adopted: Vec<_> = store
            .iter_active()
            .filter(|(id, entity)| {
                entity.variant().spec().primary_zone == zone
                    && !self.population.iter().any(|(_, handle)| handle.id == *id)
            })
            .filter_map(|(id, entity)| store.handle(id).map(|handle| (entity.category(), handle)))
            .collect();
        self.population.extend(adopted);

        let mut wanted: Vec<(Category, Vec<Variant>, usize)> = Category::ALL
            .into_iter()
            .map(|category| {
                let present = self
                    .population
                    .iter()
                    .filter(|(populated, _)| *populated == category)
                    .count();
                let missing = (targets.get(category) as usize).saturating_sub(present);
                (category, Variant::characteristic_of(zone, category).collect::<Vec<_>>(), missing)
            })
            .filter(|(_, variants, missing)| !variants.is_empty() && *missing > 0)
            .collect();

        // One entity per category per round so the ceiling cuts every category evenly
        let mut headroom = self.headroom(scope);
        while headroom > 0 && wanted.iter().any(|(_, _, missing)| *missing > 0) {
            for (category, variants, missing) in &mut wanted {
                if *missing == 0 || headroom == 0 {
                    continue;
                }
                *missing -= 1;
                let variant = variants[policy.rng().gen_range(0..variants.len())];
                if let Some(handle) = policy.spawn(scope, variant) {
                    self.population.push((*category, handle));
                    spawned += 1;
                    headroom -= 1;
                }
            }
        }
        if wanted.iter().any(|(_, _, missing)| *missing > 0) {
            log::debug!("Active ceiling reached while populating {zone}");
        }

        log::debug!("Populated {zone} with {spawned} entities");
        spawned
    }

    /// Populate again if the zone's population dropped below the top-up share
    fn top_up(&mut self, scope: &mut LifecycleScope<'_>, policy: &mut ResetPolicy, zone: ZoneName) -> usize {
        let target = self.targets(scope.zones.descriptor(zone)).total() as f32;
        if (self.population.len() as f32) < target * self.config.top_up_ratio {
            log::debug!("{zone} population {} below top-up threshold", self.population.len());
            self.populate(scope, policy, zone)
        } else {
            0
        }
    }

    /// Stage entities of adjacent zones the player is close to
    fn prestage(
        &mut self,
        scope: &mut LifecycleScope<'_>,
        policy: &mut ResetPolicy,
        zone: ZoneName,
        altitude: f32,
    ) -> usize {
        let current = *scope.zones.descriptor(zone);
        let neighbours = [
            scope.zones.below(zone).map(|below| (*below, altitude - current.min_altitude)),
            scope.zones.above(zone).map(|above| (*above, current.max_altitude - altitude)),
        ];

        // Release buffered zones the player moved away from
        let clear_distance = self.config.clear_distance();
        self.buffered.retain(|buffered| {
            neighbours
                .iter()
                .flatten()
                .any(|(neighbour, distance)| neighbour.name == *buffered && *distance <= clear_distance)
        });

        let mut staged = 0;
        for (neighbour, distance) in neighbours.into_iter().flatten() {
            if distance > self.config.buffer_distance || self.buffered.contains(&neighbour.name) {
                continue;
            }
            self.buffered.insert(neighbour.name);
            staged += self.stage_zone(scope, policy, &neighbour);
        }
        staged
    }

    /// Spawns left before the global active ceiling
    fn headroom(&self, scope: &LifecycleScope<'_>) -> usize {
        (self.config.max_active_objects as usize).saturating_sub(scope.store().active_count())
    }

    fn stage_zone(&mut self, scope: &mut LifecycleScope<'_>, policy: &mut ResetPolicy, zone: &ZoneDescriptor) -> usize {
        let targets = self.targets(zone);
        let categories: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|category| {
                targets.get(*category) > 0 && Variant::characteristic_of(zone.name, *category).next().is_some()
            })
            .collect();
        if categories.is_empty() {
            return 0;
        }

        let quota = policy
            .rng()
            .gen_range(self.config.prestage_min..=self.config.prestage_max);
        let mut staged = 0;
        for _ in 0..quota {
            if self.headroom(scope) == 0 {
                log::debug!("Active ceiling reached while pre-staging {}", zone.name);
                break;
            }
            let category = categories[policy.rng().gen_range(0..categories.len())];
            let variants: Vec<Variant> = Variant::characteristic_of(zone.name, category).collect();
            let variant = variants[policy.rng().gen_range(0..variants.len())];
            if let Some(handle) = policy.spawn_faded(scope, variant) {
                self.prestaged.push((zone.name, category, handle));
                staged += 1;
            }
        }

        log::debug!("Pre-staged {staged} entities for {}", zone.name);
        staged
    }
}
