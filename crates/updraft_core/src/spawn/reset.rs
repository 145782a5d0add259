//! Entity reset policy
//!
//! Turns an acquired entity into a placed one. Steps run in a fixed order:
//!
//! 1. resolve the variant against the loaded assets (canonical fallback)
//! 2. display size from the variant table
//! 3. circular collider of half the smaller dimension
//! 4. clear rotation, alpha and any motion still registered
//! 5. position inside the playfield and the variant's altitude band
//! 6. drift velocity plus the category's recurring motion
//! 7. age registration under the given day
//! 8. face the drift direction
//!
//! Resetting the same entity twice leaves it with one age entry and one
//! set of motions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::Motion;
use crate::assets::VariantRegistry;
use crate::core::SpawnConfig;
use crate::entity::{EntityHandle, Variant};
use crate::foundation::math::Vec2;
use crate::scope::LifecycleScope;
use crate::spawn::BehaviorTable;
use crate::zone::ZoneName;

/// Per-category spawn rules
#[derive(Debug)]
pub struct ResetPolicy {
    config: SpawnConfig,
    behaviors: BehaviorTable,
    registry: VariantRegistry,
    rng: StdRng,
}

impl ResetPolicy {
    /// Create a policy; seeds from `config.rng_seed` when set
    pub fn new(config: SpawnConfig, behaviors: BehaviorTable, registry: VariantRegistry) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            behaviors,
            registry,
            rng,
        }
    }

    /// Behaviour table
    pub fn behaviors(&self) -> &BehaviorTable {
        &self.behaviors
    }

    /// Asset registry
    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    /// Shared randomness for spawn decisions
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Acquire and reset an entity of `variant` for the scope's current day
    ///
    /// Returns `None`, without touching the pool, when neither the variant
    /// nor its category's canonical variant has an asset.
    pub fn spawn(&mut self, scope: &mut LifecycleScope<'_>, variant: Variant) -> Option<EntityHandle> {
        let Some(resolved) = self.registry.resolve(variant) else {
            log::warn!("Abandoning {variant} spawn: no asset for it or its fallback");
            return None;
        };
        let handle = scope.pool.acquire(resolved);
        let day = scope.day;
        if self.reset(scope, handle, resolved, day) {
            log::debug!("Spawned {resolved} as {:?}", handle.id);
            Some(handle)
        } else {
            scope.retire(handle.id);
            None
        }
    }

    /// Spawn an entity that fades in instead of popping into view
    pub fn spawn_faded(&mut self, scope: &mut LifecycleScope<'_>, variant: Variant) -> Option<EntityHandle> {
        let handle = self.spawn(scope, variant)?;
        let motion = scope.animation.start(
            handle,
            Motion::FadeIn {
                duration: self.config.prestage_fade_in,
            },
        );
        if let Some(entity) = scope.pool.store_mut().resolve_mut(handle) {
            entity.alpha = 0.0;
            entity.add_motion(motion);
        }
        Some(handle)
    }

    /// Reset an active entity as `variant`, registering it under `day`
    ///
    /// Returns `false` if the handle is stale or the variant cannot be
    /// resolved; the entity is left untouched in that case.
    pub fn reset(
        &mut self,
        scope: &mut LifecycleScope<'_>,
        handle: EntityHandle,
        variant: Variant,
        day: u32,
    ) -> bool {
        let Some(variant) = self.registry.resolve(variant) else {
            log::warn!("Cannot reset {:?}: {variant} has no usable asset", handle.id);
            return false;
        };
        let behavior = *self.behaviors.get(variant.category());
        let spec = variant.spec();
        let (x, altitude, drift) = self.placement(scope, variant);
        let y = scope.altitude_to_y(altitude);

        let Some(entity) = scope.pool.store_mut().resolve_mut(handle) else {
            log::warn!("Cannot reset stale handle {handle:?}");
            return false;
        };
        if entity.category() != variant.category() {
            log::warn!("Cannot reset {} entity as {variant}", entity.category());
            return false;
        }

        entity.set_variant(variant);
        entity.size = Vec2::new(spec.width, spec.height);
        entity.collider_radius = spec.width.min(spec.height) * 0.5;
        entity.rotation = 0.0;
        entity.alpha = 1.0;
        let stale_motions = entity.take_motions();
        entity.position = Vec2::new(x, y);
        entity.velocity = Vec2::new(drift, 0.0);
        entity.flip_x = drift < 0.0;

        for motion in stale_motions {
            scope.animation.cancel(motion);
        }
        scope.animation.kill_tweens_of(handle.id);

        let motions: Vec<_> = [behavior.bob, behavior.sway]
            .into_iter()
            .flatten()
            .map(|motion| scope.animation.start(handle, motion))
            .collect();
        if let Some(entity) = scope.pool.store_mut().get_mut(handle.id) {
            for motion in motions {
                entity.add_motion(motion);
            }
        }

        scope.ages.register(handle.id, variant.category(), day);
        true
    }

    /// Random x, altitude and signed drift for `variant`
    fn placement(&mut self, scope: &LifecycleScope<'_>, variant: Variant) -> (f32, f32, f32) {
        let spec = variant.spec();
        let zone = self.pick_zone(spec.primary_zone, spec.secondary_zone);
        let band = scope.zones.descriptor(zone);

        let half_width = spec.width * 0.5;
        let left = self.config.horizontal_margin + half_width;
        let right = self.config.screen_width - self.config.horizontal_margin - half_width;
        let x = if left < right {
            self.rng.gen_range(left..=right)
        } else {
            self.config.screen_width * 0.5
        };

        let low = band.min_altitude + self.config.band_inset;
        let high = band.max_altitude - self.config.band_inset;
        let altitude = if low < high {
            self.rng.gen_range(low..=high)
        } else {
            self.rng.gen_range(band.min_altitude..=band.max_altitude)
        };

        let speed = self
            .rng
            .gen_range(self.config.drift_speed_min..=self.config.drift_speed_max);
        let drift = if self.rng.gen_bool(0.5) { speed } else { -speed };

        (x, altitude, drift)
    }

    fn pick_zone(&mut self, primary: ZoneName, secondary: Option<ZoneName>) -> ZoneName {
        match secondary {
            Some(secondary) if !self.rng.gen_bool(f64::from(self.config.primary_zone_weight)) => secondary,
            _ => primary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age::AgeTracker;
    use crate::animation::{AnimationService, MotionTimeline};
    use crate::core::{LifecycleConfig, PoolConfig};
    use crate::entity::Category;
    use crate::pool::EntityPool;
    use crate::zone::ZoneClassifier;

    struct Fixture {
        pool: EntityPool,
        ages: AgeTracker,
        timeline: MotionTimeline,
        zones: ZoneClassifier,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                pool: EntityPool::new(&PoolConfig::default()),
                ages: AgeTracker::new(),
                timeline: MotionTimeline::new(),
                zones: ZoneClassifier::new(LifecycleConfig::default().zones.zones).unwrap(),
            }
        }

        fn scope(&mut self, day: u32) -> LifecycleScope<'_> {
            LifecycleScope {
                pool: &mut self.pool,
                ages: &mut self.ages,
                animation: &mut self.timeline,
                zones: &self.zones,
                ground_reference: 0.0,
                day,
            }
        }
    }

    fn policy(registry: VariantRegistry) -> ResetPolicy {
        let config = SpawnConfig {
            rng_seed: Some(7),
            ..SpawnConfig::default()
        };
        ResetPolicy::new(config, BehaviorTable::default(), registry)
    }

    #[test]
    fn test_spawn_places_entity_in_band() {
        let mut fixture = Fixture::new();
        let mut policy = policy(VariantRegistry::all_available());
        let config = SpawnConfig::default();

        for _ in 0..50 {
            let mut scope = fixture.scope(1);
            let handle = policy.spawn(&mut scope, Variant::Blimp).unwrap();
            let entity = scope.store().resolve(handle).unwrap();
            let altitude = -entity.position.y;
            // Blimp only lives in Mid
            assert!((3_000.0..=6_000.0).contains(&altitude), "altitude {altitude}");
            assert!(entity.position.x >= config.horizontal_margin);
            assert!(entity.position.x <= config.screen_width - config.horizontal_margin);
            let speed = entity.velocity.x.abs();
            assert!((config.drift_speed_min..=config.drift_speed_max).contains(&speed));
            assert_eq!(entity.flip_x, entity.velocity.x < 0.0);
            assert_eq!(entity.velocity.y, 0.0);
        }
    }

    #[test]
    fn test_two_band_variant_uses_both_bands() {
        let mut fixture = Fixture::new();
        let mut policy = policy(VariantRegistry::all_available());
        let (mut primary, mut secondary) = (0, 0);
        for _ in 0..200 {
            let mut scope = fixture.scope(1);
            let handle = policy.spawn(&mut scope, Variant::Balloon).unwrap();
            let altitude = -scope.store().resolve(handle).unwrap().position.y;
            if altitude <= 1_000.0 {
                primary += 1;
            } else {
                assert!(altitude <= 3_000.0);
                secondary += 1;
            }
        }
        assert!(primary > secondary, "primary {primary} secondary {secondary}");
        assert!(secondary > 0);
    }

    #[test]
    fn test_spawn_sets_size_collider_and_motion() {
        let mut fixture = Fixture::new();
        let mut policy = policy(VariantRegistry::all_available());
        let mut scope = fixture.scope(3);
        let handle = policy.spawn(&mut scope, Variant::StormCloud).unwrap();

        let entity = scope.store().resolve(handle).unwrap();
        assert_eq!(entity.size, Vec2::new(220.0, 130.0));
        assert_eq!(entity.collider_radius, 65.0);
        // Clouds bob and sway
        assert_eq!(entity.motions().len(), 2);
        assert_eq!(scope.animation.motions_for(handle.id), 2);
        assert_eq!(scope.ages.created_day(handle.id), Some(3));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut fixture = Fixture::new();
        let mut policy = policy(VariantRegistry::all_available());
        let mut scope = fixture.scope(2);
        let handle = policy.spawn(&mut scope, Variant::Balloon).unwrap();
        assert!(policy.reset(&mut scope, handle, Variant::Balloon, 2));
        assert!(policy.reset(&mut scope, handle, Variant::Balloon, 2));

        let entity = scope.store().resolve(handle).unwrap();
        assert_eq!(entity.motions().len(), 1);
        assert_eq!(entity.collider_radius, 24.0);
        assert_eq!(scope.animation.active_count(), 1);
        assert_eq!(scope.ages.len(), 1);
    }

    #[test]
    fn test_missing_variant_falls_back() {
        let keys: Vec<_> = Variant::ALL
            .into_iter()
            .filter(|variant| *variant != Variant::Jet)
            .map(Variant::asset_key)
            .collect();
        let registry = VariantRegistry::from_available(keys, true).unwrap();
        let mut fixture = Fixture::new();
        let mut policy = policy(registry);
        let mut scope = fixture.scope(1);

        let handle = policy.spawn(&mut scope, Variant::Jet).unwrap();
        let entity = scope.store().resolve(handle).unwrap();
        assert_eq!(entity.variant(), Category::Flyer.canonical_variant());
        assert_eq!(entity.owner(), Category::Flyer.canonical_variant());
    }

    #[test]
    fn test_missing_variant_and_canonical_abandons() {
        let canonical = Category::Coin.canonical_variant();
        let keys: Vec<_> = Variant::ALL
            .into_iter()
            .filter(|variant| *variant != canonical && *variant != Variant::GoldCoin)
            .map(Variant::asset_key)
            .collect();
        let registry = VariantRegistry::from_available(keys, false).unwrap();
        let mut fixture = Fixture::new();
        let mut policy = policy(registry);
        let mut scope = fixture.scope(1);

        assert!(policy.spawn(&mut scope, Variant::GoldCoin).is_none());
        assert_eq!(scope.store().len(), 0, "abandoned spawn must not allocate");
        assert!(scope.ages.is_empty());
    }

    #[test]
    fn test_spawn_faded_starts_transparent() {
        let mut fixture = Fixture::new();
        let mut policy = policy(VariantRegistry::all_available());
        let mut scope = fixture.scope(1);
        let handle = policy.spawn_faded(&mut scope, Variant::Sparrow).unwrap();
        let entity = scope.store().resolve(handle).unwrap();
        assert_eq!(entity.alpha, 0.0);
        // Flyers have no recurring motion; only the fade is registered
        assert_eq!(entity.motions().len(), 1);
    }

    #[test]
    fn test_placement_is_relative_to_ground_reference() {
        let mut fixture = Fixture::new();
        let mut policy = policy(VariantRegistry::all_available());
        let mut scope = fixture.scope(1);
        scope.ground_reference = 1_000.0;
        let handle = policy.spawn(&mut scope, Variant::Blimp).unwrap();
        let y = scope.store().resolve(handle).unwrap().position.y;
        let altitude = 1_000.0 - y;
        assert!((3_000.0..=6_000.0).contains(&altitude), "altitude {altitude}");
    }
}
