//! # Lifecycle Manager
//!
//! Owns every mutable lifecycle collection and runs them in a fixed order
//! each frame:
//!
//! ```text
//! physics step ──► collision resolve ──► animation advance
//!                                              │
//!          (classify period) zone classify ◄───┘
//!                     │
//!          (health period) pool audit / replenish
//! ```
//!
//! Collision retirement therefore always lands before the same frame's
//! top-up check. Day restart halts every motion registration before any
//! entity is purged or re-seated.

use crate::age::AgeTracker;
use crate::animation::AnimationService;
use crate::assets::VariantRegistry;
use crate::collision::{CollisionResolver, Consumed};
use crate::core::{CategoryCounts, LifecycleConfig, LifecycleError};
use crate::entity::{AgeGroup, Category, EntityId, EntityStore};
use crate::events::{LifecycleEvent, LifecycleEventHandler, LifecycleEventKind, LifecycleEvents};
use crate::physics::PhysicsService;
use crate::pool::{EntityPool, PoolHealthMonitor, PoolHealthReport, PoolStats};
use crate::scope::LifecycleScope;
use crate::spawn::{BehaviorTable, ResetPolicy};
use crate::state::GameState;
use crate::zone::{ZoneClassifier, ZoneName, ZoneSpawnController, ZoneUpdate};

/// Snapshot for UI and debugging
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleStats {
    /// Frames processed
    pub tick: u64,
    /// Day of the last restart
    pub day: Option<u32>,
    /// Zone of the last classification
    pub current_zone: Option<ZoneName>,
    /// Zones pre-staged and not yet cleared
    pub buffered_zones: Vec<ZoneName>,
    /// Active entities per category
    pub active: CategoryCounts,
    /// Pooled entities per category
    pub pooled: CategoryCounts,
    /// Entities with an age entry
    pub tracked: usize,
    /// Pool counters summed over every variant
    pub pool: PoolStats,
}

/// What one frame did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Entities consumed by the player
    pub consumed: Vec<Consumed>,
    /// Zone controller result, on classification frames
    pub zone: Option<ZoneUpdate>,
    /// Health monitor result, on health-check frames
    pub health: Option<PoolHealthReport>,
}

/// Collections borrowed together by a [`LifecycleScope`]
struct Collections {
    pool: EntityPool,
    ages: AgeTracker,
    animation: Box<dyn AnimationService>,
    zones: ZoneClassifier,
}

impl Collections {
    fn scope(&mut self, ground_reference: f32, day: u32) -> LifecycleScope<'_> {
        LifecycleScope {
            pool: &mut self.pool,
            ages: &mut self.ages,
            animation: self.animation.as_mut(),
            zones: &self.zones,
            ground_reference,
            day,
        }
    }
}

/// Runtime entity-lifecycle manager
pub struct LifecycleManager {
    config: LifecycleConfig,
    collections: Collections,
    policy: ResetPolicy,
    controller: ZoneSpawnController,
    resolver: CollisionResolver,
    monitor: PoolHealthMonitor,
    physics: Box<dyn PhysicsService>,
    events: LifecycleEvents,
    tick: u64,
    classify_countdown: u64,
    day: Option<u32>,
}

impl LifecycleManager {
    /// Validate configuration and build every subsystem
    pub fn new(
        config: LifecycleConfig,
        physics: Box<dyn PhysicsService>,
        animation: Box<dyn AnimationService>,
    ) -> Result<Self, LifecycleError> {
        config.validate()?;
        let zones = ZoneClassifier::new(config.zones.zones.clone())?;
        let registry = VariantRegistry::from_config(&config.assets)?;
        let behaviors = BehaviorTable::new(&config.spawn, &config.collision);

        let mut pool = EntityPool::new(&config.pool);
        if config.pool.prewarm {
            pool.prewarm(registry.native_variants());
        }

        let bounds = physics.world_bounds();
        if bounds.width() < config.spawn.screen_width {
            log::warn!(
                "World is {} wide but spawns use a {} wide screen",
                bounds.width(),
                config.spawn.screen_width
            );
        }

        log::info!(
            "Created LifecycleManager: {} zones up to altitude {}, {} pooled entities",
            zones.zones().len(),
            zones.ceiling(),
            pool.store().len()
        );

        Ok(Self {
            policy: ResetPolicy::new(config.spawn.clone(), behaviors.clone(), registry),
            controller: ZoneSpawnController::new(&config.zones),
            resolver: CollisionResolver::new(&config.collision, behaviors),
            monitor: PoolHealthMonitor::new(&config.pool),
            collections: Collections {
                pool,
                ages: AgeTracker::new(),
                animation,
                zones,
            },
            physics,
            events: LifecycleEvents::new(),
            tick: 0,
            classify_countdown: 0,
            day: None,
            config,
        })
    }

    /// Advance one frame
    ///
    /// A change of `state.current_day()` since the last frame triggers
    /// [`LifecycleManager::start_day`] first.
    pub fn update(&mut self, state: &mut dyn GameState, dt: f32) -> FrameReport {
        if self.day != Some(state.current_day()) {
            self.start_day(state);
        }
        self.tick += 1;
        let mut report = FrameReport::default();

        let overlaps = self
            .physics
            .step(self.collections.pool.store_mut(), state.player_mut(), dt);

        let ground_reference = state.ground_reference();
        let day = state.current_day();
        {
            let mut scope = self.collections.scope(ground_reference, day);
            report.consumed = self.resolver.resolve(&mut scope, state, &overlaps);
        }
        for consumed in &report.consumed {
            self.events.send(LifecycleEvent::EntityConsumed {
                category: consumed.category,
                variant: consumed.variant,
            });
        }

        let Collections { pool, animation, .. } = &mut self.collections;
        animation.advance(pool.store_mut(), dt);

        if self.classify_countdown == 0 {
            self.classify_countdown = self.config.zones.classify_interval_ticks;
            let altitude = state.player_altitude();
            let mut scope = self.collections.scope(ground_reference, day);
            let update = self.controller.update(&mut scope, &mut self.policy, altitude);
            if let Some((from, to)) = update.changed {
                self.events.send(LifecycleEvent::ZoneChanged { from, to });
            }
            report.zone = Some(update);
        }
        self.classify_countdown -= 1;

        if self.monitor.tick() {
            let health = self
                .monitor
                .check(&mut self.collections.pool, self.policy.registry().native_variants());
            if !health.replenished.is_empty() {
                self.events.send(LifecycleEvent::PoolReplenished {
                    variants: health.replenished.len(),
                    entities: health.replenished_total(),
                });
            }
            report.health = Some(health);
        }

        log::trace!(
            "Tick {}: {} active, {} motions",
            self.tick,
            self.collections.pool.store().active_count(),
            self.collections.animation.active_count()
        );
        report
    }

    /// Restart for `state.current_day()`
    ///
    /// Halts all motion, destroys aged entities per group, re-seats the
    /// survivors (fresh placement and motion, creation day kept) and resets
    /// the zone state machine so the next frame repopulates.
    pub fn start_day(&mut self, state: &dyn GameState) {
        let day = state.current_day();
        let ground_reference = state.ground_reference();

        let halted = self.collections.animation.kill_all();
        for (_, entity) in self.collections.pool.store_mut().iter_mut() {
            entity.take_motions();
        }

        let groups = [
            (AgeGroup::Obstacles, self.config.aging.obstacle_max_age_days),
            (AgeGroup::Collectibles, self.config.aging.collectible_max_age_days),
        ];
        let mut scope = self.collections.scope(ground_reference, day);
        for (group, max_age) in groups {
            let expired = scope.ages.purge_older_than(group, max_age, day);
            for id in &expired {
                scope.destroy(*id);
            }
            if !expired.is_empty() {
                log::info!("Purged {} aged {group:?} entities on day {day}", expired.len());
                self.events.send(LifecycleEvent::AssetsPurged {
                    group,
                    count: expired.len(),
                });
            }
        }

        let survivors: Vec<_> = scope
            .store()
            .iter_active()
            .map(|(id, entity)| (id, entity.variant()))
            .collect();
        for (id, variant) in &survivors {
            let Some(handle) = scope.store().handle(*id) else {
                continue;
            };
            match scope.ages.created_day(*id) {
                Some(created) => {
                    self.policy.reset(&mut scope, handle, *variant, created);
                }
                None => {
                    // Untracked entities stay exempt from aging
                    self.policy.reset(&mut scope, handle, *variant, day);
                    scope.ages.remove(*id);
                }
            }
        }

        self.controller.reset();
        self.classify_countdown = 0;
        self.day = Some(day);
        log::info!(
            "Day {day} started: halted {halted} motions, re-seated {} entities",
            survivors.len()
        );
        self.events.send(LifecycleEvent::DayStarted { day });
    }

    /// Retire every active entity of `category`; returns how many
    pub fn force_cleanup(&mut self, category: Category, state: &dyn GameState) -> usize {
        let mut scope = self
            .collections
            .scope(state.ground_reference(), state.current_day());
        let ids: Vec<EntityId> = scope
            .store()
            .iter_active()
            .filter(|(_, entity)| entity.category() == category)
            .map(|(id, _)| id)
            .collect();
        for id in &ids {
            scope.retire(*id);
        }
        log::info!("Force cleanup retired {} {category} entities", ids.len());
        ids.len()
    }

    /// Register a handler for one kind of lifecycle event
    pub fn register_handler(&mut self, kind: LifecycleEventKind, handler: Box<dyn LifecycleEventHandler>) {
        self.events.register_handler(kind, handler);
    }

    /// Deliver queued events to handlers and return them
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.dispatch()
    }

    /// Snapshot of the current state
    pub fn stats(&self) -> LifecycleStats {
        let pool = &self.collections.pool;
        let mut active = CategoryCounts::default();
        let mut pooled = CategoryCounts::default();
        for category in Category::ALL {
            *active.get_mut(category) = pool.store().active_in(category) as u32;
            *pooled.get_mut(category) = pool.pooled_in(category) as u32;
        }

        LifecycleStats {
            tick: self.tick,
            day: self.day,
            current_zone: self.controller.current_zone(),
            buffered_zones: self.controller.buffered_zones().collect(),
            active,
            pooled,
            tracked: self.collections.ages.len(),
            pool: pool.total_stats(),
        }
    }

    /// Zone of the last classification
    pub fn current_zone(&self) -> Option<ZoneName> {
        self.controller.current_zone()
    }

    /// Entity arena
    pub fn store(&self) -> &EntityStore {
        self.collections.pool.store()
    }

    /// Entity pool
    pub fn pool(&self) -> &EntityPool {
        &self.collections.pool
    }

    /// Age tracker
    pub fn ages(&self) -> &AgeTracker {
        &self.collections.ages
    }

    /// Animation service
    pub fn animation(&self) -> &dyn AnimationService {
        self.collections.animation.as_ref()
    }

    /// Zone table
    pub fn zones(&self) -> &ZoneClassifier {
        &self.collections.zones
    }

    /// Active configuration
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("tick", &self.tick)
            .field("day", &self.day)
            .field("current_zone", &self.controller.current_zone())
            .field("active", &self.collections.pool.store().active_count())
            .finish_non_exhaustive()
    }
}
