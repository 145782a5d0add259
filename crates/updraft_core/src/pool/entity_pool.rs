//! Per-variant entity free-lists
//!
//! Entities are allocated once and recycled. Each variant owns a LIFO
//! free-list; an entity always returns to the list that allocated it.
//! Lists may hold at most `floor(initial × soft_cap_ratio)` entries and
//! anything released beyond that is destroyed.

use crate::animation::AnimationService;
use crate::core::PoolConfig;
use crate::entity::{Category, Entity, EntityHandle, EntityId, EntityStore, Variant};

const VARIANT_COUNT: usize = Variant::ALL.len();

#[derive(Debug, Clone, Default)]
struct FreeList {
    entries: Vec<EntityId>,
    initial: usize,
    soft_cap: usize,
}

/// Per-variant pool counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Entities ever allocated
    pub allocated: u64,
    /// Acquisitions served from the free-list
    pub reused: u64,
    /// Releases back to the free-list
    pub released: u64,
    /// Entities destroyed (over soft cap or aged out)
    pub destroyed: u64,
    /// Free-list entries dropped because their backing entity became invalid
    pub discarded_invalid: u64,
    /// Entities currently active
    pub active: usize,
    /// Highest simultaneous active count (over all variants in [`EntityPool::total_stats`])
    pub peak_active: usize,
}

impl PoolStats {
    fn merge(&mut self, other: &PoolStats) {
        self.allocated += other.allocated;
        self.reused += other.reused;
        self.released += other.released;
        self.destroyed += other.destroyed;
        self.discarded_invalid += other.discarded_invalid;
        self.active += other.active;
    }
}

/// What happened to a released entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Parked on its free-list
    Pooled,
    /// Free-list was full; the entity was destroyed
    Destroyed,
    /// The entity was not active (already released or gone)
    Ignored,
}

/// Result of [`EntityPool::audit_and_repair`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Entries discarded during this audit
    pub discarded: usize,
    /// Free-list length per variant after repair, in `Variant::ALL` order
    pub pooled: Vec<(Variant, usize)>,
}

/// Entity arena plus per-variant free-lists
#[derive(Debug)]
pub struct EntityPool {
    store: EntityStore,
    free_lists: [FreeList; VARIANT_COUNT],
    stats: [PoolStats; VARIANT_COUNT],
    active: usize,
    peak_active: usize,
}

impl EntityPool {
    /// Create empty free-lists sized from configuration
    pub fn new(config: &PoolConfig) -> Self {
        let mut free_lists: [FreeList; VARIANT_COUNT] = Default::default();
        for variant in Variant::ALL {
            let initial = config.initial_size.get(variant.category()) as usize;
            let list = &mut free_lists[variant as usize];
            list.initial = initial;
            list.soft_cap = (initial as f32 * config.soft_cap_ratio).floor() as usize;
            list.entries.reserve(list.soft_cap);
        }

        log::info!(
            "Created EntityPool for {} variants (soft cap ratio {})",
            VARIANT_COUNT,
            config.soft_cap_ratio
        );

        Self {
            store: EntityStore::new(),
            free_lists,
            stats: [PoolStats::default(); VARIANT_COUNT],
            active: 0,
            peak_active: 0,
        }
    }

    /// Fill the free-lists of `variants` up to their initial size
    pub fn prewarm(&mut self, variants: impl IntoIterator<Item = Variant>) -> usize {
        let mut created = 0;
        for variant in variants {
            let missing = self.initial_size(variant).saturating_sub(self.pooled(variant));
            created += self.allocate_pooled(variant, missing);
        }
        log::info!("Prewarmed pool with {created} entities");
        created
    }

    /// Take an entity of `variant` into the active world
    ///
    /// Pops the most recently released entity; invalid entries are
    /// discarded along the way. Allocates when the list is empty, so this
    /// never fails.
    pub fn acquire(&mut self, variant: Variant) -> EntityHandle {
        let index = variant as usize;
        let id = loop {
            match self.free_lists[index].entries.pop() {
                Some(id) if self.is_valid_entry(id, variant) => {
                    self.stats[index].reused += 1;
                    break id;
                }
                Some(id) => {
                    log::warn!("Discarding invalid pooled {variant} entity {id:?}");
                    self.stats[index].discarded_invalid += 1;
                }
                None => {
                    self.stats[index].allocated += 1;
                    log::debug!("Pool for {variant} empty, allocating");
                    break self.store.insert(Entity::new(variant));
                }
            }
        };

        let generation = match self.store.get_mut(id) {
            Some(entity) => entity.activate(),
            // Both arms above leave `id` in the store
            None => 0,
        };

        let stats = &mut self.stats[index];
        stats.active += 1;
        stats.peak_active = stats.peak_active.max(stats.active);
        self.active += 1;
        self.peak_active = self.peak_active.max(self.active);

        EntityHandle { id, generation }
    }

    /// Return an active entity to its free-list
    ///
    /// All animation targeting the entity is halted before it is
    /// deactivated, so nothing started for this activation can touch the
    /// next one.
    pub fn release(&mut self, id: EntityId, animation: &mut dyn AnimationService) -> ReleaseOutcome {
        let Some(entity) = self.store.get_mut(id).filter(|entity| entity.is_active()) else {
            log::debug!("Ignoring release of inactive entity {id:?}");
            return ReleaseOutcome::Ignored;
        };

        for motion in entity.take_motions() {
            animation.cancel(motion);
        }
        animation.kill_tweens_of(id);
        entity.deactivate();

        let owner = entity.owner();
        let index = owner as usize;
        self.stats[index].active = self.stats[index].active.saturating_sub(1);
        self.active = self.active.saturating_sub(1);

        let list = &mut self.free_lists[index];
        if list.entries.len() < list.soft_cap {
            list.entries.push(id);
            self.stats[index].released += 1;
            ReleaseOutcome::Pooled
        } else {
            self.store.remove(id);
            self.stats[index].destroyed += 1;
            log::debug!("Free-list for {owner} at soft cap {}, destroyed {id:?}", list.soft_cap);
            ReleaseOutcome::Destroyed
        }
    }

    /// Permanently destroy an entity, active or pooled
    pub fn destroy(&mut self, id: EntityId, animation: &mut dyn AnimationService) -> bool {
        let Some(mut entity) = self.store.remove(id) else {
            return false;
        };

        for motion in entity.take_motions() {
            animation.cancel(motion);
        }
        animation.kill_tweens_of(id);

        let index = entity.owner() as usize;
        if entity.is_active() {
            self.stats[index].active = self.stats[index].active.saturating_sub(1);
            self.active = self.active.saturating_sub(1);
        } else {
            self.free_lists[index].entries.retain(|entry| *entry != id);
        }
        self.stats[index].destroyed += 1;
        true
    }

    /// Drop free-list entries whose backing entity is gone or not poolable
    pub fn audit_and_repair(&mut self) -> AuditReport {
        let mut report = AuditReport::default();
        for variant in Variant::ALL {
            let index = variant as usize;
            let store = &self.store;
            let before = self.free_lists[index].entries.len();
            self.free_lists[index].entries.retain(|id| {
                store
                    .get(*id)
                    .is_some_and(|entity| entity.owner() == variant && entity.is_poolable())
            });
            let pooled = self.free_lists[index].entries.len();
            let discarded = before - pooled;
            self.stats[index].discarded_invalid += discarded as u64;
            report.discarded += discarded;
            report.pooled.push((variant, pooled));
        }
        log::debug!("Pool audit discarded {} invalid entries", report.discarded);
        report
    }

    /// Allocate up to `max` pooled entities for `variant`, never past its soft cap
    pub fn replenish(&mut self, variant: Variant, max: usize) -> usize {
        let room = self.soft_cap(variant).saturating_sub(self.pooled(variant));
        self.allocate_pooled(variant, room.min(max))
    }

    fn allocate_pooled(&mut self, variant: Variant, count: usize) -> usize {
        let index = variant as usize;
        for _ in 0..count {
            let id = self.store.insert(Entity::new(variant));
            self.free_lists[index].entries.push(id);
        }
        self.stats[index].allocated += count as u64;
        count
    }

    fn is_valid_entry(&self, id: EntityId, variant: Variant) -> bool {
        self.store
            .get(id)
            .is_some_and(|entity| entity.owner() == variant && entity.is_poolable())
    }

    /// Entity arena
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Mutable entity arena
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Entities parked on `variant`'s free-list
    pub fn pooled(&self, variant: Variant) -> usize {
        self.free_lists[variant as usize].entries.len()
    }

    /// Ids parked on `variant`'s free-list, most recently released last
    pub fn pooled_ids(&self, variant: Variant) -> &[EntityId] {
        &self.free_lists[variant as usize].entries
    }

    /// Entities parked on all free-lists of a category
    pub fn pooled_in(&self, category: Category) -> usize {
        category.variants().iter().map(|variant| self.pooled(*variant)).sum()
    }

    /// Configured initial size of `variant`'s free-list
    pub fn initial_size(&self, variant: Variant) -> usize {
        self.free_lists[variant as usize].initial
    }

    /// Maximum length of `variant`'s free-list
    pub fn soft_cap(&self, variant: Variant) -> usize {
        self.free_lists[variant as usize].soft_cap
    }

    /// Counters for one variant
    pub fn stats(&self, variant: Variant) -> &PoolStats {
        &self.stats[variant as usize]
    }

    /// Counters summed over all variants
    pub fn total_stats(&self) -> PoolStats {
        let mut total = PoolStats::default();
        for stats in &self.stats {
            total.merge(stats);
        }
        total.peak_active = self.peak_active;
        total
    }
}
