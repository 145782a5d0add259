//! Scenario tests driving the full lifecycle manager

mod climb;
mod day_restart;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::animation::MotionTimeline;
use crate::core::{CategoryCounts, LifecycleConfig};
use crate::entity::EntityStore;
use crate::foundation::math::WorldBounds;
use crate::physics::{Overlap, PhysicsService, PlayerBody};
use crate::state::SessionState;
use crate::LifecycleManager;

/// Overlaps to report, one entry per frame
pub(crate) type OverlapQueue = Rc<RefCell<VecDeque<Vec<Overlap>>>>;

/// Physics that moves nothing and reports only the overlaps it is given
#[derive(Debug, Default)]
pub(crate) struct ScriptedPhysics {
    pub frames: OverlapQueue,
}

impl PhysicsService for ScriptedPhysics {
    fn world_bounds(&self) -> WorldBounds {
        WorldBounds::new(0.0, 800.0, -20_000.0, 0.0)
    }

    fn step(&mut self, _store: &mut EntityStore, _player: &mut PlayerBody, _dt: f32) -> Vec<Overlap> {
        self.frames.borrow_mut().pop_front().unwrap_or_default()
    }
}

/// Floaters and flyers only, density 0.5 everywhere, classification every frame
pub(crate) fn obstacle_config() -> LifecycleConfig {
    let mut config = LifecycleConfig::default();
    config.zones.catalog_max = CategoryCounts::new(20, 16, 0, 0, 0);
    config.zones.classify_interval_ticks = 1;
    for zone in &mut config.zones.zones {
        zone.density = 0.5;
    }
    config.pool.initial_size = CategoryCounts::new(8, 8, 4, 4, 4);
    config.spawn.rng_seed = Some(2024);
    config
}

pub(crate) fn scripted_manager(config: LifecycleConfig) -> LifecycleManager {
    scripted_with_queue(config).0
}

pub(crate) fn scripted_with_queue(config: LifecycleConfig) -> (LifecycleManager, OverlapQueue) {
    let physics = ScriptedPhysics::default();
    let queue = Rc::clone(&physics.frames);
    let manager = LifecycleManager::new(config, Box::new(physics), Box::new(MotionTimeline::new())).unwrap();
    (manager, queue)
}

pub(crate) fn session() -> SessionState {
    SessionState::new(0.0, 400.0, 16.0)
}
