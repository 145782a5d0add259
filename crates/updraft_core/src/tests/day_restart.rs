//! Day restart: aging, motion teardown and re-seating

use super::*;
use crate::animation::AnimationService;
use crate::entity::{AgeGroup, Category, EntityId};
use crate::events::LifecycleEvent;
use crate::foundation::math::Vec2;
use crate::physics::Overlap;
use crate::zone::ZoneName;

fn assert_no_motion_leak(manager: &LifecycleManager) {
    let animation = manager.animation();
    let mut owned = 0;
    for (id, entity) in manager.store().iter() {
        let registered = animation.motions_for(id);
        if entity.is_active() {
            assert_eq!(registered, entity.motions().len(), "{:?} motion mismatch", entity.variant());
            owned += registered;
        } else {
            assert_eq!(registered, 0, "pooled {:?} still animated", entity.variant());
        }
    }
    assert_eq!(owned, animation.active_count(), "orphaned motion registrations");
}

#[test]
fn test_age_purge_boundary() {
    let mut manager = scripted_manager(obstacle_config());
    let mut state = session();
    state.day = 2;
    manager.update(&mut state, 0.1);
    let original: Vec<EntityId> = manager.store().active_ids();
    assert_eq!(original.len(), 18);

    // Day 5: three days old, survives and is still counted toward Ground
    state.day = 5;
    let report = manager.update(&mut state, 0.1);
    assert_eq!(report.zone.unwrap().spawned, 0);
    assert!(original.iter().all(|id| manager.store().contains(*id)));
    assert!(original.iter().all(|id| manager.ages().created_day(*id) == Some(2)));
    let events = manager.drain_events();
    assert!(!events.iter().any(|event| matches!(event, LifecycleEvent::AssetsPurged { .. })));

    // Day 6: four days old, destroyed outright
    state.day = 6;
    let report = manager.update(&mut state, 0.1);
    assert!(original.iter().all(|id| !manager.store().contains(*id)));
    assert_eq!(report.zone.unwrap().spawned, 18);
    let events = manager.drain_events();
    assert!(events.contains(&LifecycleEvent::AssetsPurged {
        group: AgeGroup::Obstacles,
        count: 18
    }));
    assert!(events.contains(&LifecycleEvent::DayStarted { day: 6 }));
    assert!(manager.pool().total_stats().destroyed >= 18);
}

#[test]
fn test_collectibles_age_faster() {
    let mut config = obstacle_config();
    config.zones.catalog_max = CategoryCounts::new(0, 0, 0, 8, 0);
    let mut manager = scripted_manager(config);
    let mut state = session();
    manager.update(&mut state, 0.1);
    assert_eq!(manager.stats().active.coin, 4);

    state.day = 3;
    manager.update(&mut state, 0.1);
    let events = manager.drain_events();
    assert!(events.contains(&LifecycleEvent::AssetsPurged {
        group: AgeGroup::Collectibles,
        count: 4
    }));
}

#[test]
fn test_day_restart_halts_motion_before_reseat() {
    let mut manager = scripted_manager(obstacle_config());
    let mut state = session();
    manager.update(&mut state, 0.1);
    // Floaters bob; flyers carry no recurring motion
    assert_eq!(manager.animation().active_count(), 10);
    assert_no_motion_leak(&manager);

    state.next_day();
    manager.update(&mut state, 0.1);
    assert_eq!(manager.animation().active_count(), 10);
    assert_no_motion_leak(&manager);
    for (_, entity) in manager.store().iter_active() {
        let expected = usize::from(entity.category() == Category::Floater);
        assert_eq!(entity.motions().len(), expected);
    }
}

#[test]
fn test_reuse_does_not_inherit_motion() {
    let mut manager = scripted_manager(obstacle_config());
    let mut state = session();
    manager.update(&mut state, 0.1);

    assert_eq!(manager.force_cleanup(Category::Floater, &state), 10);
    assert_eq!(manager.stats().active.floater, 0);
    assert_eq!(manager.animation().active_count(), 0);
    assert_no_motion_leak(&manager);

    // Steady-state top-up stays off (8 of 18 left); a new day repopulates from the pool
    state.next_day();
    manager.update(&mut state, 0.1);
    assert_eq!(manager.stats().active.floater, 10);
    assert!(manager.pool().stats(crate::entity::Variant::Balloon).reused >= 10);
    assert_no_motion_leak(&manager);
}

#[test]
fn test_collision_retires_before_top_up() {
    let (mut manager, queue) = scripted_with_queue(obstacle_config());
    let mut state = session();
    manager.update(&mut state, 0.1);

    let handles: Vec<_> = manager
        .store()
        .active_ids()
        .into_iter()
        .take(16)
        .filter_map(|id| manager.store().handle(id))
        .collect();
    let overlaps = handles
        .iter()
        .map(|handle| Overlap { entity: *handle, depth: 1.0 })
        .collect();
    queue.borrow_mut().push_back(overlaps);

    let report = manager.update(&mut state, 0.1);
    assert_eq!(report.consumed.len(), 16);
    // Two left is under 15% of 18, so the same frame refills
    assert_eq!(report.zone.unwrap().spawned, 16);
    assert_eq!(manager.store().active_count(), 18);
    assert_no_motion_leak(&manager);

    // The same overlaps again are stale: reused entities carry new generations
    let overlaps = handles
        .iter()
        .map(|handle| Overlap { entity: *handle, depth: 1.0 })
        .collect();
    queue.borrow_mut().push_back(overlaps);
    let report = manager.update(&mut state, 0.1);
    assert!(report.consumed.is_empty());
}

#[test]
fn test_floater_contact_through_manager() {
    let (mut manager, queue) = scripted_with_queue(obstacle_config());
    let mut state = session();
    manager.update(&mut state, 0.1);
    manager.drain_events();

    let floater = manager
        .store()
        .iter_active()
        .find(|(_, entity)| entity.category() == Category::Floater)
        .and_then(|(id, _)| manager.store().handle(id))
        .unwrap();
    queue
        .borrow_mut()
        .push_back(vec![Overlap { entity: floater, depth: 2.0 }]);
    state.player.velocity = Vec2::new(100.0, -50.0);

    manager.update(&mut state, 0.1);
    assert_eq!(state.player.velocity, Vec2::new(150.0, -290.0));
    assert!(manager.store().resolve(floater).is_none());
    assert!(!manager.ages().contains(floater.id));
    let events = manager.drain_events();
    assert!(events
        .iter()
        .any(|event| matches!(event, LifecycleEvent::EntityConsumed { category: Category::Floater, .. })));
}

#[test]
fn test_survivors_keep_creation_day() {
    let mut manager = scripted_manager(obstacle_config());
    let mut state = session();
    manager.update(&mut state, 0.1);
    let tracked: Vec<_> = manager.ages().iter().collect();
    assert_eq!(tracked.len(), 18);
    assert!(tracked.iter().all(|(_, day)| *day == 1));

    state.next_day();
    manager.update(&mut state, 0.1);
    // Survivors keep their creation day through the re-seat
    assert!(manager.ages().iter().all(|(_, day)| day == 1));
}

#[test]
fn test_restart_on_ground_after_high_climb() {
    let mut config = LifecycleConfig::default();
    config.zones.classify_interval_ticks = 1;
    config.spawn.rng_seed = Some(3);
    let mut manager = scripted_manager(config);
    let mut state = session();
    manager.update(&mut state, 0.1);

    state.set_altitude(4_000.0);
    manager.update(&mut state, 0.1);
    assert_eq!(manager.current_zone(), Some(ZoneName::Mid));

    state.next_day();
    state.set_altitude(0.0);
    let report = manager.update(&mut state, 0.1);
    assert_eq!(manager.current_zone(), Some(ZoneName::Ground));
    assert!(report.zone.unwrap().reclaimed > 0);
    assert!(manager
        .store()
        .iter_active()
        .all(|(_, entity)| entity.variant().spec().primary_zone == ZoneName::Ground));
    // Nothing left over from Mid eats into the Ground population
    assert_eq!(manager.stats().active, CategoryCounts::new(10, 8, 0, 12, 0));
    assert_no_motion_leak(&manager);
}
