//! Ground to Low climb

use super::*;
use crate::events::LifecycleEvent;
use crate::zone::ZoneName;

#[test]
fn test_ground_to_low_climb() {
    let mut manager = scripted_manager(obstacle_config());
    let mut state = session();

    // First classification populates Ground
    let report = manager.update(&mut state, 1.0 / 60.0);
    let zone = report.zone.unwrap();
    assert_eq!(zone.changed, Some((None, ZoneName::Ground)));
    let stats = manager.stats();
    assert_eq!(stats.active.floater, 10);
    assert_eq!(stats.active.flyer, 8);
    assert_eq!(stats.tracked, 18);
    assert!(manager
        .store()
        .iter_active()
        .all(|(_, entity)| entity.variant().spec().primary_zone == ZoneName::Ground));

    // Within 500 of the Low boundary
    state.set_altitude(550.0);
    let staged = manager.update(&mut state, 1.0 / 60.0).zone.unwrap().prestaged;
    assert!((3..=5).contains(&staged), "pre-staged {staged}");
    assert_eq!(manager.stats().buffered_zones, vec![ZoneName::Low]);
    assert_eq!(manager.store().active_count(), 18 + staged);
    let faded = manager
        .store()
        .iter_active()
        .filter(|(_, entity)| entity.variant().spec().primary_zone == ZoneName::Low)
        .count();
    assert_eq!(faded, staged);

    // Closer still: nothing more is staged
    state.set_altitude(800.0);
    assert_eq!(manager.update(&mut state, 1.0 / 60.0).zone.unwrap().prestaged, 0);

    // Cross into Low
    state.set_altitude(1_200.0);
    let zone = manager.update(&mut state, 1.0 / 60.0).zone.unwrap();
    assert_eq!(zone.changed, Some((Some(ZoneName::Ground), ZoneName::Low)));
    assert_eq!(zone.reclaimed, 18);
    assert_eq!(zone.spawned + staged, 18);

    let stats = manager.stats();
    assert_eq!(stats.current_zone, Some(ZoneName::Low));
    assert_eq!(stats.active.floater + stats.active.flyer, 18);
    assert!(manager
        .store()
        .iter_active()
        .all(|(_, entity)| entity.variant().spec().primary_zone == ZoneName::Low));

    let events = manager.drain_events();
    assert!(events.contains(&LifecycleEvent::ZoneChanged {
        from: Some(ZoneName::Ground),
        to: ZoneName::Low
    }));
    assert!(events.contains(&LifecycleEvent::DayStarted { day: 1 }));
}

#[test]
fn test_entering_space_leaves_no_ground_tier() {
    let mut manager = scripted_manager(obstacle_config());
    let mut state = session();
    manager.update(&mut state, 1.0 / 60.0);

    state.set_altitude(12_000.0);
    let zone = manager.update(&mut state, 1.0 / 60.0).zone.unwrap();
    assert_eq!(zone.changed, Some((Some(ZoneName::Ground), ZoneName::Space)));
    assert!(manager
        .store()
        .iter_active()
        .all(|(_, entity)| !entity.variant().is_ground_tier()));
}

#[test]
fn test_zone_changed_handler_sees_transition() {
    use crate::events::{LifecycleEventHandler, LifecycleEventKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct ZoneLog(Rc<RefCell<Vec<ZoneName>>>);

    impl LifecycleEventHandler for ZoneLog {
        fn on_event(&mut self, event: &LifecycleEvent) -> bool {
            if let LifecycleEvent::ZoneChanged { to, .. } = event {
                self.0.borrow_mut().push(*to);
            }
            false
        }
    }

    let zones = Rc::new(RefCell::new(Vec::new()));
    let mut manager = scripted_manager(obstacle_config());
    manager.register_handler(LifecycleEventKind::ZoneChanged, Box::new(ZoneLog(Rc::clone(&zones))));
    let mut state = session();

    manager.update(&mut state, 0.1);
    state.set_altitude(4_000.0);
    manager.update(&mut state, 0.1);
    manager.drain_events();

    assert_eq!(*zones.borrow(), vec![ZoneName::Ground, ZoneName::Mid]);
}
