//! Lifecycle notifications
//!
//! The core queues events while it updates; the host drains them once per
//! frame. Registered handlers see each event first and may consume it
//! (returning `true` stops forwarding to later handlers of the same kind).
//! Drained events are returned to the caller whether or not a handler
//! consumed them.

use std::collections::HashMap;

use crate::entity::{AgeGroup, Category, Variant};
use crate::zone::ZoneName;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEventKind {
    /// Player entered a new zone
    ZoneChanged,
    /// Player consumed an entity
    EntityConsumed,
    /// Aged entities were destroyed
    AssetsPurged,
    /// Health monitor refilled free-lists
    PoolReplenished,
    /// A new day began
    DayStarted,
}

/// Notification emitted by the lifecycle manager
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// Zone classification changed
    ZoneChanged {
        /// Previous zone; `None` for the first classification of a day
        from: Option<ZoneName>,
        /// New zone
        to: ZoneName,
    },
    /// The player touched an entity and it was retired
    EntityConsumed {
        /// Category of the entity
        category: Category,
        /// Variant it was showing
        variant: Variant,
    },
    /// Day-restart purge destroyed aged entities
    AssetsPurged {
        /// Aging group that was purged
        group: AgeGroup,
        /// Entities destroyed
        count: usize,
    },
    /// Free-lists were replenished
    PoolReplenished {
        /// Variants that received entities
        variants: usize,
        /// Entities allocated
        entities: usize,
    },
    /// Day restart finished
    DayStarted {
        /// The new day
        day: u32,
    },
}

impl LifecycleEvent {
    /// Kind used for handler routing
    pub fn kind(&self) -> LifecycleEventKind {
        match self {
            LifecycleEvent::ZoneChanged { .. } => LifecycleEventKind::ZoneChanged,
            LifecycleEvent::EntityConsumed { .. } => LifecycleEventKind::EntityConsumed,
            LifecycleEvent::AssetsPurged { .. } => LifecycleEventKind::AssetsPurged,
            LifecycleEvent::PoolReplenished { .. } => LifecycleEventKind::PoolReplenished,
            LifecycleEvent::DayStarted { .. } => LifecycleEventKind::DayStarted,
        }
    }
}

/// Event handler trait
/// Returns true if the event was consumed (stops forwarding)
pub trait LifecycleEventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &LifecycleEvent) -> bool;
}

/// Queue of pending lifecycle events plus registered handlers
#[derive(Default)]
pub struct LifecycleEvents {
    queue: Vec<LifecycleEvent>,
    handlers: HashMap<LifecycleEventKind, Vec<Box<dyn LifecycleEventHandler>>>,
}

impl LifecycleEvents {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one kind of event
    pub fn register_handler(&mut self, kind: LifecycleEventKind, handler: Box<dyn LifecycleEventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Queue an event for this frame's dispatch
    pub fn send(&mut self, event: LifecycleEvent) {
        log::trace!("Queued {:?}", event.kind());
        self.queue.push(event);
    }

    /// Deliver every queued event to its handlers and hand them back
    pub fn dispatch(&mut self) -> Vec<LifecycleEvent> {
        let events = std::mem::take(&mut self.queue);
        for event in &events {
            if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
                for handler in handlers.iter_mut() {
                    if handler.on_event(event) {
                        break;
                    }
                }
            }
        }
        events
    }

    /// Events waiting for dispatch
    pub fn pending(&self) -> &[LifecycleEvent] {
        &self.queue
    }

    /// Drop queued events without delivering them
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl std::fmt::Debug for LifecycleEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEvents")
            .field("queue", &self.queue)
            .field("handler_kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Vec<LifecycleEvent>>>,
        consume: bool,
    }

    impl LifecycleEventHandler for Recorder {
        fn on_event(&mut self, event: &LifecycleEvent) -> bool {
            self.seen.borrow_mut().push(event.clone());
            self.consume
        }
    }

    #[test]
    fn test_dispatch_returns_events() {
        let mut events = LifecycleEvents::new();
        events.send(LifecycleEvent::DayStarted { day: 3 });
        events.send(LifecycleEvent::ZoneChanged { from: None, to: ZoneName::Ground });
        assert_eq!(events.pending().len(), 2);

        let drained = events.dispatch();
        assert_eq!(drained.len(), 2);
        assert!(events.pending().is_empty());
        assert_eq!(drained[0], LifecycleEvent::DayStarted { day: 3 });
    }

    #[test]
    fn test_handlers_only_see_their_kind() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut events = LifecycleEvents::new();
        events.register_handler(
            LifecycleEventKind::EntityConsumed,
            Box::new(Recorder { seen: Rc::clone(&seen), consume: false }),
        );

        events.send(LifecycleEvent::DayStarted { day: 1 });
        events.send(LifecycleEvent::EntityConsumed {
            category: Category::Coin,
            variant: Variant::GoldCoin,
        });
        events.dispatch();

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].kind(), LifecycleEventKind::EntityConsumed);
    }

    #[test]
    fn test_consumption_stops_forwarding() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut events = LifecycleEvents::new();
        events.register_handler(
            LifecycleEventKind::DayStarted,
            Box::new(Recorder { seen: Rc::clone(&first), consume: true }),
        );
        events.register_handler(
            LifecycleEventKind::DayStarted,
            Box::new(Recorder { seen: Rc::clone(&second), consume: false }),
        );

        events.send(LifecycleEvent::DayStarted { day: 2 });
        let drained = events.dispatch();

        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
        assert_eq!(drained.len(), 1, "consumed events are still returned");
    }
}
