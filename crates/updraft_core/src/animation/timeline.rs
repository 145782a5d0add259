//! Motion timeline
//!
//! Keeps motion registrations keyed by [`MotionId`] and applies them to the
//! entity store each frame. Oscillations are applied as deltas of the
//! offset, so they compose with the drift the physics step integrates.

use std::collections::HashMap;
use std::f32::consts::TAU;

use crate::animation::{AnimationService, Motion, MotionId};
use crate::entity::{EntityHandle, EntityId, EntityStore};

#[derive(Debug, Clone)]
struct MotionSlot {
    target: EntityHandle,
    motion: Motion,
    elapsed: f32,
    /// Offset applied so far; the next frame applies only the difference
    applied: f32,
}

/// Counters for debugging motion leaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineStats {
    /// Registrations ever started
    pub started: u64,
    /// Registrations cancelled explicitly or by a kill
    pub cancelled: u64,
    /// One-shots that ran to completion
    pub completed: u64,
    /// Registrations dropped because their target was retired or reused
    pub stale_dropped: u64,
}

/// In-process [`AnimationService`]
#[derive(Debug, Default)]
pub struct MotionTimeline {
    slots: HashMap<MotionId, MotionSlot>,
    next_id: u64,
    stats: TimelineStats,
}

impl MotionTimeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters
    pub fn stats(&self) -> TimelineStats {
        self.stats
    }

    fn next_id(&mut self) -> MotionId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        MotionId(id)
    }
}

fn oscillation(amplitude: f32, period: f32, elapsed: f32) -> f32 {
    amplitude * (TAU * elapsed / period).sin()
}

impl AnimationService for MotionTimeline {
    fn start(&mut self, target: EntityHandle, motion: Motion) -> MotionId {
        let id = self.next_id();
        self.slots.insert(
            id,
            MotionSlot {
                target,
                motion,
                elapsed: 0.0,
                applied: 0.0,
            },
        );
        self.stats.started += 1;
        id
    }

    fn cancel(&mut self, id: MotionId) -> bool {
        let removed = self.slots.remove(&id).is_some();
        if removed {
            self.stats.cancelled += 1;
        }
        removed
    }

    fn kill_tweens_of(&mut self, entity: EntityId) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.target.id != entity);
        let killed = before - self.slots.len();
        self.stats.cancelled += killed as u64;
        killed
    }

    fn kill_all(&mut self) -> usize {
        let killed = self.slots.len();
        self.slots.clear();
        self.stats.cancelled += killed as u64;
        killed
    }

    fn advance(&mut self, store: &mut EntityStore, dt: f32) {
        let mut finished = Vec::new();
        let mut stale = 0u64;

        for (id, slot) in &mut self.slots {
            // Generation check: never touch an entity that was reused
            let Some(entity) = store.resolve_mut(slot.target) else {
                finished.push(*id);
                stale += 1;
                continue;
            };

            slot.elapsed += dt;
            match slot.motion {
                Motion::Bob { amplitude, period } => {
                    let offset = oscillation(amplitude, period, slot.elapsed);
                    entity.position.y += offset - slot.applied;
                    slot.applied = offset;
                }
                Motion::Sway { amplitude, period } => {
                    let offset = oscillation(amplitude, period, slot.elapsed);
                    entity.position.x += offset - slot.applied;
                    slot.applied = offset;
                }
                Motion::FadeIn { duration } => {
                    let progress = if duration > 0.0 {
                        (slot.elapsed / duration).min(1.0)
                    } else {
                        1.0
                    };
                    entity.alpha = progress;
                    if progress >= 1.0 {
                        entity.remove_motion(*id);
                        finished.push(*id);
                        self.stats.completed += 1;
                    }
                }
            }
        }

        for id in finished {
            self.slots.remove(&id);
        }
        if stale > 0 {
            log::debug!("Dropped {stale} stale motion registrations");
            self.stats.stale_dropped += stale;
        }
    }

    fn motions_for(&self, entity: EntityId) -> usize {
        self.slots
            .values()
            .filter(|slot| slot.target.id == entity)
            .count()
    }

    fn active_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, Variant};
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;

    fn live_entity(store: &mut EntityStore, variant: Variant) -> EntityHandle {
        let id = store.insert(Entity::new(variant));
        let generation = store.get_mut(id).unwrap().activate();
        EntityHandle { id, generation }
    }

    #[test]
    fn test_bob_moves_vertically() {
        let mut store = EntityStore::new();
        let handle = live_entity(&mut store, Variant::Balloon);
        store.get_mut(handle.id).unwrap().position = Vec2::new(100.0, -500.0);

        let mut timeline = MotionTimeline::new();
        timeline.start(handle, Motion::Bob { amplitude: 10.0, period: 4.0 });
        // Quarter period reaches the peak
        timeline.advance(&mut store, 1.0);

        let entity = store.get(handle.id).unwrap();
        assert_relative_eq!(entity.position.y, -490.0, epsilon = 1e-3);
        assert_relative_eq!(entity.position.x, 100.0);
    }

    #[test]
    fn test_fade_in_completes_and_unregisters() {
        let mut store = EntityStore::new();
        let handle = live_entity(&mut store, Variant::GoldCoin);
        store.get_mut(handle.id).unwrap().alpha = 0.0;

        let mut timeline = MotionTimeline::new();
        let fade = timeline.start(handle, Motion::FadeIn { duration: 0.5 });
        store.get_mut(handle.id).unwrap().add_motion(fade);
        timeline.advance(&mut store, 0.25);
        assert_relative_eq!(store.get(handle.id).unwrap().alpha, 0.5);
        timeline.advance(&mut store, 0.5);
        assert_relative_eq!(store.get(handle.id).unwrap().alpha, 1.0);
        assert_eq!(timeline.active_count(), 0);
        assert_eq!(timeline.stats().completed, 1);
        assert!(store.get(handle.id).unwrap().motions().is_empty());
    }

    #[test]
    fn test_stale_registration_is_not_applied() {
        let mut store = EntityStore::new();
        let handle = live_entity(&mut store, Variant::Cumulus);
        let mut timeline = MotionTimeline::new();
        timeline.start(handle, Motion::Sway { amplitude: 30.0, period: 2.0 });

        // Retire and reuse the entity without cancelling the sway
        let entity = store.get_mut(handle.id).unwrap();
        entity.deactivate();
        entity.activate();
        entity.position = Vec2::new(50.0, -50.0);

        timeline.advance(&mut store, 0.5);
        assert_eq!(store.get(handle.id).unwrap().position, Vec2::new(50.0, -50.0));
        assert_eq!(timeline.active_count(), 0);
        assert_eq!(timeline.stats().stale_dropped, 1);
    }

    #[test]
    fn test_kill_tweens_of_only_hits_target() {
        let mut store = EntityStore::new();
        let a = live_entity(&mut store, Variant::Balloon);
        let b = live_entity(&mut store, Variant::Balloon);
        let mut timeline = MotionTimeline::new();
        timeline.start(a, Motion::Bob { amplitude: 5.0, period: 1.0 });
        timeline.start(a, Motion::FadeIn { duration: 1.0 });
        timeline.start(b, Motion::Bob { amplitude: 5.0, period: 1.0 });

        assert_eq!(timeline.kill_tweens_of(a.id), 2);
        assert_eq!(timeline.motions_for(a.id), 0);
        assert_eq!(timeline.motions_for(b.id), 1);
        assert_eq!(timeline.kill_all(), 1);
        assert_eq!(timeline.stats().cancelled, 3);
    }

    #[test]
    fn test_cancel_twice() {
        let mut store = EntityStore::new();
        let handle = live_entity(&mut store, Variant::Jet);
        let mut timeline = MotionTimeline::new();
        let id = timeline.start(handle, Motion::FadeIn { duration: 1.0 });
        assert!(timeline.cancel(id));
        assert!(!timeline.cancel(id));
    }
}
