//! Asset age tracking
//!
//! Remembers the in-game day each active entity was (re)spawned. The
//! day-restart purge destroys entities whose age reached their group's
//! limit; it is the only path that destroys active entities outright.

use std::collections::HashMap;

use crate::entity::{AgeGroup, Category, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AgeEntry {
    created_day: u32,
    category: Category,
}

/// Entity id to creation-day map
#[derive(Debug, Default)]
pub struct AgeTracker {
    entries: HashMap<EntityId, AgeEntry>,
}

impl AgeTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as created on `day`, replacing any earlier entry
    pub fn register(&mut self, id: EntityId, category: Category, day: u32) {
        self.entries.insert(id, AgeEntry { created_day: day, category });
    }

    /// Forget `id`; returns its creation day if it was tracked
    pub fn remove(&mut self, id: EntityId) -> Option<u32> {
        self.entries.remove(&id).map(|entry| entry.created_day)
    }

    /// Creation day of `id`
    pub fn created_day(&self, id: EntityId) -> Option<u32> {
        self.entries.get(&id).map(|entry| entry.created_day)
    }

    /// Remove and return every id in `group` with `current_day - created >= max_age`
    ///
    /// The ids are sorted so the caller destroys them in a stable order.
    pub fn purge_older_than(&mut self, group: AgeGroup, max_age: u32, current_day: u32) -> Vec<EntityId> {
        let mut expired: Vec<EntityId> = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                entry.category.age_group() == group
                    && current_day.saturating_sub(entry.created_day) >= max_age
            })
            .map(|(id, _)| *id)
            .collect();
        expired.sort_unstable();

        for id in &expired {
            self.entries.remove(id);
        }
        expired
    }

    /// Tracked entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked ids with their creation day
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, u32)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, entry.created_day))
    }

    /// Whether `id` is tracked
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }
}
