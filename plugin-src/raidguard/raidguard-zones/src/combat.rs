//! Combat restriction: one non-spatial countdown per entity, started by PvP damage.
//!
//! Advanced by the same scheduler pass as raid memberships; it has no timer of its own.

use crate::notifier::UiNotifier;
use raidguard_types::{EntityId, Ticks};
use std::collections::HashMap;

pub struct CombatTracker {
    /// Invariant: every stored countdown is > 0.
    timers: HashMap<EntityId, Ticks>,
    notifier: Box<dyn UiNotifier>,
}

impl CombatTracker {
    #[must_use]
    pub fn new(notifier: Box<dyn UiNotifier>) -> Self {
        Self {
            timers: HashMap::new(),
            notifier,
        }
    }

    /// Start or refresh the entity's combat countdown. Never shortens a running one.
    pub fn start(&mut self, entity: EntityId, duration: Ticks) {
        if duration == 0 {
            return;
        }
        let remaining = self.timers.entry(entity).or_insert(0);
        *remaining = (*remaining).max(duration);
        let remaining = *remaining;
        log::debug!("raidguard: {entity} in combat for {remaining} ticks");
        self.notifier.on_update(entity, remaining);
    }

    pub fn tick(&mut self, entity: EntityId) {
        let Some(remaining) = self.timers.get_mut(&entity) else {
            log::debug!("raidguard: combat tick for untracked {entity}");
            return;
        };
        *remaining = remaining.saturating_sub(1);
        let remaining = *remaining;
        if remaining == 0 {
            self.remove(entity);
        } else {
            self.notifier.on_update(entity, remaining);
        }
    }

    pub fn remove(&mut self, entity: EntityId) {
        if self.timers.remove(&entity).is_some() {
            log::debug!("raidguard: {entity} left combat");
            self.notifier.on_clear(entity);
        }
    }

    #[must_use]
    pub fn is_restricted(&self, entity: EntityId) -> bool {
        self.timers.contains_key(&entity)
    }

    #[must_use]
    pub fn remaining(&self, entity: EntityId) -> Option<Ticks> {
        self.timers.get(&entity).copied()
    }

    /// Owned snapshot of every entity in combat, in id order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        let mut entities: Vec<EntityId> = self.timers.keys().copied().collect();
        entities.sort_unstable();
        entities
    }
}

impl std::fmt::Debug for CombatTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatTracker")
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}
