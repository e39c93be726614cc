//! Per-entity, per-zone raid countdowns.
//!
//! Every (entity, zone) membership carries its own countdown. An entity is raid
//! restricted while at least one membership exists; the value shown to the UI is
//! the largest remaining countdown. When an entity walks out of a zone the
//! countdown is parked as saved time and handed back if it walks in again
//! before that parked countdown would have run out.
//!
//! All operations are total: unknown entities and zones are ignored, never errors.

use crate::notifier::UiNotifier;
use raidguard_types::{EntityId, Ticks, Timestamp, ZoneId};
use std::collections::{BTreeMap, HashMap};

/// A parked countdown and the tick at which it would have run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SavedTime {
    remaining: Ticks,
    lapses_at: Timestamp,
}

impl SavedTime {
    const fn is_lapsed(&self, now: Timestamp) -> bool {
        self.lapses_at <= now
    }
}

pub struct RestrictionTracker {
    /// Invariant: every stored countdown is > 0 and no inner map is empty.
    memberships: HashMap<EntityId, BTreeMap<ZoneId, Ticks>>,
    saved: HashMap<(EntityId, ZoneId), SavedTime>,
    /// Clock used to stamp and age saved time; set by the scheduler.
    now: Timestamp,
    notifier: Box<dyn UiNotifier>,
}

impl RestrictionTracker {
    #[must_use]
    pub fn new(notifier: Box<dyn UiNotifier>) -> Self {
        Self {
            memberships: HashMap::new(),
            saved: HashMap::new(),
            now: 0,
            notifier,
        }
    }

    /// Create or refresh the (entity, zone) membership.
    ///
    /// Any parked countdown for the pair is consumed. With `use_saved_time` it is
    /// used instead of `duration` unless it has lapsed. Refreshing never shortens
    /// an existing countdown.
    pub fn add(&mut self, entity: EntityId, zone: ZoneId, duration: Ticks, use_saved_time: bool) {
        let parked = self
            .saved
            .remove(&(entity, zone))
            .filter(|saved| !saved.is_lapsed(self.now));
        let start = match parked {
            Some(saved) if use_saved_time => saved.remaining,
            _ => duration,
        };
        if start == 0 {
            log::debug!("raidguard: ignoring zero-length membership {entity} in {zone}");
            return;
        }

        let zones = self.memberships.entry(entity).or_default();
        let remaining = zones.entry(zone).or_insert(0);
        *remaining = (*remaining).max(start);
        log::debug!("raidguard: {entity} restricted in {zone} for {} ticks", *remaining);

        self.notify(entity);
    }

    /// Drop the (entity, zone) membership, parking its countdown when `save_time` is set.
    pub fn remove(&mut self, entity: EntityId, zone: ZoneId, save_time: bool) {
        let Some(zones) = self.memberships.get_mut(&entity) else {
            log::debug!("raidguard: remove for untracked {entity} in {zone}");
            return;
        };
        let Some(remaining) = zones.remove(&zone) else {
            log::debug!("raidguard: remove for {entity} without membership in {zone}");
            return;
        };
        if zones.is_empty() {
            self.memberships.remove(&entity);
        }

        if save_time {
            let lapses_at = self.now + Timestamp::from(remaining);
            self.saved.insert(
                (entity, zone),
                SavedTime {
                    remaining,
                    lapses_at,
                },
            );
            log::debug!("raidguard: saved {remaining} ticks for {entity} in {zone}");
        }

        self.notify(entity);
    }

    /// Advance one membership by one tick; a countdown reaching zero removes it without saving.
    pub fn tick(&mut self, entity: EntityId, zone: ZoneId) {
        let Some(remaining) = self
            .memberships
            .get_mut(&entity)
            .and_then(|zones| zones.get_mut(&zone))
        else {
            log::debug!("raidguard: tick for {entity} without membership in {zone}");
            return;
        };

        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.remove(entity, zone, false);
        } else {
            self.notify(entity);
        }
    }

    /// Drop every membership and saved countdown of `entity` and clear its indicator.
    ///
    /// Idempotent: a second call finds nothing and notifies nothing.
    pub fn remove_all(&mut self, entity: EntityId) {
        self.saved.retain(|(e, _), _| *e != entity);
        if self.memberships.remove(&entity).is_some() {
            log::debug!("raidguard: cleared all raid restrictions of {entity}");
            self.notifier.on_clear(entity);
        }
    }

    /// Move the clock to `now` and drop saved time that has run out by then.
    pub fn expire_saved(&mut self, now: Timestamp) {
        self.now = now;
        self.saved.retain(|_, saved| !saved.is_lapsed(now));
    }

    /// Forget a zone that no longer exists: memberships go without saving, snapshots are discarded.
    pub fn forget_zone(&mut self, zone: ZoneId) {
        self.saved.retain(|(_, z), _| *z != zone);
        let members: Vec<EntityId> = self
            .memberships
            .iter()
            .filter(|(_, zones)| zones.contains_key(&zone))
            .map(|(entity, _)| *entity)
            .collect();
        for entity in members {
            self.remove(entity, zone, false);
        }
    }

    #[must_use]
    pub fn is_restricted(&self, entity: EntityId) -> bool {
        self.memberships.contains_key(&entity)
    }

    #[must_use]
    pub fn is_restricted_in(&self, entity: EntityId, zone: ZoneId) -> bool {
        self.remaining_in(entity, zone).is_some()
    }

    /// The entity's derived restriction: the largest countdown over its memberships.
    #[must_use]
    pub fn remaining(&self, entity: EntityId) -> Option<Ticks> {
        self.memberships
            .get(&entity)
            .and_then(|zones| zones.values().copied().max())
    }

    #[must_use]
    pub fn remaining_in(&self, entity: EntityId, zone: ZoneId) -> Option<Ticks> {
        self.memberships
            .get(&entity)
            .and_then(|zones| zones.get(&zone))
            .copied()
    }

    #[must_use]
    pub fn saved_time(&self, entity: EntityId, zone: ZoneId) -> Option<Ticks> {
        self.saved
            .get(&(entity, zone))
            .filter(|saved| !saved.is_lapsed(self.now))
            .map(|saved| saved.remaining)
    }

    /// Zones the entity is currently a member of, in handle order.
    #[must_use]
    pub fn zones_of(&self, entity: EntityId) -> Vec<ZoneId> {
        self.memberships
            .get(&entity)
            .map(|zones| zones.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Owned snapshot of every (entity, zone) pair, safe to iterate while mutating.
    #[must_use]
    pub fn memberships(&self) -> Vec<(EntityId, ZoneId)> {
        let mut pairs: Vec<(EntityId, ZoneId)> = self
            .memberships
            .iter()
            .flat_map(|(entity, zones)| zones.keys().map(move |zone| (*entity, *zone)))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    #[must_use]
    pub fn restricted_count(&self) -> usize {
        self.memberships.len()
    }

    fn notify(&mut self, entity: EntityId) {
        match self.remaining(entity) {
            Some(remaining) => self.notifier.on_update(entity, remaining),
            None => self.notifier.on_clear(entity),
        }
    }
}

impl std::fmt::Debug for RestrictionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestrictionTracker")
            .field("memberships", &self.memberships)
            .field("saved", &self.saved)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}
