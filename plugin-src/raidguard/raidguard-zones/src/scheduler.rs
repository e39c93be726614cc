//! The tick scheduler: the only place where time moves.
//!
//! One call to [`TickScheduler::tick`] is one time unit. In order, it:
//! 1. sweeps expired zones (and drops memberships that point at missing zones),
//! 2. reconciles every tracked live entity against the zones around it,
//! 3. decrements every raid membership once,
//! 4. decrements every combat countdown once,
//!
//! then advances the clock and drops saved time that has lapsed. Memberships
//! created in step 2 start counting on the next tick, exactly like memberships
//! created by events between ticks.

use crate::combat::CombatTracker;
use crate::tracker::RestrictionTracker;
use crate::world::EntityWorld;
use crate::zone_registry::ZoneRegistry;
use raidguard_types::{EntityId, Ticks, Timestamp, ZoneId};
use std::collections::{BTreeSet, HashSet};

/// Everything one tick mutates, borrowed from the engine for the duration of the tick.
pub struct TickTargets<'a> {
    pub zones: &'a mut ZoneRegistry,
    pub raid: &'a mut RestrictionTracker,
    pub combat: &'a mut CombatTracker,
    /// Entities reconciled against zone radii.
    pub tracked: &'a BTreeSet<EntityId>,
    /// Countdown for memberships created by walking into a zone.
    pub raid_duration: Ticks,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Clock value the tick ran at.
    pub now: Timestamp,
    pub expired_zones: Vec<ZoneId>,
    /// Memberships created by walking into a zone.
    pub entered: usize,
    /// Memberships parked by walking out of a zone.
    pub left: usize,
    /// Memberships whose countdown ran out.
    pub expired_memberships: usize,
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    now: Timestamp,
}

impl TickScheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    /// Ticks elapsed so far; the timestamp events are stamped with.
    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    pub fn tick(&mut self, targets: TickTargets<'_>, world: &dyn EntityWorld) -> TickSummary {
        let TickTargets {
            zones,
            raid,
            combat,
            tracked,
            raid_duration,
        } = targets;
        let now = self.now;
        let mut summary = TickSummary {
            now,
            ..TickSummary::default()
        };

        for zone in zones.sweep(now) {
            raid.forget_zone(zone.id);
            summary.expired_zones.push(zone.id);
        }
        for (entity, zone) in raid.memberships() {
            if !zones.contains(zone) {
                log::warn!("raidguard: dropping membership of {entity} in missing {zone}");
                raid.remove(entity, zone, false);
            }
        }

        let mut fresh: HashSet<(EntityId, ZoneId)> = HashSet::new();
        for &entity in tracked {
            if !world.is_live(entity) {
                continue;
            }
            let Some(position) = world.position(entity) else {
                log::debug!("raidguard: no position for {entity}, skipping reconcile");
                continue;
            };

            let in_range = zones.zones_containing(&position, now);
            let current: BTreeSet<ZoneId> = raid.zones_of(entity).into_iter().collect();

            for &zone in in_range.difference(&current) {
                raid.add(entity, zone, raid_duration, true);
                fresh.insert((entity, zone));
                summary.entered += 1;
            }
            for &zone in current.difference(&in_range) {
                raid.remove(entity, zone, true);
                summary.left += 1;
            }
        }

        for (entity, zone) in raid.memberships() {
            if fresh.contains(&(entity, zone)) {
                continue;
            }
            raid.tick(entity, zone);
            if !raid.is_restricted_in(entity, zone) {
                summary.expired_memberships += 1;
            }
        }

        for entity in combat.entities() {
            combat.tick(entity);
        }

        self.now += 1;
        raid.expire_saved(self.now);
        if !summary.expired_zones.is_empty() || summary.entered > 0 || summary.left > 0 {
            log::debug!(
                "raidguard: tick {now}: {} zones expired, {} entered, {} left, {} ran out",
                summary.expired_zones.len(),
                summary.entered,
                summary.left,
                summary.expired_memberships,
            );
        }
        summary
    }
}
