//! The engine: owns every table and exposes the event entry points.
//!
//! The host calls these serially: events (damage, lifecycle, commands) as they
//! arrive and [`RaidGuard::tick`] once per time unit. Nothing here blocks.

use crate::combat::CombatTracker;
use crate::gate::{RestrictionGate, RestrictionStatus};
use crate::notifier::UiNotifier;
use crate::scheduler::{TickScheduler, TickSummary, TickTargets};
use crate::settings::RestrictionSettings;
use crate::tracker::RestrictionTracker;
use crate::world::EntityWorld;
use crate::zone_registry::{ZoneRegistry, ZoneSnapshot};
use raidguard_types::{CommandVerdict, EntityId, RemovalCause, Timestamp, Vector3, ZoneId};
use std::collections::BTreeSet;

#[derive(Debug)]
pub struct RaidGuard {
    settings: RestrictionSettings,
    zones: ZoneRegistry,
    raid: RestrictionTracker,
    combat: CombatTracker,
    scheduler: TickScheduler,
    tracked: BTreeSet<EntityId>,
}

impl RaidGuard {
    /// Build an engine with one notifier per subsystem.
    #[must_use]
    pub fn new(
        settings: RestrictionSettings,
        raid_ui: Box<dyn UiNotifier>,
        combat_ui: Box<dyn UiNotifier>,
    ) -> Self {
        Self {
            zones: ZoneRegistry::new(settings.raid.zone_radius, settings.raid.merge_radius),
            raid: RestrictionTracker::new(raid_ui),
            combat: CombatTracker::new(combat_ui),
            scheduler: TickScheduler::new(),
            tracked: BTreeSet::new(),
            settings,
        }
    }

    // ── Event inputs ──

    /// Start reconciling `entity` against zone radii.
    pub fn on_entity_connected(&mut self, entity: EntityId) {
        if self.tracked.insert(entity) {
            log::debug!("raidguard: tracking {entity}");
        }
    }

    /// A hit that qualifies as raiding landed at `position`.
    ///
    /// Creates or extends the zone there and gives the initiator and the victim
    /// (when there is one) a full-length membership.
    pub fn on_qualifying_damage(
        &mut self,
        initiator: EntityId,
        victim: Option<EntityId>,
        position: Vector3,
    ) -> ZoneId {
        let duration = self.settings.raid.duration;
        let zone = self
            .zones
            .create_or_extend(position, duration, self.scheduler.now());

        self.raid.add(initiator, zone, duration, false);
        if let Some(victim) = victim.filter(|v| *v != initiator) {
            self.raid.add(victim, zone, duration, false);
        }
        zone
    }

    /// One player damaged another. Starts both combat countdowns when combat blocking is on.
    pub fn on_combat_damage(&mut self, attacker: EntityId, victim: EntityId) {
        if !self.settings.combat.enabled || attacker == victim {
            return;
        }
        let duration = self.settings.combat.duration;
        self.combat.start(attacker, duration);
        self.combat.start(victim, duration);
    }

    pub fn on_entity_removed(&mut self, entity: EntityId, cause: RemovalCause) {
        match cause {
            RemovalCause::Disconnect => {
                self.tracked.remove(&entity);
                self.raid.remove_all(entity);
                self.combat.remove(entity);
                log::info!("raidguard: {entity} disconnected, restrictions cleared");
            }
            RemovalCause::Death => {
                if self.settings.raid.remove_on_death {
                    self.raid.remove_all(entity);
                }
                if self.settings.combat.remove_on_death {
                    self.combat.remove(entity);
                }
                log::debug!("raidguard: {entity} died");
            }
        }
    }

    /// Decide whether `entity` may run `command`.
    #[must_use]
    pub fn on_command_attempt(&self, entity: EntityId, command: &str) -> CommandVerdict {
        let verdict = self.gate().check_command(entity, command);
        if !verdict.is_allowed() {
            log::debug!("raidguard: denied '{command}' for {entity}: {verdict:?}");
        }
        verdict
    }

    /// Advance time by one unit.
    pub fn tick(&mut self, world: &dyn EntityWorld) -> TickSummary {
        self.scheduler.tick(
            TickTargets {
                zones: &mut self.zones,
                raid: &mut self.raid,
                combat: &mut self.combat,
                tracked: &self.tracked,
                raid_duration: self.settings.raid.duration,
            },
            world,
        )
    }

    // ── Queries ──

    #[must_use]
    pub fn gate(&self) -> RestrictionGate<'_> {
        RestrictionGate {
            zones: &self.zones,
            raid: &self.raid,
            combat: &self.combat,
            settings: &self.settings,
            now: self.scheduler.now(),
        }
    }

    #[must_use]
    pub fn is_restricted(&self, entity: EntityId) -> bool {
        self.raid.is_restricted(entity)
    }

    #[must_use]
    pub fn is_restricted_in(&self, entity: EntityId, zone: ZoneId) -> bool {
        self.raid.is_restricted_in(entity, zone)
    }

    #[must_use]
    pub fn zones_containing(&self, position: &Vector3) -> BTreeSet<ZoneId> {
        self.gate().zones_containing(position)
    }

    #[must_use]
    pub fn status(&self, entity: EntityId) -> RestrictionStatus {
        self.gate().status(entity)
    }

    #[must_use]
    pub fn zones(&self) -> Vec<ZoneSnapshot> {
        self.zones.snapshots(self.scheduler.now())
    }

    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.scheduler.now()
    }

    #[must_use]
    pub const fn settings(&self) -> &RestrictionSettings {
        &self.settings
    }

    #[must_use]
    pub fn is_tracked(&self, entity: EntityId) -> bool {
        self.tracked.contains(&entity)
    }

    /// Direct access for hosts and tests that inspect countdown details.
    #[must_use]
    pub const fn raid_tracker(&self) -> &RestrictionTracker {
        &self.raid
    }

    #[must_use]
    pub const fn combat_tracker(&self) -> &CombatTracker {
        &self.combat
    }
}
