//! Read-only restriction queries for command filters and placement checks.

use crate::combat::CombatTracker;
use crate::settings::RestrictionSettings;
use crate::tracker::RestrictionTracker;
use crate::zone_registry::ZoneRegistry;
use raidguard_types::{CommandVerdict, EntityId, RestrictionKind, Ticks, Timestamp, Vector3, ZoneId};
use serde::Serialize;
use std::collections::BTreeSet;

/// Everything a UI or command reply needs to know about one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestrictionStatus {
    pub raid_remaining: Option<Ticks>,
    pub combat_remaining: Option<Ticks>,
    pub zones: Vec<ZoneId>,
}

impl RestrictionStatus {
    #[must_use]
    pub const fn is_restricted(&self) -> bool {
        self.raid_remaining.is_some() || self.combat_remaining.is_some()
    }
}

/// Borrowed view over the engine state. Holds no state of its own.
#[derive(Clone, Copy)]
pub struct RestrictionGate<'a> {
    pub(crate) zones: &'a ZoneRegistry,
    pub(crate) raid: &'a RestrictionTracker,
    pub(crate) combat: &'a CombatTracker,
    pub(crate) settings: &'a RestrictionSettings,
    pub(crate) now: Timestamp,
}

impl RestrictionGate<'_> {
    #[must_use]
    pub fn is_restricted(&self, entity: EntityId) -> bool {
        self.raid.is_restricted(entity)
    }

    #[must_use]
    pub fn is_restricted_in(&self, entity: EntityId, zone: ZoneId) -> bool {
        self.raid.is_restricted_in(entity, zone)
    }

    #[must_use]
    pub fn is_in_combat(&self, entity: EntityId) -> bool {
        self.combat.is_restricted(entity)
    }

    #[must_use]
    pub fn zones_containing(&self, position: &Vector3) -> BTreeSet<ZoneId> {
        self.zones.zones_containing(position, self.now)
    }

    /// Placing a structure inside any live zone is denied when building is blocked.
    #[must_use]
    pub fn can_build(&self, position: &Vector3) -> bool {
        !self.settings.raid.block_building || self.zones_containing(position).is_empty()
    }

    /// Upgrading a structure inside any live zone is denied when upgrading is blocked.
    #[must_use]
    pub fn can_upgrade(&self, position: &Vector3) -> bool {
        !self.settings.raid.block_upgrading || self.zones_containing(position).is_empty()
    }

    /// Test `command` against the blocklist of every subsystem currently restricting `entity`.
    /// Raid is checked first.
    #[must_use]
    pub fn check_command(&self, entity: EntityId, command: &str) -> CommandVerdict {
        if let Some(remaining) = self.raid.remaining(entity) {
            if self.settings.raid.blocked_commands.matches(command) {
                return CommandVerdict::Deny {
                    kind: RestrictionKind::Raid,
                    remaining,
                };
            }
        }
        if let Some(remaining) = self.combat.remaining(entity) {
            if self.settings.combat.blocked_commands.matches(command) {
                return CommandVerdict::Deny {
                    kind: RestrictionKind::Combat,
                    remaining,
                };
            }
        }
        CommandVerdict::Allow
    }

    #[must_use]
    pub fn status(&self, entity: EntityId) -> RestrictionStatus {
        RestrictionStatus {
            raid_remaining: self.raid.remaining(entity),
            combat_remaining: self.combat.remaining(entity),
            zones: self.raid.zones_of(entity),
        }
    }
}
