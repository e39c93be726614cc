//! Shared types for the RaidGuard plugins.
//!
//! No engine or server dependencies: safe to use from any crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, stable identity of a tracked entity (the player's profile id).
///
/// The engine never holds a reference to the entity object itself, only this id.
pub type EntityId = Uuid;

/// Remaining restriction time, in scheduler ticks.
pub type Ticks = u32;

/// Logical timestamp: number of scheduler ticks elapsed since the engine started.
pub type Timestamp = u64;

/// Stable handle of a raid zone. Handles are never reused within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u64);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// A world position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Whether `other` lies within `radius` of this point (inclusive).
    #[must_use]
    pub fn within(&self, other: &Self, radius: f64) -> bool {
        self.distance_squared(other) <= radius * radius
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.0}, {:.0}, {:.0})", self.x, self.y, self.z)
    }
}

/// Why an entity left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalCause {
    Disconnect,
    Death,
}

/// Which restriction subsystem is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionKind {
    /// Zone-bound raid restriction.
    Raid,
    /// Single-timer, non-spatial combat restriction.
    Combat,
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raid => write!(f, "raid"),
            Self::Combat => write!(f, "combat"),
        }
    }
}

/// Outcome of testing a command against the blocklists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandVerdict {
    Allow,
    Deny {
        /// Subsystem whose blocklist matched.
        kind: RestrictionKind,
        /// Remaining restriction time of that subsystem.
        remaining: Ticks,
    },
}

impl CommandVerdict {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_is_inclusive() {
        let origin = Vector3::new(0.0, 0.0, 0.0);
        assert!(origin.within(&Vector3::new(50.0, 0.0, 0.0), 50.0));
        assert!(!origin.within(&Vector3::new(50.1, 0.0, 0.0), 50.0));
        assert!(origin.within(&Vector3::new(30.0, 40.0, 0.0), 50.0));
    }

    #[test]
    fn zone_id_display() {
        assert_eq!(ZoneId(7).to_string(), "zone#7");
    }

    #[test]
    fn verdict_allowed() {
        assert!(CommandVerdict::Allow.is_allowed());
        assert!(
            !CommandVerdict::Deny {
                kind: RestrictionKind::Raid,
                remaining: 3
            }
            .is_allowed()
        );
    }
}
