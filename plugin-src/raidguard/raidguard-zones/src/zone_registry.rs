//! Zone registry: owns every active raid zone.
//! Zones are spheres around the triggering event, alive until their expiration tick.

use raidguard_types::{Ticks, Timestamp, Vector3, ZoneId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A single raid zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub id: ZoneId,
    pub center: Vector3,
    /// Tick at which the zone stops existing. Only ever moves forward.
    pub expires_at: Timestamp,
}

impl Zone {
    #[must_use]
    pub const fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Ticks left before the zone expires.
    #[must_use]
    pub fn remaining(&self, now: Timestamp) -> Ticks {
        Ticks::try_from(self.expires_at.saturating_sub(now)).unwrap_or(Ticks::MAX)
    }
}

/// Listing entry for admin commands and the cross-plugin service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSnapshot {
    pub id: ZoneId,
    pub center: Vector3,
    pub expires_at: Timestamp,
    pub remaining: Ticks,
}

#[derive(Debug)]
pub struct ZoneRegistry {
    zones: BTreeMap<ZoneId, Zone>,
    next_id: u64,
    zone_radius: f64,
    merge_radius: f64,
}

impl ZoneRegistry {
    #[must_use]
    pub fn new(zone_radius: f64, merge_radius: f64) -> Self {
        Self {
            zones: BTreeMap::new(),
            next_id: 1,
            zone_radius,
            merge_radius,
        }
    }

    /// Extend the zone whose center is within the merge radius of `position`,
    /// or create a new one. The returned zone expires no earlier than `now + duration`.
    pub fn create_or_extend(
        &mut self,
        position: Vector3,
        duration: Ticks,
        now: Timestamp,
    ) -> ZoneId {
        let expires_at = now + Timestamp::from(duration);

        let nearest = self
            .zones
            .values_mut()
            .filter(|zone| !zone.is_expired(now) && zone.center.within(&position, self.merge_radius))
            .min_by(|a, b| {
                a.center
                    .distance_squared(&position)
                    .total_cmp(&b.center.distance_squared(&position))
            });

        if let Some(zone) = nearest {
            if expires_at > zone.expires_at {
                zone.expires_at = expires_at;
            }
            log::info!(
                "raidguard: {} at {} extended, expires at tick {}",
                zone.id,
                zone.center,
                zone.expires_at,
            );
            return zone.id;
        }

        let id = ZoneId(self.next_id);
        self.next_id += 1;
        self.zones.insert(
            id,
            Zone {
                id,
                center: position,
                expires_at,
            },
        );
        log::info!("raidguard: {id} created at {position}, expires at tick {expires_at}");
        id
    }

    /// Remove and return every zone whose expiration has passed.
    pub fn sweep(&mut self, now: Timestamp) -> Vec<Zone> {
        let expired: Vec<ZoneId> = self
            .zones
            .values()
            .filter(|zone| zone.is_expired(now))
            .map(|zone| zone.id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| self.zones.remove(&id))
            .inspect(|zone| log::info!("raidguard: {} at {} expired", zone.id, zone.center))
            .collect()
    }

    /// All live zones whose radius covers `position`.
    #[must_use]
    pub fn zones_containing(&self, position: &Vector3, now: Timestamp) -> BTreeSet<ZoneId> {
        self.zones
            .values()
            .filter(|zone| !zone.is_expired(now) && zone.center.within(position, self.zone_radius))
            .map(|zone| zone.id)
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ZoneId) -> bool {
        self.zones.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    #[must_use]
    pub const fn zone_radius(&self) -> f64 {
        self.zone_radius
    }

    #[must_use]
    pub fn snapshots(&self, now: Timestamp) -> Vec<ZoneSnapshot> {
        self.zones
            .values()
            .map(|zone| ZoneSnapshot {
                id: zone.id,
                center: zone.center,
                expires_at: zone.expires_at,
                remaining: zone.remaining(now),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ZoneRegistry {
        ZoneRegistry::new(50.0, 25.0)
    }

    #[test]
    fn nearby_trigger_extends_instead_of_creating() {
        let mut zones = registry();
        let a = zones.create_or_extend(Vector3::new(0.0, 0.0, 0.0), 10, 0);
        let b = zones.create_or_extend(Vector3::new(10.0, 0.0, 0.0), 10, 1);

        assert_eq!(a, b);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones.get(a).map(|z| z.expires_at), Some(11));
    }

    #[test]
    fn distant_trigger_creates_second_zone() {
        let mut zones = registry();
        let a = zones.create_or_extend(Vector3::new(0.0, 0.0, 0.0), 10, 0);
        let b = zones.create_or_extend(Vector3::new(30.0, 0.0, 0.0), 10, 0);

        assert_ne!(a, b);
        assert_eq!(zones.len(), 2);
    }

    #[test]
    fn expiration_never_moves_backwards() {
        let mut zones = registry();
        let a = zones.create_or_extend(Vector3::default(), 100, 0);
        zones.create_or_extend(Vector3::default(), 5, 3);

        assert_eq!(zones.get(a).map(|z| z.expires_at), Some(100));
    }

    #[test]
    fn sweep_removes_only_expired() {
        let mut zones = registry();
        let short = zones.create_or_extend(Vector3::new(0.0, 0.0, 0.0), 5, 0);
        let long = zones.create_or_extend(Vector3::new(500.0, 0.0, 0.0), 50, 0);

        assert!(zones.sweep(4).is_empty());
        let removed = zones.sweep(5);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, short);
        assert!(zones.contains(long));
        assert!(!zones.contains(short));
    }

    #[test]
    fn expired_zone_is_not_merged_into() {
        let mut zones = registry();
        let old = zones.create_or_extend(Vector3::default(), 5, 0);
        let new = zones.create_or_extend(Vector3::default(), 5, 5);

        assert_ne!(old, new);
    }

    #[test]
    fn zones_containing_uses_zone_radius() {
        let mut zones = registry();
        let a = zones.create_or_extend(Vector3::default(), 10, 0);

        assert!(zones.zones_containing(&Vector3::new(40.0, 0.0, 0.0), 0).contains(&a));
        assert!(zones.zones_containing(&Vector3::new(60.0, 0.0, 0.0), 0).is_empty());
        assert!(zones.zones_containing(&Vector3::new(40.0, 0.0, 0.0), 10).is_empty());
    }

    #[test]
    fn merge_picks_nearest_zone() {
        let mut zones = ZoneRegistry::new(50.0, 30.0);
        let west = zones.create_or_extend(Vector3::new(-20.0, 0.0, 0.0), 10, 0);
        let east = zones.create_or_extend(Vector3::new(20.0, 0.0, 0.0), 10, 0);
        assert_ne!(west, east);

        let hit = zones.create_or_extend(Vector3::new(5.0, 0.0, 0.0), 20, 1);
        assert_eq!(hit, east);
        assert_eq!(zones.get(west).map(|z| z.expires_at), Some(10));
    }
}
