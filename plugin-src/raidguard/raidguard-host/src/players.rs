//! Online player directory: positions and liveness pushed in by server events,
//! read by the engine's tick through [`EntityWorld`].

use raidguard_types::{EntityId, Vector3};
use raidguard_zones::EntityWorld;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Per-player tracking data.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub name: String,
    pub position: Vector3,
    pub alive: bool,
}

/// Shared, cheaply cloneable player table. Key = player UUID.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: Arc<RwLock<HashMap<EntityId, PlayerRecord>>>,
}

impl PlayerDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uuid: EntityId, name: &str, position: Vector3) {
        if let Ok(mut map) = self.players.write() {
            map.insert(
                uuid,
                PlayerRecord {
                    name: name.to_owned(),
                    position,
                    alive: true,
                },
            );
        }
    }

    pub fn set_position(&self, uuid: &EntityId, position: Vector3) {
        if let Ok(mut map) = self.players.write() {
            if let Some(record) = map.get_mut(uuid) {
                record.position = position;
            }
        }
    }

    pub fn set_alive(&self, uuid: &EntityId, alive: bool) {
        if let Ok(mut map) = self.players.write() {
            if let Some(record) = map.get_mut(uuid) {
                record.alive = alive;
            }
        }
    }

    pub fn remove(&self, uuid: &EntityId) -> Option<PlayerRecord> {
        self.players.write().ok()?.remove(uuid)
    }

    #[must_use]
    pub fn get(&self, uuid: &EntityId) -> Option<PlayerRecord> {
        self.players.read().ok()?.get(uuid).cloned()
    }

    /// Player name for log lines; falls back to the UUID for unknown players.
    #[must_use]
    pub fn display_name(&self, uuid: &EntityId) -> String {
        self.get(uuid)
            .map_or_else(|| uuid.to_string(), |record| record.name)
    }

    #[must_use]
    pub fn online_count(&self) -> usize {
        self.players.read().map_or(0, |map| map.len())
    }
}

impl EntityWorld for PlayerDirectory {
    fn position(&self, entity: EntityId) -> Option<Vector3> {
        self.players.read().ok()?.get(&entity).map(|record| record.position)
    }

    fn is_live(&self, entity: EntityId) -> bool {
        self.players
            .read()
            .is_ok_and(|map| map.get(&entity).is_some_and(|record| record.alive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn tracks_position_and_liveness() {
        let players = PlayerDirectory::new();
        let uuid = Uuid::new_v4();
        players.insert(uuid, "Steve", Vector3::new(1.0, 2.0, 3.0));

        assert!(players.is_live(uuid));
        players.set_position(&uuid, Vector3::new(9.0, 0.0, 0.0));
        assert_eq!(players.position(uuid), Some(Vector3::new(9.0, 0.0, 0.0)));

        players.set_alive(&uuid, false);
        assert!(!players.is_live(uuid));
        assert_eq!(players.display_name(&uuid), "Steve");
    }

    #[test]
    fn unknown_players_are_not_live() {
        let players = PlayerDirectory::new();
        let uuid = Uuid::new_v4();

        players.set_position(&uuid, Vector3::default());
        assert!(!players.is_live(uuid));
        assert_eq!(players.position(uuid), None);
        assert_eq!(players.display_name(&uuid), uuid.to_string());
    }
}
