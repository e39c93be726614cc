//! Host capabilities the engine consumes: entity positions and liveness.

use raidguard_types::{EntityId, Vector3};
use std::collections::HashMap;

/// Read-only view of the game world.
///
/// Lookups for entities the host no longer knows must return `None` / `false`.
pub trait EntityWorld {
    fn position(&self, entity: EntityId) -> Option<Vector3>;

    /// Connected and alive.
    fn is_live(&self, entity: EntityId) -> bool;
}

/// Plain map-backed world, for tests and hosts that push positions in.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorld {
    entities: HashMap<EntityId, (Vector3, bool)>,
}

impl InMemoryWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move a live entity.
    pub fn place(&mut self, entity: EntityId, position: Vector3) {
        let alive = self.entities.get(&entity).is_none_or(|(_, alive)| *alive);
        self.entities.insert(entity, (position, alive));
    }

    pub fn set_alive(&mut self, entity: EntityId, alive: bool) {
        if let Some((_, a)) = self.entities.get_mut(&entity) {
            *a = alive;
        }
    }

    pub fn remove(&mut self, entity: EntityId) {
        self.entities.remove(&entity);
    }
}

impl EntityWorld for InMemoryWorld {
    fn position(&self, entity: EntityId) -> Option<Vector3> {
        self.entities.get(&entity).map(|(pos, _)| *pos)
    }

    fn is_live(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|(_, alive)| *alive)
    }
}
