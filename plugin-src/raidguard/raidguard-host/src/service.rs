//! Restriction service: read-only queries for other plugins.
//!
//! Other plugins can check whether a player is raid or combat blocked, look up
//! zones, or test a placement without depending on raidguard internals.

use crate::hud::HudLayout;
use crate::state::PluginState;
use raidguard_types::{EntityId, Vector3, ZoneId};
use raidguard_zones::{RaidGuard, RestrictionStatus, ZoneSnapshot};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Public restriction service for cross-plugin queries.
#[derive(Clone)]
pub struct RaidGuardService {
    engine: Arc<Mutex<RaidGuard>>,
    state: PluginState,
}

impl From<&PluginState> for RaidGuardService {
    fn from(state: &PluginState) -> Self {
        Self {
            engine: Arc::clone(&state.engine),
            state: state.clone(),
        }
    }
}

impl RaidGuardService {
    pub async fn is_raid_blocked(&self, uuid: EntityId) -> bool {
        self.engine.lock().await.is_restricted(uuid)
    }

    pub async fn is_combat_blocked(&self, uuid: EntityId) -> bool {
        self.engine.lock().await.gate().is_in_combat(uuid)
    }

    pub async fn status(&self, uuid: EntityId) -> RestrictionStatus {
        self.engine.lock().await.status(uuid)
    }

    /// Live zones whose radius covers `position`.
    pub async fn zones_at(&self, position: &Vector3) -> BTreeSet<ZoneId> {
        self.engine.lock().await.zones_containing(position)
    }

    pub async fn zones(&self) -> Vec<ZoneSnapshot> {
        self.engine.lock().await.zones()
    }

    pub async fn can_build(&self, position: &Vector3) -> bool {
        self.engine.lock().await.gate().can_build(position)
    }

    /// What the player's HUD should show right now.
    #[must_use]
    pub fn layout(&self, uuid: &EntityId) -> HudLayout {
        self.state.hud_layout(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RaidGuardConfig;
    use raidguard_types::RestrictionKind;
    use uuid::Uuid;

    #[tokio::test]
    async fn reflects_engine_state() {
        let state = PluginState::new(RaidGuardConfig::default().sanitize());
        let service = RaidGuardService::from(&state);
        let raider = Uuid::new_v4();
        let victim = Uuid::new_v4();

        let zone = state
            .structure_damaged(raider, None, Vector3::new(100.0, 64.0, 100.0))
            .await;
        state.player_attack(raider, victim).await;

        assert!(service.is_raid_blocked(raider).await);
        assert!(!service.is_raid_blocked(victim).await);
        assert!(service.is_combat_blocked(victim).await);
        assert_eq!(
            service.zones_at(&Vector3::new(110.0, 64.0, 100.0)).await,
            BTreeSet::from([zone])
        );
        assert!(!service.can_build(&Vector3::new(110.0, 64.0, 100.0)).await);
        assert_eq!(service.zones().await.len(), 1);

        let status = service.status(raider).await;
        assert_eq!(status.raid_remaining, Some(300));
        assert_eq!(status.combat_remaining, Some(30));

        let layout = service.layout(&raider);
        assert_eq!(layout.primary.map(|i| i.kind), Some(RestrictionKind::Raid));
        assert_eq!(layout.secondary.map(|i| i.kind), Some(RestrictionKind::Combat));
    }
}
