//! Server event handlers: player lifecycle, structure damage, PvP, commands and placement.
//!
//! Each handler updates the player directory first, then takes the engine lock
//! for the shortest possible span.

use crate::state::PluginState;
use raidguard_types::{CommandVerdict, EntityId, RemovalCause, Vector3, ZoneId};
use raidguard_zones::TickSummary;

impl PluginState {
    // ── Player lifecycle ──

    pub async fn player_join(&self, uuid: EntityId, name: &str, position: Vector3) {
        self.players.insert(uuid, name, position);
        self.engine.lock().await.on_entity_connected(uuid);
        log::info!("raidguard: {name} joined at {position}");
    }

    /// Positions are only read on tick; moving never touches the engine directly.
    pub fn player_move(&self, uuid: &EntityId, position: Vector3) {
        self.players.set_position(uuid, position);
    }

    pub async fn player_leave(&self, uuid: &EntityId) {
        let name = self.players.display_name(uuid);
        self.players.remove(uuid);
        self.engine
            .lock()
            .await
            .on_entity_removed(*uuid, RemovalCause::Disconnect);
        log::info!("raidguard: {name} left, cleaned up restriction state");
    }

    pub async fn player_death(&self, uuid: &EntityId) {
        self.players.set_alive(uuid, false);
        self.engine
            .lock()
            .await
            .on_entity_removed(*uuid, RemovalCause::Death);
        log::info!("raidguard: {} died", self.players.display_name(uuid));
    }

    pub fn player_respawn(&self, uuid: &EntityId, position: Vector3) {
        self.players.set_position(uuid, position);
        self.players.set_alive(uuid, true);
    }

    // ── Damage ──

    /// A player damaged a structure. `owner` is the structure's owner when it is
    /// someone other than the attacker.
    pub async fn structure_damaged(
        &self,
        initiator: EntityId,
        owner: Option<EntityId>,
        position: Vector3,
    ) -> ZoneId {
        let zone = self
            .engine
            .lock()
            .await
            .on_qualifying_damage(initiator, owner, position);
        log::info!(
            "raidguard: {} raided at {position}, {zone} active",
            self.players.display_name(&initiator)
        );
        zone
    }

    pub async fn player_attack(&self, attacker: EntityId, victim: EntityId) {
        self.engine.lock().await.on_combat_damage(attacker, victim);
    }

    // ── Filters ──

    /// Decide whether a command may run. The caller cancels it on `Deny`.
    pub async fn command(&self, uuid: &EntityId, command: &str) -> CommandVerdict {
        let verdict = self.engine.lock().await.on_command_attempt(*uuid, command);
        if let CommandVerdict::Deny { kind, .. } = verdict {
            log::info!(
                "raidguard: blocked '{command}' for {} ({kind})",
                self.players.display_name(uuid)
            );
        }
        verdict
    }

    pub async fn build_attempt(&self, position: &Vector3) -> bool {
        self.engine.lock().await.gate().can_build(position)
    }

    pub async fn upgrade_attempt(&self, position: &Vector3) -> bool {
        self.engine.lock().await.gate().can_upgrade(position)
    }

    // ── Time ──

    /// Run one engine tick against the current player positions.
    pub async fn tick(&self) -> TickSummary {
        let summary = self.engine.lock().await.tick(&self.players);
        if !summary.expired_zones.is_empty() {
            log::debug!(
                "raidguard: tick {} expired {} zone(s)",
                summary.now,
                summary.expired_zones.len()
            );
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RaidGuardConfig;
    use crate::state::PluginState;
    use raidguard_types::{CommandVerdict, RestrictionKind, Vector3};
    use uuid::Uuid;

    fn state() -> PluginState {
        let mut config = RaidGuardConfig::default();
        config.raid.duration = 5;
        config.combat.duration = 3;
        PluginState::new(config.sanitize())
    }

    #[tokio::test]
    async fn raid_blocks_commands_and_building_then_clears() {
        let state = state();
        let raider = Uuid::new_v4();
        let owner = Uuid::new_v4();
        state.player_join(raider, "raider", Vector3::new(1.0, 0.0, 0.0)).await;
        state.player_join(owner, "owner", Vector3::new(2.0, 0.0, 0.0)).await;

        state.structure_damaged(raider, Some(owner), Vector3::default()).await;

        assert!(!state.command(&raider, "/home").await.is_allowed());
        assert!(!state.build_attempt(&Vector3::new(10.0, 0.0, 0.0)).await);
        assert!(!state.upgrade_attempt(&Vector3::new(10.0, 0.0, 0.0)).await);
        assert!(state.build_attempt(&Vector3::new(200.0, 0.0, 0.0)).await);
        assert_eq!(state.hud.get(&owner).raid, Some(5));

        for _ in 0..6 {
            state.tick().await;
        }
        assert!(state.command(&raider, "/home").await.is_allowed());
        assert!(state.build_attempt(&Vector3::new(10.0, 0.0, 0.0)).await);
        assert_eq!(state.hud.active_count(), 0);
    }

    #[tokio::test]
    async fn pvp_starts_combat_for_both_sides() {
        let state = state();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        state.player_join(a, "a", Vector3::default()).await;
        state.player_join(b, "b", Vector3::default()).await;

        state.player_attack(a, b).await;
        assert_eq!(
            state.command(&b, "/tp a").await,
            CommandVerdict::Deny {
                kind: RestrictionKind::Combat,
                remaining: 3
            }
        );
        assert!(state.command(&b, "/kit").await.is_allowed());

        state.player_leave(&a).await;
        assert_eq!(state.hud.get(&a).combat, None);
        assert_eq!(state.players.online_count(), 1);
    }

    #[tokio::test]
    async fn death_and_respawn_follow_the_zone() {
        let state = state();
        let e = Uuid::new_v4();
        state.player_join(e, "e", Vector3::new(3.0, 0.0, 0.0)).await;
        state.structure_damaged(Uuid::new_v4(), None, Vector3::default()).await;
        state.tick().await;
        assert!(state.engine.lock().await.is_restricted(e));

        state.player_death(&e).await;
        state.tick().await;
        assert!(!state.engine.lock().await.is_restricted(e));

        state.player_respawn(&e, Vector3::new(500.0, 0.0, 0.0));
        state.tick().await;
        assert!(!state.engine.lock().await.is_restricted(e));

        state.player_move(&e, Vector3::new(3.0, 0.0, 0.0));
        state.tick().await;
        assert!(state.engine.lock().await.is_restricted(e));
    }
}
