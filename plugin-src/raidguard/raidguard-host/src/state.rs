//! Shared plugin state for raidguard.

use crate::config::RaidGuardConfig;
use crate::hud::{HudArbiter, HudBoard, HudLayout};
use crate::players::PlayerDirectory;
use raidguard_types::{EntityId, RestrictionKind};
use raidguard_zones::RaidGuard;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state passed to event handlers, the tick driver and the service.
///
/// The engine sits behind one async mutex: server events and the tick driver
/// take turns, so every mutation is serialized.
#[derive(Clone)]
pub struct PluginState {
    pub config: Arc<RaidGuardConfig>,
    pub engine: Arc<Mutex<RaidGuard>>,
    /// Online players. Key = player UUID.
    pub players: PlayerDirectory,
    /// Indicator state written by the engine's notifiers.
    pub hud: HudBoard,
}

impl PluginState {
    /// Build the engine from a sanitized config, wiring its notifiers to a fresh HUD board.
    #[must_use]
    pub fn new(config: RaidGuardConfig) -> Self {
        let hud = HudBoard::new();
        let engine = RaidGuard::new(
            config.to_settings(),
            Box::new(hud.notifier(RestrictionKind::Raid)),
            Box::new(hud.notifier(RestrictionKind::Combat)),
        );
        Self {
            config: Arc::new(config),
            engine: Arc::new(Mutex::new(engine)),
            players: PlayerDirectory::new(),
            hud,
        }
    }

    /// Current indicator slots for a player.
    #[must_use]
    pub fn hud_layout(&self, player_uuid: &EntityId) -> HudLayout {
        HudArbiter::layout_for(&self.hud, player_uuid)
    }
}
