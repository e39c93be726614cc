//! RaidGuard plugin host.
//!
//! Wires the zone engine into a running server:
//! - Config loaded from `config.toml` in the plugin data folder
//! - Player directory fed by join/move/death/leave events
//! - Tick driver advancing every countdown once per period
//! - HUD board with raid/combat slot arbitration
//! - Restriction service for other plugins
//!
//! The server adapter forwards its events to [`PluginState`] and renders what
//! [`HudBoard`] holds.

pub mod config;
pub mod driver;
mod events;
pub mod hud;
pub mod players;
pub mod service;
pub mod state;

pub use config::{ConfigError, RaidGuardConfig};
pub use driver::TickDriver;
pub use hud::{HudArbiter, HudBoard, HudIndicator, HudLayout, HudState, deny_message};
pub use players::PlayerDirectory;
pub use service::RaidGuardService;
pub use state::PluginState;

use std::path::Path;
use std::sync::Arc;

pub struct RaidGuardPlugin {
    runtime: Arc<tokio::runtime::Runtime>,
    state: Option<PluginState>,
    driver: Option<TickDriver>,
}

impl RaidGuardPlugin {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("raidguard-rt")
            .build()?;

        Ok(Self {
            runtime: Arc::new(runtime),
            state: None,
            driver: None,
        })
    }

    /// Load config, build the engine and start ticking. Loading again replaces
    /// the previous engine after its driver has stopped.
    pub fn on_load(&mut self, data_folder: &Path) -> Result<(), String> {
        if let Some(driver) = self.driver.take() {
            log::info!("raidguard: Reloading, stopping previous tick driver");
            self.runtime.block_on(driver.stop());
        }
        let config_path = data_folder.join("config.toml");
        let config = match RaidGuardConfig::load(&config_path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("raidguard: Failed to load config: {e}");
                return Err(e.to_string());
            }
        };
        let period = config.tick_period();
        log::info!(
            "raidguard: raid {}t r={} merge={:?}, combat {} ({}t)",
            config.raid.duration,
            config.raid.radius,
            config.raid.merge_radius,
            if config.combat.enabled { "on" } else { "off" },
            config.combat.duration,
        );

        let plugin_state = PluginState::new(config);
        let driver = TickDriver::spawn_on(self.runtime.handle(), plugin_state.clone(), period);
        self.state = Some(plugin_state);
        self.driver = Some(driver);

        log::info!("raidguard: Loaded successfully");
        Ok(())
    }

    /// Stop ticking and drop all restriction state.
    pub fn on_unload(&mut self) -> Result<(), String> {
        if let Some(driver) = self.driver.take() {
            self.runtime.block_on(driver.stop());
        }
        self.state = None;
        log::info!("raidguard: Unloaded");
        Ok(())
    }

    /// Shared state for the server adapter. `None` until loaded.
    #[must_use]
    pub const fn state(&self) -> Option<&PluginState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn service(&self) -> Option<RaidGuardService> {
        self.state.as_ref().map(RaidGuardService::from)
    }

    /// Run async work on the plugin's tokio runtime.
    #[inline]
    pub fn block_on<F, T>(&self, f: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        self.runtime.block_on(f)
    }
}
