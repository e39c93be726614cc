//! RaidGuard configuration: loaded from `config.toml` in the plugin's data folder.
//!
//! Out-of-range values are corrected here, at load time, so the engine can take
//! its settings as given.

use raidguard_types::Ticks;
use raidguard_zones::{
    CombatSettings, CommandBlocklist, RaidSettings, RestrictionSettings,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

const DEFAULT_RAID_DURATION: Ticks = 300;
const DEFAULT_RADIUS: f64 = 50.0;
const DEFAULT_COMBAT_DURATION: Ticks = 30;
const DEFAULT_TICK_MILLIS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Read(#[source] std::io::Error),
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("create config dir: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("write default config: {0}")]
    Write(#[source] std::io::Error),
}

/// Top-level config file layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RaidGuardConfig {
    pub raid: RaidConfig,
    pub combat: CombatConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RaidConfig {
    pub duration: Ticks,
    pub radius: f64,
    /// Defaults to half the radius.
    pub merge_radius: Option<f64>,
    pub remove_on_death: bool,
    pub block_building: bool,
    pub block_upgrading: bool,
    pub blocked_commands: Vec<String>,
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_RAID_DURATION,
            radius: DEFAULT_RADIUS,
            merge_radius: None,
            remove_on_death: true,
            block_building: true,
            block_upgrading: true,
            blocked_commands: vec![
                "/tp".to_owned(),
                "/home".to_owned(),
                "/kit".to_owned(),
                "/trade".to_owned(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub enabled: bool,
    pub duration: Ticks,
    pub remove_on_death: bool,
    pub blocked_commands: Vec<String>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: DEFAULT_COMBAT_DURATION,
            remove_on_death: true,
            blocked_commands: vec!["/tp".to_owned(), "/home".to_owned()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Wall-clock length of one tick.
    pub tick_millis: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_millis: DEFAULT_TICK_MILLIS,
        }
    }
}

impl RaidGuardConfig {
    /// Load config from a TOML file, writing the bundled default first if it is missing.
    /// The result is already sanitized.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = if path.exists() {
            let text = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
            toml::from_str(&text)?
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(ConfigError::CreateDir)?;
            }
            std::fs::write(path, DEFAULT_CONFIG).map_err(ConfigError::Write)?;
            log::info!("raidguard: Created default config at {path:?}");
            toml::from_str(DEFAULT_CONFIG)?
        };
        Ok(config.sanitize())
    }

    /// Replace out-of-range values with safe defaults, logging each correction.
    #[must_use]
    pub fn sanitize(mut self) -> Self {
        if self.raid.duration == 0 {
            log::warn!("raidguard: raid.duration must be positive, using {DEFAULT_RAID_DURATION}");
            self.raid.duration = DEFAULT_RAID_DURATION;
        }
        if !self.raid.radius.is_finite() || self.raid.radius <= 0.0 {
            log::warn!(
                "raidguard: raid.radius {} is invalid, using {DEFAULT_RADIUS}",
                self.raid.radius
            );
            self.raid.radius = DEFAULT_RADIUS;
        }
        let half_radius = self.raid.radius / 2.0;
        match self.raid.merge_radius {
            None => self.raid.merge_radius = Some(half_radius),
            Some(m) if !m.is_finite() || m <= 0.0 || m > self.raid.radius => {
                log::warn!("raidguard: raid.merge_radius {m} is invalid, using {half_radius}");
                self.raid.merge_radius = Some(half_radius);
            }
            Some(_) => {}
        }
        if self.combat.duration == 0 {
            log::warn!(
                "raidguard: combat.duration must be positive, using {DEFAULT_COMBAT_DURATION}"
            );
            self.combat.duration = DEFAULT_COMBAT_DURATION;
        }
        if self.scheduler.tick_millis == 0 {
            log::warn!("raidguard: scheduler.tick_millis must be positive, using {DEFAULT_TICK_MILLIS}");
            self.scheduler.tick_millis = DEFAULT_TICK_MILLIS;
        }
        self
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.scheduler.tick_millis)
    }

    /// Engine settings. Expects a sanitized config.
    #[must_use]
    pub fn to_settings(&self) -> RestrictionSettings {
        RestrictionSettings {
            raid: RaidSettings {
                duration: self.raid.duration,
                zone_radius: self.raid.radius,
                merge_radius: self.raid.merge_radius.unwrap_or(self.raid.radius / 2.0),
                remove_on_death: self.raid.remove_on_death,
                block_building: self.raid.block_building,
                block_upgrading: self.raid.block_upgrading,
                blocked_commands: CommandBlocklist::new(&self.raid.blocked_commands),
            },
            combat: CombatSettings {
                enabled: self.combat.enabled,
                duration: self.combat.duration,
                remove_on_death: self.combat.remove_on_death,
                blocked_commands: CommandBlocklist::new(&self.combat.blocked_commands),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_default_parses() {
        let config: RaidGuardConfig = toml::from_str(DEFAULT_CONFIG).expect("default config");
        let config = config.sanitize();

        assert_eq!(config.raid.duration, 300);
        assert_eq!(config.raid.merge_radius, Some(25.0));
        assert!(config.combat.enabled);
        assert_eq!(config.tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: RaidGuardConfig = toml::from_str("[raid]\nduration = 60\n").expect("parse");
        let config = config.sanitize();

        assert_eq!(config.raid.duration, 60);
        assert_eq!(config.raid.radius, 50.0);
        assert_eq!(config.raid.merge_radius, Some(25.0));
        assert_eq!(config.combat.duration, 30);
    }

    #[test]
    fn sanitize_corrects_out_of_range_values() {
        let text = r#"
            [raid]
            duration = 0
            radius = -4.0
            merge_radius = 500.0
            [combat]
            duration = 0
            [scheduler]
            tick_millis = 0
        "#;
        let config: RaidGuardConfig = toml::from_str(text).expect("parse");
        let config = config.sanitize();

        assert_eq!(config.raid.duration, DEFAULT_RAID_DURATION);
        assert_eq!(config.raid.radius, DEFAULT_RADIUS);
        assert_eq!(config.raid.merge_radius, Some(DEFAULT_RADIUS / 2.0));
        assert_eq!(config.combat.duration, DEFAULT_COMBAT_DURATION);
        assert_eq!(config.scheduler.tick_millis, DEFAULT_TICK_MILLIS);
    }

    #[test]
    fn settings_carry_blocklists() {
        let settings = RaidGuardConfig::default().sanitize().to_settings();

        assert!(settings.raid.blocked_commands.matches("/trade bob"));
        assert!(!settings.combat.blocked_commands.matches("/trade bob"));
        assert_eq!(settings.raid.merge_radius, 25.0);
    }

    #[test]
    fn load_creates_missing_folder_and_reads_it_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plugins").join("raidguard").join("config.toml");

        let first = RaidGuardConfig::load(&path).expect("first load");
        assert_eq!(std::fs::read_to_string(&path).expect("written"), DEFAULT_CONFIG);

        std::fs::write(&path, "[combat]\nenabled = false\n").expect("edit");
        let second = RaidGuardConfig::load(&path).expect("second load");
        assert!(first.combat.enabled);
        assert!(!second.combat.enabled);
        assert_eq!(second.raid.duration, 300);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = toml::from_str::<RaidGuardConfig>("[raid\n").map_err(ConfigError::from);
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }
}
