//! Engine settings. Supplied by the host; the engine never loads or validates them.

use raidguard_types::Ticks;

/// Command prefixes blocked while a restriction is active.
///
/// Matching ignores a leading `/` and ASCII case. A prefix blocks every command
/// that starts with it, so `tp` also blocks `/tpa`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBlocklist {
    prefixes: Vec<String>,
}

impl CommandBlocklist {
    #[must_use]
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .map(|p| normalize(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { prefixes }
    }

    /// Returns true if `command` starts with any blocked prefix.
    #[must_use]
    pub fn matches(&self, command: &str) -> bool {
        let command = normalize(command);
        self.prefixes
            .iter()
            .any(|prefix| command.starts_with(prefix.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }
}

fn normalize(command: &str) -> String {
    command.trim().trim_start_matches('/').to_ascii_lowercase()
}

/// Raid zone policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RaidSettings {
    /// Countdown given to a new membership, and the lifetime of a zone after each trigger.
    pub duration: Ticks,
    /// Distance from a zone's center within which entities are members.
    pub zone_radius: f64,
    /// Triggering events closer than this to an existing zone extend it instead of creating one.
    pub merge_radius: f64,
    pub remove_on_death: bool,
    pub block_building: bool,
    pub block_upgrading: bool,
    pub blocked_commands: CommandBlocklist,
}

impl Default for RaidSettings {
    fn default() -> Self {
        Self {
            duration: 300,
            zone_radius: 50.0,
            merge_radius: 25.0,
            remove_on_death: true,
            block_building: true,
            block_upgrading: true,
            blocked_commands: CommandBlocklist::new(["tp", "home", "kit", "trade"]),
        }
    }
}

/// Combat policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatSettings {
    pub enabled: bool,
    pub duration: Ticks,
    pub remove_on_death: bool,
    pub blocked_commands: CommandBlocklist,
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: 30,
            remove_on_death: true,
            blocked_commands: CommandBlocklist::new(["tp", "home"]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestrictionSettings {
    pub raid: RaidSettings,
    pub combat: CombatSettings,
}
