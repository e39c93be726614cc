//! RaidGuard zone engine.
//!
//! Tracks raid zones created by structure damage and the time-limited
//! restrictions they put on nearby players:
//! - **[zone_registry]**: create, merge and expire spherical zones
//! - **[tracker]**: per-player, per-zone countdowns with saved time on exit
//! - **[combat]**: the single-timer combat restriction
//! - **[scheduler]**: the one tick that advances every countdown
//! - **[gate]**: read-only queries for command and build filters
//! - **[notifier]**: UI callbacks (rendering lives in the host)
//!
//! The engine has no server dependency: positions and liveness come in through
//! [`EntityWorld`], UI goes out through [`UiNotifier`].

pub mod combat;
pub mod engine;
pub mod gate;
pub mod notifier;
pub mod scheduler;
pub mod settings;
pub mod tracker;
pub mod world;
pub mod zone_registry;

pub use combat::CombatTracker;
pub use engine::RaidGuard;
pub use gate::{RestrictionGate, RestrictionStatus};
pub use notifier::{NoopNotifier, RecordingNotifier, UiEvent, UiNotifier, format_remaining};
pub use scheduler::{TickScheduler, TickSummary};
pub use settings::{CombatSettings, CommandBlocklist, RaidSettings, RestrictionSettings};
pub use tracker::RestrictionTracker;
pub use world::{EntityWorld, InMemoryWorld};
pub use zone_registry::{Zone, ZoneRegistry, ZoneSnapshot};
