//! HUD state and layout: where the raid and combat indicators go.
//!
//! Each subsystem writes through its own [`HudNotifier`]; the [`HudArbiter`]
//! reads both and assigns slots so the two indicators never fight over the
//! same spot. Drawing the indicator is left to the server.

use raidguard_types::{CommandVerdict, EntityId, RestrictionKind, Ticks};
use raidguard_zones::{UiNotifier, format_remaining};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// What one player's HUD currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudState {
    pub raid: Option<Ticks>,
    pub combat: Option<Ticks>,
}

impl HudState {
    const fn slot_mut(&mut self, kind: RestrictionKind) -> &mut Option<Ticks> {
        match kind {
            RestrictionKind::Raid => &mut self.raid,
            RestrictionKind::Combat => &mut self.combat,
        }
    }

    const fn is_empty(&self) -> bool {
        self.raid.is_none() && self.combat.is_none()
    }
}

/// Shared HUD table. Key = player UUID.
#[derive(Debug, Clone, Default)]
pub struct HudBoard {
    states: Arc<RwLock<HashMap<EntityId, HudState>>>,
}

impl HudBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, uuid: &EntityId) -> HudState {
        self.states
            .read()
            .ok()
            .and_then(|map| map.get(uuid).copied())
            .unwrap_or_default()
    }

    fn set(&self, uuid: EntityId, kind: RestrictionKind, value: Option<Ticks>) {
        if let Ok(mut map) = self.states.write() {
            let state = map.entry(uuid).or_default();
            *state.slot_mut(kind) = value;
            if state.is_empty() {
                map.remove(&uuid);
            }
        }
    }

    /// Number of players with any indicator showing.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.states.read().map_or(0, |map| map.len())
    }

    /// Build a notifier that writes one subsystem's column of this board.
    #[must_use]
    pub fn notifier(&self, kind: RestrictionKind) -> HudNotifier {
        HudNotifier {
            kind,
            board: self.clone(),
        }
    }
}

/// Engine-facing writer for one subsystem.
#[derive(Debug, Clone)]
pub struct HudNotifier {
    kind: RestrictionKind,
    board: HudBoard,
}

impl UiNotifier for HudNotifier {
    fn on_update(&mut self, entity: EntityId, remaining: Ticks) {
        self.board.set(entity, self.kind, Some(remaining));
    }

    fn on_clear(&mut self, entity: EntityId) {
        self.board.set(entity, self.kind, None);
    }
}

/// Indicator color, mirrored onto the server's bossbar palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudColor {
    Red,
    Yellow,
}

#[must_use]
pub const fn kind_color(kind: RestrictionKind) -> HudColor {
    match kind {
        RestrictionKind::Raid => HudColor::Red,
        RestrictionKind::Combat => HudColor::Yellow,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudIndicator {
    pub kind: RestrictionKind,
    pub remaining: Ticks,
    pub color: HudColor,
    pub title: String,
}

impl HudIndicator {
    fn new(kind: RestrictionKind, remaining: Ticks) -> Self {
        let label = match kind {
            RestrictionKind::Raid => "RAID BLOCKED",
            RestrictionKind::Combat => "COMBAT BLOCKED",
        };
        Self {
            kind,
            remaining,
            color: kind_color(kind),
            title: format!("{label}: {}", format_remaining(remaining)),
        }
    }
}

/// Slot assignment for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HudLayout {
    pub primary: Option<HudIndicator>,
    pub secondary: Option<HudIndicator>,
}

/// Raid owns the primary slot while active; combat takes whatever is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct HudArbiter;

impl HudArbiter {
    #[must_use]
    pub fn layout(state: HudState) -> HudLayout {
        let raid = state.raid.map(|t| HudIndicator::new(RestrictionKind::Raid, t));
        let combat = state
            .combat
            .map(|t| HudIndicator::new(RestrictionKind::Combat, t));
        match raid {
            Some(raid) => HudLayout {
                primary: Some(raid),
                secondary: combat,
            },
            None => HudLayout {
                primary: combat,
                secondary: None,
            },
        }
    }

    #[must_use]
    pub fn layout_for(board: &HudBoard, uuid: &EntityId) -> HudLayout {
        Self::layout(board.get(uuid))
    }
}

/// Chat reply for a denied command, or `None` when it was allowed.
#[must_use]
pub fn deny_message(verdict: CommandVerdict) -> Option<String> {
    match verdict {
        CommandVerdict::Allow => None,
        CommandVerdict::Deny { kind, remaining } => Some(format!(
            "You can't use that command while {kind} blocked ({} left)",
            format_remaining(remaining)
        )),
    }
}
