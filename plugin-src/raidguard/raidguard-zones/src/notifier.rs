//! UI callback surface. The engine only reports remaining time; rendering is the host's job.

use raidguard_types::{EntityId, Ticks};
use std::sync::{Arc, Mutex};

/// Receives restriction state changes for one subsystem.
pub trait UiNotifier: Send {
    /// The entity's indicator should show `remaining` ticks.
    fn on_update(&mut self, entity: EntityId, remaining: Ticks);

    /// The entity has no active restriction in this subsystem; remove its indicator.
    fn on_clear(&mut self, entity: EntityId);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl UiNotifier for NoopNotifier {
    fn on_update(&mut self, _entity: EntityId, _remaining: Ticks) {}

    fn on_clear(&mut self, _entity: EntityId) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Update { entity: EntityId, remaining: Ticks },
    Clear { entity: EntityId },
}

/// Keeps every notification in order. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<UiEvent>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().map_or_else(|_| Vec::new(), |e| e.clone())
    }

    /// Every notification for `entity`, oldest first.
    #[must_use]
    pub fn events_for(&self, entity: EntityId) -> Vec<UiEvent> {
        self.events()
            .into_iter()
            .filter(|event| match event {
                UiEvent::Update { entity: e, .. } | UiEvent::Clear { entity: e } => *e == entity,
            })
            .collect()
    }

    /// The newest notification for `entity`.
    #[must_use]
    pub fn last_for(&self, entity: EntityId) -> Option<UiEvent> {
        self.events_for(entity).pop()
    }

    /// What the indicator currently shows: `Some(remaining)` or `None` when cleared/never shown.
    #[must_use]
    pub fn shown(&self, entity: EntityId) -> Option<Ticks> {
        match self.last_for(entity)? {
            UiEvent::Update { remaining, .. } => Some(remaining),
            UiEvent::Clear { .. } => None,
        }
    }

    pub fn clear_log(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    fn push(&self, event: UiEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl UiNotifier for RecordingNotifier {
    fn on_update(&mut self, entity: EntityId, remaining: Ticks) {
        self.push(UiEvent::Update { entity, remaining });
    }

    fn on_clear(&mut self, entity: EntityId) {
        self.push(UiEvent::Clear { entity });
    }
}

/// Render remaining ticks (one tick per second) as `1h 2m 3s`, `2m 3s` or `3s`.
#[must_use]
pub fn format_remaining(ticks: Ticks) -> String {
    let h = ticks / 3600;
    let m = (ticks % 3600) / 60;
    let s = ticks % 60;
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn format_remaining_picks_largest_unit() {
        assert_eq!(format_remaining(0), "0s");
        assert_eq!(format_remaining(59), "59s");
        assert_eq!(format_remaining(60), "1m 0s");
        assert_eq!(format_remaining(125), "2m 5s");
        assert_eq!(format_remaining(3723), "1h 2m 3s");
    }

    #[test]
    fn recording_notifier_clones_share_log() {
        let recorder = RecordingNotifier::new();
        let mut handle = recorder.clone();
        let entity = Uuid::new_v4();

        handle.on_update(entity, 5);
        assert_eq!(recorder.shown(entity), Some(5));

        handle.on_clear(entity);
        assert_eq!(recorder.shown(entity), None);
        assert_eq!(recorder.events_for(entity).len(), 2);
    }
}
