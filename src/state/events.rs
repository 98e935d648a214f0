//! Match events and the listener registry.
//!
//! Every mutating operation on the manager finishes its state change, takes
//! one snapshot, then hands `(snapshot, event)` to each listener in
//! subscription order. Listeners only get shared references, so they cannot
//! reach back into the manager while an emission is in flight.

use serde::Serialize;

use super::letters::Tile;
use super::match_state::MatchSnapshot;
use super::scoring::ShotResult;

/// Everything the match announces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum GameEvent {
    Initialized,
    MatchStart,
    Tick,
    LetterAdded(Tile),
    LetterRemoved,
    WordCleared,
    #[serde(rename_all = "camelCase")]
    WordSubmitted {
        word: String,
        score: u32,
        total_points: u32,
        has_bonus: bool,
    },
    #[serde(rename_all = "camelCase")]
    PassCompleted { pass_index: usize, time_bonus: f64 },
    ShotTaken(ShotResult),
    GoalScored { goals: u32 },
    ShotMissed,
    Timeout,
    PossessionStart { possession: u32 },
    MatchEnd { goals: u32 },
}

impl GameEvent {
    /// Event name as presentation layers know it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::MatchStart => "matchStart",
            Self::Tick => "tick",
            Self::LetterAdded(_) => "letterAdded",
            Self::LetterRemoved => "letterRemoved",
            Self::WordCleared => "wordCleared",
            Self::WordSubmitted { .. } => "wordSubmitted",
            Self::PassCompleted { .. } => "passCompleted",
            Self::ShotTaken(_) => "shotTaken",
            Self::GoalScored { .. } => "goalScored",
            Self::ShotMissed => "shotMissed",
            Self::Timeout => "timeout",
            Self::PossessionStart { .. } => "possessionStart",
            Self::MatchEnd { .. } => "matchEnd",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Callback invoked for every event.
pub type Listener = Box<dyn FnMut(&MatchSnapshot, &GameEvent) + Send>;

/// Ordered set of listeners keyed by [`ListenerId`].
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call every listener with the same snapshot.
    pub fn notify(&mut self, snapshot: &MatchSnapshot, event: &GameEvent) {
        for (_, listener) in &mut self.entries {
            listener(snapshot, event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::letters::{Difficulty, LetterSet};
    use crate::state::match_state::MatchState;
    use std::sync::{Arc, Mutex};

    fn snapshot() -> MatchSnapshot {
        let letters = LetterSet {
            center: "R".to_string(),
            surrounding: ["A", "E", "S", "T", "N"].map(String::from).to_vec(),
            seed_word: "ARTENS".to_string(),
            difficulty: Difficulty::Easy,
        };
        MatchState::new(&letters, 20.0)
    }

    #[test]
    fn test_event_names() {
        assert_eq!(GameEvent::MatchStart.name(), "matchStart");
        assert_eq!(GameEvent::LetterAdded("QU".into()).name(), "letterAdded");
        assert_eq!(GameEvent::PossessionStart { possession: 2 }.name(), "possessionStart");
    }

    #[test]
    fn test_event_json() {
        let event = GameEvent::WordSubmitted {
            word: "RATES".to_string(),
            score: 6,
            total_points: 6,
            has_bonus: true,
        };
        let json = event.to_json();
        assert_eq!(json["event"], "wordSubmitted");
        assert_eq!(json["data"]["totalPoints"], 6);
        assert_eq!(json["data"]["hasBonus"], true);
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::new();

        let log = Arc::clone(&seen);
        let first = listeners.subscribe(Box::new(move |_, event| {
            log.lock().unwrap().push(format!("a:{}", event.name()));
        }));
        let log = Arc::clone(&seen);
        listeners.subscribe(Box::new(move |_, event| {
            log.lock().unwrap().push(format!("b:{}", event.name()));
        }));

        let state = snapshot();
        listeners.notify(&state, &GameEvent::Tick);
        assert!(listeners.unsubscribe(first));
        assert!(!listeners.unsubscribe(first));
        listeners.notify(&state, &GameEvent::Timeout);

        assert_eq!(*seen.lock().unwrap(), vec!["a:tick", "b:tick", "b:timeout"]);
        assert_eq!(listeners.len(), 1);
    }
}
