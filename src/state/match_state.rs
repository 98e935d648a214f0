//! Authoritative match state.
//!
//! Only [`GameManager`](super::manager::GameManager) mutates a `MatchState`;
//! everyone else sees clones handed out as snapshots.

use serde::{Deserialize, Serialize};

use super::letters::{LetterSet, Tile};
use super::phase::MatchPhase;

/// Snapshot type given to listeners and `get_state` callers.
pub type MatchSnapshot = MatchState;

/// Match, possession and board state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    /// Current possession (1-indexed)
    pub possession: u32,

    /// Goals scored this match
    pub goals: u32,

    pub phase: MatchPhase,

    /// Points banked this possession
    pub current_points: u32,

    /// 0-3 are passes, 4 is the shot
    pub pass_index: usize,

    /// Seconds left, never negative
    pub time_remaining: f64,

    /// Tiles that have been the center this possession
    pub used_centers: Vec<Tile>,

    /// Tiles of the word being composed
    pub current_word: Vec<Tile>,

    /// Words accepted since the last pass, in submission order
    pub submitted_words: Vec<String>,

    pub center_tile: Tile,

    pub surrounding_tiles: Vec<Tile>,
}

impl MatchState {
    /// Fresh state for possession 1 on the given board.
    pub fn new(letters: &LetterSet, starting_time: f64) -> Self {
        Self {
            possession: 1,
            goals: 0,
            phase: MatchPhase::Playing,
            current_points: 0,
            pass_index: 0,
            time_remaining: starting_time,
            used_centers: vec![letters.center.clone()],
            current_word: Vec::new(),
            submitted_words: Vec::new(),
            center_tile: letters.center.clone(),
            surrounding_tiles: letters.surrounding.clone(),
        }
    }

    /// The word being composed, as one string.
    pub fn current_word_text(&self) -> String {
        self.current_word.concat()
    }

    /// Center plus surrounding tiles.
    pub fn available_tiles(&self) -> Vec<Tile> {
        std::iter::once(self.center_tile.clone())
            .chain(self.surrounding_tiles.iter().cloned())
            .collect()
    }

    pub fn has_submitted(&self, word: &str) -> bool {
        let word = word.to_uppercase();
        self.submitted_words.iter().any(|w| *w == word)
    }

    /// Put a new board in place for the next pass segment.
    pub(crate) fn apply_letters(&mut self, letters: &LetterSet) {
        self.center_tile = letters.center.clone();
        self.surrounding_tiles = letters.surrounding.clone();
    }

    /// Clear the word in progress and the per-segment word list.
    pub(crate) fn clear_segment(&mut self) {
        self.current_word.clear();
        self.submitted_words.clear();
    }

    /// Convert to a JSON snapshot for presentation layers.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "possession": self.possession,
            "goals": self.goals,
            "phase": self.phase.as_str(),
            "currentPoints": self.current_points,
            "passIndex": self.pass_index,
            "timeRemaining": self.time_remaining.max(0.0),
            "usedCenters": self.used_centers,
            "currentWord": self.current_word_text(),
            "submittedWords": self.submitted_words,
            "centerTile": self.center_tile,
            "surroundingTiles": self.surrounding_tiles
        })
    }
}
