//! State management for a Pitch Speller match.
//!
//! This module provides the core state types and the manager that drives them:
//!
//! - `dictionary` - Word list lookups
//! - `letters` - Seed-word corpus and letter-set generation
//! - `scoring` - Word scores, tile validation and the shot model
//! - `phase` - Match phase state machine
//! - `match_state` - The authoritative match state
//! - `events` - Event vocabulary and listeners
//! - `scheduler` - Cooperative clock and deferred transitions
//! - `config` - Match tuning
//! - `manager` - `GameManager`, tying it all together
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                             GameManager                              │
//! │                                                                      │
//! │  ┌────────────────┐  ┌─────────────────┐  ┌──────────────────────┐   │
//! │  │   Dictionary   │  │ LetterGenerator │  │      Scheduler       │   │
//! │  │                │  │                 │  │                      │   │
//! │  │ word →         │  │ seed word →     │  │ interval tick        │   │
//! │  │   valid?       │  │   5 LetterSets  │  │ deferred tasks       │   │
//! │  │                │  │   per round     │  │   (epoch-tagged)     │   │
//! │  └────────────────┘  └─────────────────┘  └──────────────────────┘   │
//! │                                                                      │
//! │  ┌────────────────────────────────────────────────────────────────┐  │
//! │  │                    MatchState (owned, single)                  │  │
//! │  │                                                                │  │
//! │  │   Playing ──▶ Shot ──▶ Goal/Miss ──▶ Playing (next) / MatchEnd │  │
//! │  │      └──────▶ Timeout ───────────────▶                         │  │
//! │  └────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                    │
//! │                      snapshot + GameEvent                            │
//! │                                 ▼                                    │
//! │                             Listeners                                │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dictionary;
pub mod events;
pub mod letters;
pub mod manager;
pub mod match_state;
pub mod phase;
pub mod scheduler;
pub mod scoring;
pub mod source;

// Re-export commonly used types
pub use config::{GameConfig, PASS_THRESHOLDS};
pub use dictionary::{Dictionary, Lexicon};
pub use events::{GameEvent, Listener, ListenerId, Listeners};
pub use letters::{
    Difficulty, LetterGenerator, LetterSet, SeedWordEntry, Tile, ROUND_SIZE, SURROUNDING_TILES,
};
pub use manager::{AcceptedWord, GameManager, SubmitRejection};
pub use match_state::{MatchSnapshot, MatchState};
pub use phase::{InvalidTransition, MatchPhase, PhaseEvent};
pub use scheduler::Scheduler;
pub use scoring::{is_valid_composition, shot_success, word_score, ShotResult};
pub use source::TextSource;
