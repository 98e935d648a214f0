//! Pitch Speller State Library
//!
//! Game logic for Pitch Speller, a word-spelling arcade game told as a
//! football possession: spell words from six tiles to build points, pass the
//! ball through four thresholds, then shoot. Three possessions make a match.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Match State Machine** - `GameManager` owns the single authoritative
//!   match, validates phase transitions and emits an event for every change.
//!
//! - **Round Generation** - `LetterGenerator` draws five letter sets per
//!   possession from a curated seed-word corpus, reproducibly from a seed.
//!
//! - **Scoring** - Fibonacci word scores, tile-reuse validation with `QU`
//!   as one tile, and the shot-success model.
//!
//! - **Dictionary** - Case-insensitive word-list membership.
//!
//! # Design Principles
//!
//! 1. **State machines validate transitions** - The phase only moves along
//!    legal edges; anything else is refused and logged.
//!
//! 2. **Rejections are values** - A bad word comes back as a
//!    `SubmitRejection`, never a panic, and leaves state untouched.
//!
//! 3. **No ambient clocks or randomness** - Time advances when the host says
//!    so, and every random draw comes from an injectable RNG.
//!
//! 4. **No rendering** - This crate is pure state; snapshots and events are
//!    serializable for whatever draws them.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pitch_speller::{Dictionary, GameEvent, GameManager, LetterGenerator, TextSource};
//!
//! let dictionary = Arc::new(Dictionary::new(TextSource::inline("STARE\nTEARS\n")));
//! let letters = Arc::new(LetterGenerator::new(TextSource::inline(
//!     "seed_word,letters,viable_centres,centre_difficulty\n\
//!      ARTENS,\"R,A,E,S,T,N\",\"R\",\"{'R': 'Hard'}\"\n",
//! )));
//!
//! let mut game = GameManager::new(dictionary, letters);
//! game.initialize().unwrap();
//!
//! game.subscribe(|state, event| {
//!     if let GameEvent::WordSubmitted { word, score, .. } = event {
//!         println!("{} for {} ({} total)", word, score, state.current_points);
//!     }
//! });
//!
//! game.start_match();
//! for tile in ["S", "T", "A", "R", "E"] {
//!     game.add_letter(tile);
//! }
//! assert!(game.submit_word().is_ok());
//! assert!(game.can_pass());
//! game.execute_pass();
//! assert_eq!(game.state().pass_index, 1);
//! ```

pub mod error;
pub mod state;

pub use error::LoadError;

// Re-export everything from state module at crate root
pub use state::*;
