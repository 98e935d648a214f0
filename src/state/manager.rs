//! The match coordinator.
//!
//! `GameManager` owns the authoritative [`MatchState`] and is the only thing
//! that changes it. It pulls letter sets from the [`LetterGenerator`], checks
//! words against a [`Lexicon`], runs the clock through a cooperative
//! [`Scheduler`], and tells listeners about every change.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pitch_speller::{Dictionary, GameManager, LetterGenerator, TextSource};
//!
//! let dictionary = Arc::new(Dictionary::new(TextSource::inline("RATES\nSTARE\n")));
//! let corpus = "seed_word,letters,viable_centres,centre_difficulty\n\
//!               ARTENS,\"R,A,E,S,T,N\",\"R\",\"{'R': 'Easy'}\"\n";
//! let letters = Arc::new(LetterGenerator::new(TextSource::inline(corpus)));
//!
//! let mut game = GameManager::new(dictionary, letters);
//! game.initialize().unwrap();
//! game.start_match();
//!
//! for tile in ["R", "A", "T", "E", "S"] {
//!     game.add_letter(tile);
//! }
//! let accepted = game.submit_word().unwrap();
//! assert_eq!(accepted.score, 6);
//!
//! game.advance(Duration::from_millis(500));
//! assert!(game.state().time_remaining < 20.0);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use super::config::GameConfig;
use super::dictionary::Lexicon;
use super::events::{GameEvent, ListenerId, Listeners};
use super::letters::{fallback_letter_set, LetterGenerator, LetterSet};
use super::match_state::{MatchSnapshot, MatchState};
use super::phase::PhaseEvent;
use super::scheduler::{Fired, Scheduler, Task};
use super::scoring::{self, MIN_SCORING_LENGTH};
use crate::error::LoadError;

/// Why a submitted word was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    NotPlaying,
    TooShort,
    AlreadyUsed,
    InvalidLetters,
    NotInDictionary,
}

impl SubmitRejection {
    /// Reason shown to the player.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotPlaying => "Not in playing phase",
            Self::TooShort => "Word too short",
            Self::AlreadyUsed => "Already used",
            Self::InvalidLetters => "Invalid letters",
            Self::NotInDictionary => "Not in dictionary",
        }
    }
}

impl fmt::Display for SubmitRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for SubmitRejection {}

/// A word that scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedWord {
    pub word: String,
    pub score: u32,
    pub has_bonus: bool,
    /// Possession points after this word
    pub total_points: u32,
}

/// Drives a single match.
pub struct GameManager {
    config: GameConfig,
    dictionary: Arc<dyn Lexicon>,
    letters: Arc<LetterGenerator>,
    rng: Box<dyn RngCore + Send>,
    state: MatchState,
    /// Letter sets for the current possession, indexed by pass
    round: Vec<LetterSet>,
    listeners: Listeners,
    scheduler: Scheduler,
    destroyed: bool,
}

impl GameManager {
    /// Create a manager with the default config and a clock-seeded RNG.
    pub fn new(dictionary: Arc<dyn Lexicon>, letters: Arc<LetterGenerator>) -> Self {
        let seed = chrono::Utc::now().timestamp_millis() as u64;
        Self::with_parts(
            GameConfig::default(),
            dictionary,
            letters,
            Box::new(StdRng::seed_from_u64(seed)),
        )
    }

    /// Create a manager from explicit parts. Tests pass a fixed RNG here.
    pub fn with_parts(
        config: GameConfig,
        dictionary: Arc<dyn Lexicon>,
        letters: Arc<LetterGenerator>,
        mut rng: Box<dyn RngCore + Send>,
    ) -> Self {
        // Placeholder board until start_match draws a real round.
        let mut board_rng = StdRng::seed_from_u64(rng.next_u64());
        let round = vec![fallback_letter_set(&mut board_rng, &[])];
        let state = MatchState::new(&round[0], config.opening_time());
        Self {
            config,
            dictionary,
            letters,
            rng,
            state,
            round,
            listeners: Listeners::new(),
            scheduler: Scheduler::new(),
            destroyed: false,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the randomness source for rounds and shots.
    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Load the dictionary and the seed-word corpus.
    ///
    /// # Errors
    ///
    /// Any load failure is returned as-is; gameplay should not start.
    pub fn initialize(&mut self) -> Result<(), LoadError> {
        if self.destroyed {
            return Ok(());
        }
        self.dictionary.load()?;
        self.letters.load()?;
        log::info!(
            "Initialized with {} words and {} seed words",
            self.dictionary.word_count(),
            self.letters.entry_count()
        );
        self.emit(GameEvent::Initialized);
        Ok(())
    }

    // Observation

    /// Register a listener for every future event.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&MatchSnapshot, &GameEvent) + Send + 'static,
    {
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Owned copy of the current state.
    pub fn get_state(&self) -> MatchSnapshot {
        self.state.clone()
    }

    /// Borrow the current state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Letter sets of the current possession.
    pub fn round(&self) -> &[LetterSet] {
        &self.round
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // Match lifecycle

    /// Reset to possession 1 with a fresh round and start the clock.
    pub fn start_match(&mut self) {
        if self.destroyed {
            return;
        }
        self.scheduler.cancel_all();
        self.new_round();
        self.state = MatchState::new(&self.round[0], self.config.opening_time());
        self.start_timer();
        log::info!("Match started, center {}", self.state.center_tile);
        self.emit(GameEvent::MatchStart);
    }

    /// Abandon whatever is in progress and start over.
    pub fn restart_match(&mut self) {
        self.stop_timer();
        self.start_match();
    }

    /// Stop everything and drop listeners. Later calls do nothing.
    pub fn destroy(&mut self) {
        self.scheduler.cancel_all();
        self.listeners.clear();
        self.destroyed = true;
    }

    /// Let `elapsed` real time pass, firing due ticks and transitions.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.destroyed {
            return;
        }
        let until = self.scheduler.now() + elapsed;
        while let Some(fired) = self.scheduler.pop_due(until) {
            match fired {
                Fired::Tick => self.on_tick(),
                Fired::Task(task) => self.run_task(task),
            }
        }
        self.scheduler.settle(until);
    }

    // Word building

    pub fn add_letter(&mut self, tile: &str) {
        if !self.can_act() {
            return;
        }
        let tile = tile.trim().to_uppercase();
        if tile.is_empty() {
            return;
        }
        self.state.current_word.push(tile.clone());
        self.emit(GameEvent::LetterAdded(tile));
    }

    /// Remove the last tile as a unit, so `QU` goes in one step.
    pub fn remove_letter(&mut self) {
        if !self.can_act() {
            return;
        }
        if self.state.current_word.pop().is_some() {
            self.emit(GameEvent::LetterRemoved);
        }
    }

    pub fn clear_word(&mut self) {
        if !self.can_act() {
            return;
        }
        self.state.current_word.clear();
        self.emit(GameEvent::WordCleared);
    }

    /// Validate and score the word in progress.
    ///
    /// Checks run in a fixed order and the first failure is returned; a
    /// rejected word leaves the state untouched.
    pub fn submit_word(&mut self) -> Result<AcceptedWord, SubmitRejection> {
        if !self.can_act() {
            return Err(SubmitRejection::NotPlaying);
        }

        let word = self.state.current_word_text().trim().to_uppercase();
        if word.chars().count() < MIN_SCORING_LENGTH {
            return Err(SubmitRejection::TooShort);
        }
        if self.state.has_submitted(&word) {
            return Err(SubmitRejection::AlreadyUsed);
        }
        if !scoring::is_valid_composition(&word, &self.state.available_tiles()) {
            return Err(SubmitRejection::InvalidLetters);
        }
        if !self.dictionary.is_valid(&word) {
            return Err(SubmitRejection::NotInDictionary);
        }

        let score = scoring::word_score(&word, &self.state.center_tile);
        let has_bonus = scoring::has_center_bonus(&word, &self.state.center_tile);
        self.state.current_points = self.state.current_points.saturating_add(score);
        self.state.submitted_words.push(word.clone());
        self.state.current_word.clear();

        let accepted = AcceptedWord {
            word,
            score,
            has_bonus,
            total_points: self.state.current_points,
        };
        self.emit(GameEvent::WordSubmitted {
            word: accepted.word.clone(),
            score,
            total_points: accepted.total_points,
            has_bonus,
        });
        Ok(accepted)
    }

    // Passing and shooting

    /// Points still needed to pass (or shoot) from here.
    pub fn points_to_pass(&self) -> u32 {
        self.config
            .threshold(self.state.pass_index)
            .saturating_sub(self.state.current_points)
    }

    pub fn can_pass(&self) -> bool {
        self.can_act() && self.points_to_pass() == 0
    }

    /// Pass to the next letter set, or shoot from the last one.
    pub fn execute_pass(&mut self) {
        if !self.can_pass() {
            return;
        }
        if self.state.pass_index >= self.config.shot_index() {
            self.execute_shot();
            return;
        }

        self.state.pass_index += 1;
        self.state.clear_segment();
        self.state.time_remaining =
            (self.state.time_remaining + self.config.pass_time_bonus).min(self.config.max_time);
        if let Some(letters) = self.round.get(self.state.pass_index).cloned() {
            self.state.apply_letters(&letters);
            self.state.used_centers.push(letters.center);
        }

        log::debug!(
            "Pass {} completed, center now {}",
            self.state.pass_index,
            self.state.center_tile
        );
        self.emit(GameEvent::PassCompleted {
            pass_index: self.state.pass_index,
            time_bonus: self.config.pass_time_bonus,
        });
    }

    fn execute_shot(&mut self) {
        if !self.transition(PhaseEvent::Shoot) {
            return;
        }
        self.stop_timer();

        let threshold = self.config.threshold(self.config.shot_index());
        let bonus_points = i64::from(self.state.current_points) - i64::from(threshold);
        let result = scoring::shot_success(self.state.time_remaining, bonus_points, &mut self.rng);

        log::debug!(
            "Shot taken: accuracy {:.1}, power {:.1}",
            result.accuracy,
            result.power
        );
        self.emit(GameEvent::ShotTaken(result));
        self.scheduler.schedule(
            self.config.shot_reveal_delay(),
            Task::ResolveShot {
                success: result.success,
            },
        );
    }

    // Clock and deferred transitions

    fn on_tick(&mut self) {
        if !self.state.phase.is_playing() {
            return;
        }
        let remaining = (self.state.time_remaining - self.config.tick_seconds).max(0.0);
        // Keep repeated subtraction from drifting off the tick grid.
        self.state.time_remaining = (remaining * 1e6).round() / 1e6;
        self.emit(GameEvent::Tick);

        if self.state.time_remaining <= 0.0 {
            self.handle_timeout();
        }
    }

    fn handle_timeout(&mut self) {
        if !self.transition(PhaseEvent::Expire) {
            return;
        }
        self.stop_timer();
        log::debug!("Possession {} timed out", self.state.possession);
        self.emit(GameEvent::Timeout);
        self.scheduler
            .schedule(self.config.possession_delay(), Task::AdvancePossession);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::ResolveShot { success: true } => {
                if !self.transition(PhaseEvent::Score) {
                    return;
                }
                self.state.goals += 1;
                log::info!("Goal! {} scored", self.state.goals);
                self.emit(GameEvent::GoalScored {
                    goals: self.state.goals,
                });
                self.scheduler
                    .schedule(self.config.possession_delay(), Task::AdvancePossession);
            }
            Task::ResolveShot { success: false } => {
                if !self.transition(PhaseEvent::MissShot) {
                    return;
                }
                self.emit(GameEvent::ShotMissed);
                self.scheduler
                    .schedule(self.config.possession_delay(), Task::AdvancePossession);
            }
            Task::AdvancePossession => self.advance_possession(),
        }
    }

    fn advance_possession(&mut self) {
        if self.state.possession >= self.config.possessions {
            self.end_match();
            return;
        }
        if !self.transition(PhaseEvent::NextPossession) {
            return;
        }

        self.state.possession += 1;
        self.state.current_points = 0;
        self.state.pass_index = 0;
        self.state.time_remaining = self.config.opening_time();
        self.state.clear_segment();

        self.new_round();
        let letters = self.round[0].clone();
        self.state.apply_letters(&letters);
        self.state.used_centers = vec![letters.center];

        self.start_timer();
        log::info!("Possession {} started", self.state.possession);
        self.emit(GameEvent::PossessionStart {
            possession: self.state.possession,
        });
    }

    fn end_match(&mut self) {
        if !self.transition(PhaseEvent::EndMatch) {
            return;
        }
        self.stop_timer();
        log::info!("Match ended with {} goals", self.state.goals);
        self.emit(GameEvent::MatchEnd {
            goals: self.state.goals,
        });
    }

    // Helpers

    fn can_act(&self) -> bool {
        !self.destroyed && self.state.phase.is_playing()
    }

    fn new_round(&mut self) {
        let seed = self.rng.next_u64();
        self.round = self.letters.generate_round_sets(Some(seed));
    }

    fn start_timer(&mut self) {
        self.scheduler.start_interval(self.config.tick_interval());
    }

    fn stop_timer(&mut self) {
        self.scheduler.stop_interval();
    }

    /// Move the phase along, or log and refuse.
    fn transition(&mut self, event: PhaseEvent) -> bool {
        match self.state.phase.apply(event) {
            Ok(phase) => {
                self.state.phase = phase;
                true
            }
            Err(err) => {
                log::warn!("{}", err);
                false
            }
        }
    }

    fn emit(&mut self, event: GameEvent) {
        log::trace!("event {}", event.name());
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.state.clone();
        self.listeners.notify(&snapshot, &event);
    }
}

impl fmt::Debug for GameManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameManager")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("listeners", &self.listeners)
            .field("scheduler", &self.scheduler)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
