//! Match tuning.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Points needed at each pass index; the last entry gates the shot.
pub const PASS_THRESHOLDS: [u32; 5] = [5, 20, 40, 65, 100];

/// Timing and rules for a match.
///
/// Every field has a default, so a JSON config only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds on the clock at the start of each possession
    pub starting_time: f64,
    /// Seconds added for each completed pass
    pub pass_time_bonus: f64,
    /// Clock ceiling in seconds
    pub max_time: f64,
    /// Real time between timer ticks
    pub tick_interval_ms: u64,
    /// Game seconds removed per tick
    pub tick_seconds: f64,
    /// Delay between the shot and its result
    pub shot_reveal_delay_ms: u64,
    /// Delay after a goal, miss or timeout before the next possession
    pub possession_delay_ms: u64,
    /// Possessions per match
    pub possessions: u32,
    pub pass_thresholds: [u32; 5],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_time: 20.0,
            pass_time_bonus: 20.0,
            max_time: 100.0,
            tick_interval_ms: 100,
            tick_seconds: 0.1,
            shot_reveal_delay_ms: 1500,
            possession_delay_ms: 2000,
            possessions: 3,
            pass_thresholds: PASS_THRESHOLDS,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config, filling gaps with defaults.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject clock values no match could run with.
    pub fn validate(&self) -> Result<(), LoadError> {
        let clock = [
            self.starting_time,
            self.pass_time_bonus,
            self.max_time,
            self.tick_seconds,
        ];
        if clock.iter().any(|value| !value.is_finite()) {
            return Err(LoadError::InvalidConfig("clock values must be finite"));
        }
        if self.max_time < 0.0 {
            return Err(LoadError::InvalidConfig("max_time must not be negative"));
        }
        if self.starting_time < 0.0 {
            return Err(LoadError::InvalidConfig("starting_time must not be negative"));
        }
        if self.pass_time_bonus < 0.0 {
            return Err(LoadError::InvalidConfig("pass_time_bonus must not be negative"));
        }
        if self.tick_seconds <= 0.0 {
            return Err(LoadError::InvalidConfig("tick_seconds must be positive"));
        }
        Ok(())
    }

    /// Seconds on the clock when a possession starts, kept within `0..=max_time`.
    ///
    /// Never panics, even on a config that skipped [`validate`](Self::validate);
    /// a NaN bound counts as zero.
    pub fn opening_time(&self) -> f64 {
        self.starting_time.max(0.0).min(self.max_time.max(0.0))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn shot_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.shot_reveal_delay_ms)
    }

    pub fn possession_delay(&self) -> Duration {
        Duration::from_millis(self.possession_delay_ms)
    }

    /// Index of the shot threshold.
    pub fn shot_index(&self) -> usize {
        self.pass_thresholds.len() - 1
    }

    /// Threshold for a pass index; indexes past the end use the shot gate.
    pub fn threshold(&self, pass_index: usize) -> u32 {
        self.pass_thresholds[pass_index.min(self.shot_index())]
    }
}
