//! Match phase state machine.
//!
//! Tracks what the match is doing and validates transitions.
//!
//! # State Diagram
//!
//! ```text
//!   next_possession  ┌─────────────┐
//!  ┌────────────────▶│   Playing   │
//!  │                 └──┬───────┬──┘
//!  │              shoot │       │ expire
//!  │                    ▼       ▼
//!  │            ┌──────────┐  ┌──────────┐
//!  │            │   Shot   │  │ Timeout  │──┐
//!  │            └──┬────┬──┘  └──────────┘  │
//!  │         score │    │ miss              │
//!  │               ▼    ▼                   │
//!  │         ┌──────┐ ┌──────┐              │
//!  ├─────────│ Goal │ │ Miss │──────────────┤
//!  │         └──┬───┘ └──────┘              │
//!  └────────────┼───────────────────────────┘
//!               │ end_match (from Goal, Miss or Timeout)
//!               ▼
//!         ┌──────────┐
//!         │ MatchEnd │
//!         └──────────┘
//! ```
//!
//! `MatchEnd` accepts no events. Starting a new match replaces the whole
//! state rather than transitioning out of it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the match is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPhase {
    /// Spelling words, clock running
    #[default]
    Playing,
    /// Shot is in the air
    Shot,
    /// Shot went in
    Goal,
    /// Shot was saved or went wide
    Miss,
    /// Clock ran out before the shot
    Timeout,
    /// All possessions played
    MatchEnd,
}

impl MatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Shot => "shot",
            Self::Goal => "goal",
            Self::Miss => "miss",
            Self::Timeout => "timeout",
            Self::MatchEnd => "matchEnd",
        }
    }

    /// Check if the player can act (letters, submits, passes).
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Check if the possession is over and waiting to advance.
    pub fn is_possession_over(&self) -> bool {
        matches!(self, Self::Goal | Self::Miss | Self::Timeout)
    }

    /// Check if the match is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::MatchEnd)
    }

    /// Apply an event, returning the new phase or an error.
    pub fn apply(self, event: PhaseEvent) -> Result<Self, InvalidTransition> {
        use MatchPhase::*;
        use PhaseEvent::*;

        let invalid = |reason: &'static str| InvalidTransition {
            from: self,
            event,
            reason,
        };

        match (self, event) {
            // Shoot: Playing -> Shot
            (Playing, Shoot) => Ok(Shot),
            (_, Shoot) => Err(invalid("Can only shoot while playing")),

            // Expire: Playing -> Timeout
            (Playing, Expire) => Ok(Timeout),
            (_, Expire) => Err(invalid("Clock only runs while playing")),

            // Score / Miss: Shot -> Goal / Miss
            (Shot, Score) => Ok(Goal),
            (Shot, MissShot) => Ok(Miss),
            (_, Score) | (_, MissShot) => Err(invalid("No shot in progress")),

            // NextPossession / EndMatch: Goal | Miss | Timeout -> Playing / MatchEnd
            (Goal | Miss | Timeout, NextPossession) => Ok(Playing),
            (Goal | Miss | Timeout, EndMatch) => Ok(MatchEnd),
            (MatchEnd, _) => Err(invalid("Match is over")),
            (_, NextPossession) | (_, EndMatch) => Err(invalid("Possession still in play")),
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Shoot,
    Expire,
    Score,
    MissShot,
    NextPossession,
    EndMatch,
}

/// Error when a phase transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: MatchPhase,
    pub event: PhaseEvent,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} via {:?}: {}",
            self.from, self.event, self.reason
        )
    }
}

impl std::error::Error for InvalidTransition {}
