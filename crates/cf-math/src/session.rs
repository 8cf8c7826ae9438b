//! Free spin session
//!
//! Carries the accumulated multiplier from one free spin to the next and
//! tracks remaining spins across retriggers. The multiplier lives here, not
//! in the resolver, and is dropped when the session finishes.

use serde::{Deserialize, Serialize};

use crate::tumble::{SpinOutcome, SpinRequest};

// ═══════════════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════════════

/// A running free spin session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinSession {
    /// Bet carried over from the triggering spin
    pub bet: f64,
    /// Spins awarded so far, retriggers included
    pub total_spins: u32,
    /// Spins left to play
    pub remaining_spins: u32,
    /// Spins already played
    pub played_spins: u32,
    /// Multiplier carried into the next spin (0 = none yet)
    pub accumulated_multiplier: u32,
    /// Sum of free spin wins
    pub total_win: f64,
    /// Retriggers so far
    pub retriggers: u32,
}

/// What a finished session paid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinSummary {
    pub spins_played: u32,
    pub total_win: f64,
    pub final_multiplier: u32,
    pub retriggers: u32,
}

impl FreeSpinSession {
    /// Start a session from a base-game award
    pub fn start(spins: u32, bet: f64) -> Self {
        log::info!("Free spins started: {} spins at bet {}", spins, bet);
        Self {
            bet,
            total_spins: spins,
            remaining_spins: spins,
            played_spins: 0,
            accumulated_multiplier: 0,
            total_win: 0.0,
            retriggers: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_spins == 0
    }

    /// Request for the next free spin, `None` once finished
    pub fn next_request(&self) -> Option<SpinRequest> {
        if self.is_finished() {
            None
        } else {
            Some(SpinRequest::free_spin(self.bet, self.accumulated_multiplier))
        }
    }

    /// Fold a free spin outcome into the session
    pub fn record(&mut self, outcome: &SpinOutcome) {
        self.remaining_spins = self.remaining_spins.saturating_sub(1);
        self.played_spins += 1;
        self.total_win += outcome.total_win;
        self.accumulated_multiplier = outcome.final_multiplier;

        if let Some(award) = outcome.free_spins {
            self.remaining_spins += award.spins;
            self.total_spins += award.spins;
            self.retriggers += 1;
            log::info!(
                "Free spins retriggered: +{} ({} scatters), {} remaining",
                award.spins,
                award.scatter_count,
                self.remaining_spins
            );
        }
    }

    /// Close the session; the multiplier does not survive it
    pub fn finish(self) -> FreeSpinSummary {
        log::info!(
            "Free spins finished: {} played, win {:.2}, multiplier x{}",
            self.played_spins,
            self.total_win,
            self.accumulated_multiplier
        );
        FreeSpinSummary {
            spins_played: self.played_spins,
            total_win: self.total_win,
            final_multiplier: self.accumulated_multiplier,
            retriggers: self.retriggers,
        }
    }
}
