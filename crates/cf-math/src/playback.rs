//! Presentation timeline for resolved spins
//!
//! The resolver hands back every tumble at once. This module turns that
//! outcome into time-stamped events which a display layer drains at its own
//! pace through [`Playback::advance`]. Nothing here sleeps or spawns.

use serde::{Deserialize, Serialize};

use crate::tumble::SpinOutcome;

// ═══════════════════════════════════════════════════════════════════════════════
// TIMING
// ═══════════════════════════════════════════════════════════════════════════════

/// Timing profile for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Quick spin
    Turbo,
    /// Everything at t = 0 (tests, simulation, skip)
    Instant,
    /// Scaled from another profile
    Custom,
}

/// Durations used to space out playback events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub profile: TimingProfile,

    /// Initial grid drop (ms)
    pub grid_land_ms: f64,

    /// Pause before each tumble is revealed (ms)
    pub win_reveal_delay_ms: f64,

    /// Highlight per winning cluster (ms)
    pub cluster_highlight_ms: f64,

    /// Multiplier symbol activation (ms)
    pub multiplier_ms: f64,

    /// Winning symbols popping (ms)
    pub remove_ms: f64,

    /// New symbols dropping in (ms)
    pub refill_ms: f64,

    /// Rollup speed (credits per second, 0 = no rollup)
    pub rollup_speed: f64,

    /// Free spins award banner (ms)
    pub feature_award_ms: f64,

    /// Minimum time between events (ms)
    pub min_event_interval_ms: f64,
}

impl TimingConfig {
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            grid_land_ms: 900.0,
            win_reveal_delay_ms: 250.0,
            cluster_highlight_ms: 400.0,
            multiplier_ms: 700.0,
            remove_ms: 350.0,
            refill_ms: 450.0,
            rollup_speed: 50.0,
            feature_award_ms: 2000.0,
            min_event_interval_ms: 50.0,
        }
    }

    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            grid_land_ms: 350.0,
            win_reveal_delay_ms: 100.0,
            cluster_highlight_ms: 150.0,
            multiplier_ms: 300.0,
            remove_ms: 150.0,
            refill_ms: 200.0,
            rollup_speed: 200.0,
            feature_award_ms: 1000.0,
            min_event_interval_ms: 25.0,
        }
    }

    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            grid_land_ms: 0.0,
            win_reveal_delay_ms: 0.0,
            cluster_highlight_ms: 0.0,
            multiplier_ms: 0.0,
            remove_ms: 0.0,
            refill_ms: 0.0,
            rollup_speed: 0.0,
            feature_award_ms: 0.0,
            min_event_interval_ms: 0.0,
        }
    }

    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal | TimingProfile::Custom => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
        }
    }

    /// Scale every duration by `factor` (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            grid_land_ms: self.grid_land_ms * factor,
            win_reveal_delay_ms: self.win_reveal_delay_ms * factor,
            cluster_highlight_ms: self.cluster_highlight_ms * factor,
            multiplier_ms: self.multiplier_ms * factor,
            remove_ms: self.remove_ms * factor,
            refill_ms: self.refill_ms * factor,
            rollup_speed: if factor > 0.0 {
                self.rollup_speed / factor
            } else {
                0.0
            },
            feature_award_ms: self.feature_award_ms * factor,
            min_event_interval_ms: self.min_event_interval_ms * factor,
        }
    }

    /// Rollup duration for a win amount
    pub fn rollup_duration(&self, amount: f64) -> f64 {
        if self.rollup_speed <= 0.0 || amount <= 0.0 {
            return 0.0;
        }
        (amount / self.rollup_speed * 1000.0).clamp(300.0, 5000.0)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// Monotonic clock for laying out events
#[derive(Debug, Clone)]
pub struct TimestampGenerator {
    current_ms: f64,
    config: TimingConfig,
}

impl TimestampGenerator {
    pub fn new(config: TimingConfig) -> Self {
        Self {
            current_ms: 0.0,
            config,
        }
    }

    pub fn current(&self) -> f64 {
        self.current_ms
    }

    /// Advance by duration and return the new timestamp
    pub fn advance(&mut self, duration_ms: f64) -> f64 {
        self.current_ms += duration_ms.max(self.config.min_event_interval_ms);
        self.current_ms
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Something the display layer should show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    SpinStart {
        bet: f64,
        is_free_spin: bool,
    },
    GridLanded {
        scatter_count: usize,
    },
    TumbleStart {
        tumble: u32,
    },
    ClusterWin {
        tumble: u32,
        symbol_id: u32,
        size: usize,
        payout: f64,
    },
    MultiplierApplied {
        tumble: u32,
        factor: u32,
    },
    WinUpdate {
        tumble: u32,
        win: f64,
        running_total: f64,
    },
    SymbolsRemoved {
        tumble: u32,
        count: usize,
    },
    SymbolsRefilled {
        tumble: u32,
        count: usize,
    },
    FreeSpinsAwarded {
        spins: u32,
        retrigger: bool,
    },
    SpinEnd {
        total_win: f64,
    },
}

/// Event with its start time relative to spin start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: f64,
    pub event: PlaybackEvent,
}

/// Lay out a resolved spin as a timeline.
///
/// Times are non-decreasing; the first event is `SpinStart` at 0 and the last
/// is `SpinEnd`.
pub fn build_timeline(outcome: &SpinOutcome, timing: &TimingConfig) -> Vec<TimedEvent> {
    let mut clock = TimestampGenerator::new(timing.clone());
    let mut events = Vec::with_capacity(3 + outcome.tumbles.len() * 6);

    let mut push = |at_ms: f64, event: PlaybackEvent| events.push(TimedEvent { at_ms, event });

    push(
        0.0,
        PlaybackEvent::SpinStart {
            bet: outcome.bet,
            is_free_spin: outcome.is_free_spin,
        },
    );
    push(
        clock.advance(timing.grid_land_ms),
        PlaybackEvent::GridLanded {
            scatter_count: outcome.scatter_count,
        },
    );

    let mut running_total = 0.0;
    for step in &outcome.tumbles {
        let tumble = step.index;
        push(
            clock.advance(timing.win_reveal_delay_ms),
            PlaybackEvent::TumbleStart { tumble },
        );
        for cluster in &step.clusters {
            push(
                clock.advance(timing.cluster_highlight_ms),
                PlaybackEvent::ClusterWin {
                    tumble,
                    symbol_id: cluster.symbol_id,
                    size: cluster.size(),
                    payout: cluster.payout,
                },
            );
        }
        if step.applied_multiplier > 1 {
            push(
                clock.advance(timing.multiplier_ms),
                PlaybackEvent::MultiplierApplied {
                    tumble,
                    factor: step.applied_multiplier,
                },
            );
        }
        running_total += step.win;
        push(
            clock.advance(timing.rollup_duration(step.win)),
            PlaybackEvent::WinUpdate {
                tumble,
                win: step.win,
                running_total,
            },
        );
        push(
            clock.advance(timing.remove_ms),
            PlaybackEvent::SymbolsRemoved {
                tumble,
                count: step.removed.len(),
            },
        );
        push(
            clock.advance(timing.refill_ms),
            PlaybackEvent::SymbolsRefilled {
                tumble,
                count: step.refills.len(),
            },
        );
    }

    if let Some(award) = outcome.free_spins {
        push(
            clock.advance(timing.feature_award_ms),
            PlaybackEvent::FreeSpinsAwarded {
                spins: award.spins,
                retrigger: award.retrigger,
            },
        );
    }

    push(
        clock.advance(0.0),
        PlaybackEvent::SpinEnd {
            total_win: outcome.total_win,
        },
    );

    events
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLAYBACK
// ═══════════════════════════════════════════════════════════════════════════════

/// Caller-driven cursor over a timeline
#[derive(Debug, Clone)]
pub struct Playback {
    events: Vec<TimedEvent>,
    cursor: usize,
    elapsed_ms: f64,
}

impl Playback {
    pub fn new(events: Vec<TimedEvent>) -> Self {
        Self {
            events,
            cursor: 0,
            elapsed_ms: 0.0,
        }
    }

    pub fn from_outcome(outcome: &SpinOutcome, timing: &TimingConfig) -> Self {
        Self::new(build_timeline(outcome, timing))
    }

    /// Move the clock forward and return every event that became due
    pub fn advance(&mut self, delta_ms: f64) -> &[TimedEvent] {
        self.elapsed_ms += delta_ms.max(0.0);
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].at_ms <= self.elapsed_ms
        {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }

    /// Release everything still pending
    pub fn skip_to_end(&mut self) -> &[TimedEvent] {
        let start = self.cursor;
        self.cursor = self.events.len();
        self.elapsed_ms = self.elapsed_ms.max(self.duration_ms());
        &self.events[start..]
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Time of the last event
    pub fn duration_ms(&self) -> f64 {
        self.events.last().map(|e| e.at_ms).unwrap_or(0.0)
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }
}
