//! Cluster Slot Engine — stateful game loop around the tumble resolver

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::draw::WeightedDraw;
use crate::error::{MathError, MathResult};
use crate::grid::Grid;
use crate::playback::{TimedEvent, TimingConfig, TimingProfile, build_timeline};
use crate::session::{FreeSpinSession, FreeSpinSummary};
use crate::tumble::{SpinOutcome, SpinRequest, TumbleResolver};

/// Cluster Slot Engine
///
/// Owns the config, a seeded draw and any running free spin session. Each
/// call to [`spin`](Self::spin) plays the next spin: a free spin while a
/// session is active, a paid base spin otherwise.
pub struct ClusterSlotEngine {
    /// Resolver (holds the validated config)
    resolver: TumbleResolver,
    /// Symbol draw
    draw: WeightedDraw<ChaCha8Rng>,
    /// Timing configuration
    timing_config: TimingConfig,
    /// Session statistics
    stats: SessionStats,
    /// Free spin session
    free_spins: Option<FreeSpinSession>,
    /// Summary of the most recently finished session
    last_summary: Option<FreeSpinSummary>,
    /// Current bet
    current_bet: f64,
    /// Ante wager on
    ante: bool,
}

/// Session statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub base_spins: u64,
    pub free_spins_played: u64,
    pub total_staked: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    pub features_triggered: u64,
    pub retriggers: u64,
    pub total_tumbles: u64,
    pub longest_tumble_chain: u32,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Return to player in percent
    pub fn rtp(&self) -> f64 {
        if self.total_staked > 0.0 {
            (self.total_win / self.total_staked) * 100.0
        } else {
            0.0
        }
    }

    /// Winning spins in percent
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn avg_tumbles(&self) -> f64 {
        if self.total_spins > 0 {
            self.total_tumbles as f64 / self.total_spins as f64
        } else {
            0.0
        }
    }
}

/// A base spin followed by every free spin it led to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Spins in play order
    pub spins: Vec<SpinOutcome>,
    /// Amount charged for the round
    pub stake: f64,
    /// Sum of all spin wins
    pub total_win: f64,
    /// Set when a free spin session ended inside this round
    pub free_spins: Option<FreeSpinSummary>,
}

impl RoundResult {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Round win over the bet of its first spin
    pub fn win_ratio(&self) -> f64 {
        match self.spins.first() {
            Some(first) if first.bet > 0.0 => self.total_win / first.bet,
            _ => 0.0,
        }
    }

    pub fn tumble_count(&self) -> usize {
        self.spins.iter().map(SpinOutcome::tumble_count).sum()
    }
}

impl ClusterSlotEngine {
    /// Create with the standard game
    pub fn new() -> MathResult<Self> {
        Self::with_config(GameConfig::default())
    }

    /// Create with specific config, seeded from the OS
    pub fn with_config(config: GameConfig) -> MathResult<Self> {
        let draw = WeightedDraw::from_os_rng(&config)?;
        Self::build(config, draw)
    }

    /// Create with specific config and a fixed seed
    pub fn with_seed(config: GameConfig, seed: u64) -> MathResult<Self> {
        let draw = WeightedDraw::seeded(&config, seed)?;
        Self::build(config, draw)
    }

    fn build(config: GameConfig, draw: WeightedDraw<ChaCha8Rng>) -> MathResult<Self> {
        let current_bet = config.default_bet;
        let resolver = TumbleResolver::new(config)?;
        Ok(Self {
            resolver,
            draw,
            timing_config: TimingConfig::normal(),
            stats: SessionStats::default(),
            free_spins: None,
            last_summary: None,
            current_bet,
            ante: false,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Set bet amount for subsequent base spins
    pub fn set_bet(&mut self, bet: f64) -> MathResult<()> {
        if bet <= 0.0 || !self.config().is_bet_level(bet) {
            return Err(MathError::InvalidBet(bet));
        }
        self.current_bet = bet;
        Ok(())
    }

    pub fn bet(&self) -> f64 {
        self.current_bet
    }

    /// Toggle the ante wager for subsequent base spins
    pub fn set_ante(&mut self, ante: bool) {
        self.ante = ante;
    }

    pub fn ante(&self) -> bool {
        self.ante
    }

    /// Amount the next base spin will cost
    pub fn stake(&self) -> f64 {
        self.config().stake(self.current_bet, self.ante)
    }

    /// Set timing profile
    pub fn set_timing(&mut self, profile: TimingProfile) {
        self.timing_config = TimingConfig::from_profile(profile);
    }

    pub fn timing_config(&self) -> &TimingConfig {
        &self.timing_config
    }

    pub fn config(&self) -> &GameConfig {
        self.resolver.config()
    }

    pub fn resolver(&self) -> &TumbleResolver {
        &self.resolver
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        *self.draw.rng_mut() = ChaCha8Rng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play the next spin
    pub fn spin(&mut self) -> MathResult<SpinOutcome> {
        self.spin_internal(None)
    }

    /// Play the next spin on a given landing grid instead of a drawn one.
    ///
    /// Refills still come from the engine's draw.
    pub fn spin_with_grid(&mut self, grid: Grid) -> MathResult<SpinOutcome> {
        self.spin_internal(Some(grid))
    }

    /// Play a base spin and every free spin it triggers.
    ///
    /// When called mid-session the round is the rest of that session.
    pub fn play_round(&mut self) -> MathResult<RoundResult> {
        let stake = if self.in_free_spins() { 0.0 } else { self.stake() };
        let mut spins = vec![self.spin()?];
        while self.in_free_spins() {
            spins.push(self.spin()?);
        }
        let total_win = spins.iter().map(|s| s.total_win).sum();
        Ok(RoundResult {
            spins,
            stake,
            total_win,
            free_spins: self.last_summary.take(),
        })
    }

    fn spin_internal(&mut self, forced: Option<Grid>) -> MathResult<SpinOutcome> {
        let (request, stake) = match self.free_spins.as_ref().and_then(FreeSpinSession::next_request) {
            Some(request) => (request, 0.0),
            None => (
                SpinRequest::base(self.current_bet).with_ante(self.ante),
                self.stake(),
            ),
        };

        let outcome = match forced {
            Some(grid) => self.resolver.resolve(grid, &request, &mut self.draw)?,
            None => self.resolver.spin(&request, &mut self.draw)?,
        };

        self.update_stats(&outcome, stake);

        if let Some(session) = self.free_spins.as_mut() {
            session.record(&outcome);
            if session.is_finished() {
                self.last_summary = self.free_spins.take().map(FreeSpinSession::finish);
            }
        } else if let Some(award) = outcome.free_spins {
            self.free_spins = Some(FreeSpinSession::start(award.spins, request.bet));
        }

        Ok(outcome)
    }

    fn update_stats(&mut self, outcome: &SpinOutcome, stake: f64) {
        let stats = &mut self.stats;
        stats.total_spins += 1;
        if outcome.is_free_spin {
            stats.free_spins_played += 1;
        } else {
            stats.base_spins += 1;
        }
        stats.total_staked += stake;
        stats.total_win += outcome.total_win;

        if outcome.is_win() {
            stats.wins += 1;
        } else {
            stats.losses += 1;
        }

        match outcome.free_spins {
            Some(award) if award.retrigger => stats.retriggers += 1,
            Some(_) => stats.features_triggered += 1,
            None => {}
        }

        let tumbles = outcome.tumble_count() as u32;
        stats.total_tumbles += tumbles as u64;
        stats.longest_tumble_chain = stats.longest_tumble_chain.max(tumbles);

        let ratio = outcome.win_ratio();
        if ratio > stats.max_win_ratio {
            stats.max_win_ratio = ratio;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PLAYBACK
    // ═══════════════════════════════════════════════════════════════════════════

    /// Timeline for an outcome under the current timing profile
    pub fn timeline(&self, outcome: &SpinOutcome) -> Vec<TimedEvent> {
        build_timeline(outcome, &self.timing_config)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FREE SPIN STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn in_free_spins(&self) -> bool {
        self.free_spins.is_some()
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.free_spins
            .as_ref()
            .map(|fs| fs.remaining_spins)
            .unwrap_or(0)
    }

    /// Multiplier carried into the next free spin
    pub fn free_spin_multiplier(&self) -> u32 {
        self.free_spins
            .as_ref()
            .map(|fs| fs.accumulated_multiplier)
            .unwrap_or(0)
    }

    pub fn free_spins_total_win(&self) -> f64 {
        self.free_spins
            .as_ref()
            .map(|fs| fs.total_win)
            .unwrap_or(0.0)
    }

    pub fn free_spin_session(&self) -> Option<&FreeSpinSession> {
        self.free_spins.as_ref()
    }

    /// Summary of the last finished session, cleared on read
    pub fn take_free_spin_summary(&mut self) -> Option<FreeSpinSummary> {
        self.last_summary.take()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Export config as JSON
    pub fn export_config(&self) -> MathResult<String> {
        self.config().to_json()
    }

    /// Replace the config from JSON; the RNG stream continues
    pub fn import_config(&mut self, json: &str) -> MathResult<()> {
        let config = GameConfig::from_json(json)?;
        let draw = WeightedDraw::new(&config, self.draw.rng_mut().clone())?;
        let resolver = TumbleResolver::new(config)?;

        if let Some(session) = self.free_spins.take() {
            log::warn!(
                "Config replaced during free spins; dropping {} remaining spins",
                session.remaining_spins
            );
        }
        if !resolver.config().is_bet_level(self.current_bet) {
            log::warn!(
                "Bet {} is not offered by the imported config; using {}",
                self.current_bet,
                resolver.config().default_bet
            );
            self.current_bet = resolver.config().default_bet;
        }
        self.draw = draw;
        self.resolver = resolver;
        Ok(())
    }
}
