//! Tumble / cascade resolver
//!
//! ```text
//! DETECT ──(no clusters)──► STOP
//!   │
//!   └─(clusters)──► RESOLVE ──► REFILL ──► DETECT
//! ```
//!
//! The resolver is stateless: the free spin multiplier comes in with the
//! request and goes out as `SpinOutcome::final_multiplier`. Every step is
//! computed eagerly; pacing the steps on screen is the caller's business.

use serde::{Deserialize, Serialize};

use crate::cluster::{Cluster, ClusterDetector};
use crate::config::{GameConfig, RefillMode};
use crate::draw::SymbolSource;
use crate::error::{MathError, MathResult};
use crate::grid::{Grid, Position};

/// Inputs to one spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinRequest {
    /// Bet amount
    pub bet: f64,
    /// Spin belongs to a free spin session
    pub is_free_spin: bool,
    /// Session multiplier carried in from the previous free spin (0 = none)
    pub accumulated_multiplier: u32,
    /// Ante wager active
    pub ante: bool,
}

impl SpinRequest {
    /// Base-game spin
    pub fn base(bet: f64) -> Self {
        Self {
            bet,
            is_free_spin: false,
            accumulated_multiplier: 0,
            ante: false,
        }
    }

    /// Free spin carrying the session multiplier
    pub fn free_spin(bet: f64, accumulated_multiplier: u32) -> Self {
        Self {
            bet,
            is_free_spin: true,
            accumulated_multiplier,
            ante: false,
        }
    }

    pub fn with_ante(mut self, ante: bool) -> Self {
        self.ante = ante;
        self
    }
}

/// A paid cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterWin {
    pub symbol_id: u32,
    pub positions: Vec<Position>,
    /// Bet × tier multiplier, before any multiplier symbols
    pub payout: f64,
}

impl ClusterWin {
    pub fn size(&self) -> usize {
        self.positions.len()
    }
}

/// A multiplier symbol on the grid during a tumble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierHit {
    pub position: Position,
    pub value: u32,
}

/// A symbol dropped into a vacated cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refill {
    pub position: Position,
    pub symbol_id: u32,
    /// Value when the new symbol is a multiplier
    pub multiplier_value: Option<u32>,
}

/// One DETECT → RESOLVE → REFILL iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TumbleStep {
    /// 0-based tumble index within the spin
    pub index: u32,
    /// Clusters paid this tumble
    pub clusters: Vec<ClusterWin>,
    /// Multiplier cells present this tumble
    pub multipliers: Vec<MultiplierHit>,
    /// Sum of this tumble's multiplier values
    pub multiplier_sum: u32,
    /// Factor applied to the base win (1 when no multiplier applies)
    pub applied_multiplier: u32,
    /// Sum of cluster payouts
    pub base_win: f64,
    /// Win attributed to this tumble
    pub win: f64,
    /// Vacated cells, sorted (reel, row)
    pub removed: Vec<Position>,
    /// New symbols in the order they were drawn
    pub refills: Vec<Refill>,
}

/// Free spins awarded by a spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSpinAward {
    /// Scatters counted for the award
    pub scatter_count: usize,
    /// Spins awarded
    pub spins: u32,
    /// Awarded inside a running session
    pub retrigger: bool,
}

/// Complete result of one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// Grid as it landed
    pub initial_grid: Grid,
    /// Tumbles in order; empty for a losing spin
    pub tumbles: Vec<TumbleStep>,
    /// Grid after the last refill
    pub final_grid: Grid,
    /// Bet amount
    pub bet: f64,
    /// Sum of tumble wins
    pub total_win: f64,
    /// Spin was part of a free spin session
    pub is_free_spin: bool,
    /// Ante was active
    pub ante: bool,
    /// Scatters on the initial grid
    pub scatter_count: usize,
    /// Free spins triggered or retriggered
    pub free_spins: Option<FreeSpinAward>,
    /// Session multiplier after this spin (unchanged in the base game)
    pub final_multiplier: u32,
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    pub fn free_spins_triggered(&self) -> bool {
        self.free_spins.is_some()
    }

    pub fn free_spins_awarded(&self) -> u32 {
        self.free_spins.map(|a| a.spins).unwrap_or(0)
    }

    pub fn tumble_count(&self) -> usize {
        self.tumbles.len()
    }

    /// Win-to-bet ratio
    pub fn win_ratio(&self) -> f64 {
        if self.bet > 0.0 {
            self.total_win / self.bet
        } else {
            0.0
        }
    }
}

/// Cluster/tumble resolver for one validated game config
#[derive(Debug, Clone)]
pub struct TumbleResolver {
    config: GameConfig,
    detector: ClusterDetector,
    scatter_id: u32,
    multiplier_id: u32,
}

impl TumbleResolver {
    /// Validate the config and build a resolver
    pub fn new(config: GameConfig) -> MathResult<Self> {
        config.validate()?;
        let scatter_id = config
            .symbols
            .scatter_id()
            .ok_or_else(|| MathError::InvalidSymbolSet("no scatter symbol".into()))?;
        let multiplier_id = config
            .symbols
            .multiplier_id()
            .ok_or_else(|| MathError::InvalidSymbolSet("no multiplier symbol".into()))?;

        Ok(Self {
            detector: ClusterDetector::new(config.tumble.min_cluster_size),
            config,
            scatter_id,
            multiplier_id,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn detector(&self) -> &ClusterDetector {
        &self.detector
    }

    /// Draw a fresh grid from `source` and resolve it
    pub fn spin<S>(&self, request: &SpinRequest, source: &mut S) -> MathResult<SpinOutcome>
    where
        S: SymbolSource + ?Sized,
    {
        check_bet(request.bet)?;
        let grid = source.draw_grid(self.config.grid, request.ante, self.multiplier_id);
        self.resolve(grid, request, source)
    }

    /// Resolve a landed grid into its full tumble sequence.
    ///
    /// Multiplier cells without a value get one drawn before the first
    /// detection.
    pub fn resolve<S>(
        &self,
        initial_grid: Grid,
        request: &SpinRequest,
        source: &mut S,
    ) -> MathResult<SpinOutcome>
    where
        S: SymbolSource + ?Sized,
    {
        check_bet(request.bet)?;
        initial_grid.check_spec(&self.config.grid)?;

        let mut initial_grid = initial_grid;
        self.land(&mut initial_grid, source)?;

        let scatter_count = initial_grid.count(self.scatter_id);
        let mut grid = initial_grid.clone();
        let mut accumulated = request.accumulated_multiplier;
        let mut tumbles: Vec<TumbleStep> = Vec::new();
        let max_tumbles = self.config.tumble.max_tumbles;

        loop {
            let clusters = self.detector.detect(&grid, &self.config.symbols);
            if clusters.is_empty() {
                break;
            }
            if tumbles.len() as u32 >= max_tumbles {
                log::error!(
                    "Spin aborted: tumble limit {} exceeded (bet {}, free spin {})",
                    max_tumbles,
                    request.bet,
                    request.is_free_spin
                );
                return Err(MathError::TumbleLimitExceeded { limit: max_tumbles });
            }

            let wins = self.pay_clusters(clusters, request.bet);
            let base_win: f64 = wins.iter().map(|w| w.payout).sum();

            let multipliers: Vec<MultiplierHit> = grid
                .positions_of(self.multiplier_id)
                .into_iter()
                .map(|position| MultiplierHit {
                    position,
                    value: grid.multiplier_value(position).unwrap_or(0),
                })
                .collect();
            let multiplier_sum = multipliers
                .iter()
                .try_fold(0, |sum, m| add_multiplier(sum, m.value))?;

            // Free spins accumulate across tumbles and spins; the base game
            // only uses what is on the grid right now.
            let factor = if request.is_free_spin {
                accumulated = add_multiplier(accumulated, multiplier_sum)?;
                accumulated
            } else {
                multiplier_sum
            };
            let applied_multiplier = factor.max(1);
            let win = base_win * applied_multiplier as f64;

            let mut removed: Vec<Position> = wins
                .iter()
                .flat_map(|w| w.positions.iter().copied())
                .collect();
            removed.sort_unstable();
            removed.dedup();

            let refills = self.refill(&mut grid, &removed, request.ante, source);

            log::debug!(
                "Tumble {}: {} clusters, {} cells, base {:.2} x{} = {:.2}",
                tumbles.len(),
                wins.len(),
                removed.len(),
                base_win,
                applied_multiplier,
                win
            );

            tumbles.push(TumbleStep {
                index: tumbles.len() as u32,
                clusters: wins,
                multipliers,
                multiplier_sum,
                applied_multiplier,
                base_win,
                win,
                removed,
                refills,
            });
        }

        let total_win: f64 = tumbles.iter().map(|t| t.win).sum();

        let free_spins = if request.is_free_spin {
            let count = grid.count(self.scatter_id);
            self.config
                .free_spins
                .retrigger_award(count)
                .map(|spins| FreeSpinAward {
                    scatter_count: count,
                    spins,
                    retrigger: true,
                })
        } else {
            self.config
                .free_spins
                .base_award(scatter_count)
                .map(|spins| FreeSpinAward {
                    scatter_count,
                    spins,
                    retrigger: false,
                })
        };

        Ok(SpinOutcome {
            initial_grid,
            tumbles,
            final_grid: grid,
            bet: request.bet,
            total_win,
            is_free_spin: request.is_free_spin,
            ante: request.ante,
            scatter_count,
            free_spins,
            final_multiplier: if request.is_free_spin {
                accumulated
            } else {
                request.accumulated_multiplier
            },
        })
    }

    /// Reject unknown ids and give unvalued multipliers a value
    fn land<S>(&self, grid: &mut Grid, source: &mut S) -> MathResult<()>
    where
        S: SymbolSource + ?Sized,
    {
        let positions: Vec<Position> = grid.positions().collect();
        for pos in positions {
            let symbol_id = grid.get(pos).unwrap_or(0);
            if !self.config.symbols.contains(symbol_id) {
                return Err(MathError::UnknownSymbol {
                    symbol_id,
                    col: pos.0,
                    row: pos.1,
                });
            }
            if symbol_id == self.multiplier_id && grid.multiplier_value(pos).is_none() {
                let value = source.next_multiplier_value();
                grid.set_multiplier_value(pos, value);
            }
        }
        Ok(())
    }

    fn pay_clusters(&self, clusters: Vec<Cluster>, bet: f64) -> Vec<ClusterWin> {
        clusters
            .into_iter()
            .map(|cluster| {
                let payout = self
                    .config
                    .pay_table
                    .payout(cluster.symbol_id, cluster.size(), bet);
                ClusterWin {
                    symbol_id: cluster.symbol_id,
                    positions: cluster.positions,
                    payout,
                }
            })
            .collect()
    }

    /// Fill vacated cells; `removed` must be sorted
    fn refill<S>(
        &self,
        grid: &mut Grid,
        removed: &[Position],
        ante: bool,
        source: &mut S,
    ) -> Vec<Refill>
    where
        S: SymbolSource + ?Sized,
    {
        match self.config.tumble.refill {
            RefillMode::InPlace => removed
                .iter()
                .map(|&pos| self.drop_new(grid, pos, ante, source))
                .collect(),
            RefillMode::Gravity => {
                let mut refills = Vec::with_capacity(removed.len());
                for col in 0..grid.columns() {
                    let vacated = removed.iter().filter(|&&(c, _)| c == col).count();
                    if vacated == 0 {
                        continue;
                    }

                    let survivors: Vec<(u32, Option<u32>)> = (0..grid.rows())
                        .filter(|&row| removed.binary_search(&(col, row)).is_err())
                        .map(|row| {
                            (
                                grid.get((col, row)).unwrap_or(0),
                                grid.multiplier_value((col, row)),
                            )
                        })
                        .collect();

                    for (offset, (symbol_id, value)) in survivors.into_iter().enumerate() {
                        let pos = (col, (vacated + offset) as u8);
                        grid.set(pos, symbol_id);
                        if let Some(value) = value {
                            grid.set_multiplier_value(pos, value);
                        }
                    }
                    for row in 0..vacated as u8 {
                        refills.push(self.drop_new(grid, (col, row), ante, source));
                    }
                }
                refills
            }
        }
    }

    fn drop_new<S>(&self, grid: &mut Grid, pos: Position, ante: bool, source: &mut S) -> Refill
    where
        S: SymbolSource + ?Sized,
    {
        let symbol_id = source.next_symbol(ante);
        grid.set(pos, symbol_id);
        let multiplier_value = if symbol_id == self.multiplier_id {
            let value = source.next_multiplier_value();
            grid.set_multiplier_value(pos, value);
            Some(value)
        } else {
            None
        };
        Refill {
            position: pos,
            symbol_id,
            multiplier_value,
        }
    }
}

fn add_multiplier(accumulated: u32, added: u32) -> MathResult<u32> {
    accumulated
        .checked_add(added)
        .ok_or(MathError::MultiplierOverflow { accumulated, added })
}

fn check_bet(bet: f64) -> MathResult<()> {
    if bet.is_finite() && bet > 0.0 {
        Ok(())
    } else {
        Err(MathError::InvalidBet(bet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;
    use crate::draw::ScriptedDraw;
    use crate::symbols::{MULTIPLIER_ID, SCATTER_ID};

    fn resolver() -> TumbleResolver {
        TumbleResolver::new(GameConfig::default()).unwrap()
    }

    /// Grid with no two equal neighbours (symbols 1..=6)
    fn dead_grid() -> Grid {
        let mut grid = Grid::filled(GridSpec::standard_6x5(), 1);
        for (col, row) in grid.positions().collect::<Vec<_>>() {
            grid.set((col, row), 1 + ((col + row) % 2) as u32 + (col as u32 % 3) * 2);
        }
        grid
    }

    /// Refills that alternate between two symbols never rebuild a cluster
    fn dull_source() -> ScriptedDraw {
        ScriptedDraw::new(vec![7, 8, 9]).unwrap()
    }

    #[test]
    fn test_losing_grid_has_no_tumbles() {
        let outcome = resolver()
            .resolve(dead_grid(), &SpinRequest::base(1.0), &mut dull_source())
            .unwrap();
        assert!(outcome.tumbles.is_empty());
        assert_eq!(outcome.total_win, 0.0);
        assert!(!outcome.is_win());
        assert_eq!(outcome.final_grid, outcome.initial_grid);
    }

    #[test]
    fn test_full_grid_single_tumble() {
        let grid = Grid::filled(GridSpec::standard_6x5(), 2);
        // 7,8,9 cycling column-major never forms 8 connected equal cells
        let outcome = resolver()
            .resolve(grid, &SpinRequest::base(1.0), &mut dull_source())
            .unwrap();
        assert_eq!(outcome.tumbles.len(), 1);
        let step = &outcome.tumbles[0];
        assert_eq!(step.clusters.len(), 1);
        assert_eq!(step.clusters[0].size(), 30);
        assert_eq!(step.base_win, 20.0);
        assert_eq!(step.applied_multiplier, 1);
        assert_eq!(step.removed.len(), 30);
        assert_eq!(step.refills.len(), 30);
        assert_eq!(outcome.total_win, 20.0);
    }

    #[test]
    fn test_base_game_multiplier_applies_per_tumble() {
        let mut grid = Grid::filled(GridSpec::standard_6x5(), 2);
        grid.set((5, 4), MULTIPLIER_ID);
        grid.set_multiplier_value((5, 4), 3);
        let outcome = resolver()
            .resolve(grid, &SpinRequest::base(1.0), &mut dull_source())
            .unwrap();
        let step = &outcome.tumbles[0];
        assert_eq!(step.clusters[0].size(), 29);
        assert_eq!(step.multiplier_sum, 3);
        assert_eq!(step.applied_multiplier, 3);
        assert_eq!(step.win, 60.0);
        assert_eq!(outcome.final_multiplier, 0);
    }

    #[test]
    fn test_free_spin_multiplier_accumulates() {
        let mut grid = Grid::filled(GridSpec::standard_6x5(), 2);
        grid.set((5, 4), MULTIPLIER_ID);
        grid.set_multiplier_value((5, 4), 3);
        let outcome = resolver()
            .resolve(grid, &SpinRequest::free_spin(1.0, 4), &mut dull_source())
            .unwrap();
        let step = &outcome.tumbles[0];
        assert_eq!(step.applied_multiplier, 7);
        assert_eq!(step.win, 140.0);
        assert_eq!(outcome.final_multiplier, 7);
    }

    #[test]
    fn test_accumulated_multiplier_overflow_is_an_error() {
        let mut grid = Grid::filled(GridSpec::standard_6x5(), 2);
        grid.set((5, 4), MULTIPLIER_ID);
        grid.set_multiplier_value((5, 4), 3);
        let result = resolver().resolve(
            grid,
            &SpinRequest::free_spin(1.0, u32::MAX - 1),
            &mut dull_source(),
        );
        assert!(matches!(
            result,
            Err(MathError::MultiplierOverflow {
                accumulated,
                added: 3,
            }) if accumulated == u32::MAX - 1
        ));
    }

    #[test]
    fn test_multiplier_sum_overflow_is_an_error() {
        let mut grid = Grid::filled(GridSpec::standard_6x5(), 2);
        for pos in [(5, 3), (5, 4)] {
            grid.set(pos, MULTIPLIER_ID);
            grid.set_multiplier_value(pos, 3_000_000_000);
        }
        let result = resolver().resolve(grid, &SpinRequest::base(1.0), &mut dull_source());
        assert!(matches!(
            result,
            Err(MathError::MultiplierOverflow { .. })
        ));
    }

    #[test]
    fn test_free_spin_without_win_keeps_multiplier() {
        let outcome = resolver()
            .resolve(dead_grid(), &SpinRequest::free_spin(1.0, 12), &mut dull_source())
            .unwrap();
        assert_eq!(outcome.final_multiplier, 12);
        assert_eq!(outcome.total_win, 0.0);
    }

    #[test]
    fn test_unvalued_multiplier_gets_drawn_value() {
        let mut grid = dead_grid();
        grid.set((0, 0), MULTIPLIER_ID);
        let mut source = dull_source().with_multiplier_values(vec![25]).unwrap();
        let outcome = resolver()
            .resolve(grid, &SpinRequest::base(1.0), &mut source)
            .unwrap();
        assert_eq!(outcome.initial_grid.multiplier_value((0, 0)), Some(25));
    }

    #[test]
    fn test_four_scatters_trigger_free_spins() {
        let mut grid = dead_grid();
        for col in 0..4 {
            grid.set((col, 0), SCATTER_ID);
        }
        let outcome = resolver()
            .resolve(grid, &SpinRequest::base(1.0), &mut dull_source())
            .unwrap();
        assert_eq!(outcome.scatter_count, 4);
        assert!(outcome.free_spins_triggered());
        assert_eq!(outcome.free_spins_awarded(), 10);
        assert!(outcome.tumbles.is_empty());
    }

    #[test]
    fn test_three_scatters_do_not_trigger() {
        let mut grid = dead_grid();
        for col in 0..3 {
            grid.set((col, 0), SCATTER_ID);
        }
        let outcome = resolver()
            .resolve(grid, &SpinRequest::base(1.0), &mut dull_source())
            .unwrap();
        assert!(!outcome.free_spins_triggered());
    }

    #[test]
    fn test_scatters_from_refills_do_not_trigger_base_game() {
        let grid = Grid::filled(GridSpec::standard_6x5(), 2);
        let mut source = ScriptedDraw::new(vec![SCATTER_ID, 7, 8, 9, 7, 8]).unwrap();
        let outcome = resolver()
            .resolve(grid, &SpinRequest::base(1.0), &mut source)
            .unwrap();
        assert!(outcome.final_grid.count(SCATTER_ID) >= 4);
        assert_eq!(outcome.scatter_count, 0);
        assert!(!outcome.free_spins_triggered());
    }

    #[test]
    fn test_retrigger_checks_settled_grid() {
        let grid = Grid::filled(GridSpec::standard_6x5(), 2);
        let mut source = ScriptedDraw::new(vec![SCATTER_ID, 7, 8, 9, 7, 8]).unwrap();
        let outcome = resolver()
            .resolve(grid, &SpinRequest::free_spin(1.0, 0), &mut source)
            .unwrap();
        let award = outcome.free_spins.unwrap();
        assert!(award.retrigger);
        assert_eq!(award.spins, 5);
        assert_eq!(award.scatter_count, 5);
    }

    #[test]
    fn test_wrong_dimensions_rejected() {
        let grid = Grid::filled(GridSpec::new(5, 5), 1);
        let result = resolver().resolve(grid, &SpinRequest::base(1.0), &mut dull_source());
        assert!(matches!(
            result,
            Err(MathError::GridDimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let mut grid = dead_grid();
        grid.set((3, 2), 404);
        let result = resolver().resolve(grid, &SpinRequest::base(1.0), &mut dull_source());
        assert!(matches!(
            result,
            Err(MathError::UnknownSymbol {
                symbol_id: 404,
                col: 3,
                row: 2
            })
        ));
    }

    #[test]
    fn test_invalid_bet_rejected() {
        let r = resolver();
        for bet in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = r.resolve(dead_grid(), &SpinRequest::base(bet), &mut dull_source());
            assert!(matches!(result, Err(MathError::InvalidBet(_))));
        }
    }

    #[test]
    fn test_tumble_limit_surfaces_error() {
        let mut config = GameConfig::default();
        config.tumble.max_tumbles = 3;
        let r = TumbleResolver::new(config).unwrap();
        // Refilling with the same symbol rebuilds the full cluster forever
        let mut source = ScriptedDraw::new(vec![2]).unwrap();
        let grid = Grid::filled(GridSpec::standard_6x5(), 2);
        let result = r.resolve(grid, &SpinRequest::base(1.0), &mut source);
        assert!(matches!(
            result,
            Err(MathError::TumbleLimitExceeded { limit: 3 })
        ));
    }

    #[test]
    fn test_gravity_refill_drops_survivors() {
        let mut config = GameConfig::default();
        config.tumble.refill = RefillMode::Gravity;
        let r = TumbleResolver::new(config).unwrap();

        // Bottom two rows are symbol 2 (12 cells); top three rows are dead
        let mut grid = dead_grid();
        for col in 0..6 {
            grid.set((col, 3), 2);
            grid.set((col, 4), 2);
        }
        // Break accidental links between row 2 and the symbol-2 band
        for col in 0..6 {
            if grid.get((col, 2)) == Some(2) {
                grid.set((col, 2), 9);
            }
        }
        let before = grid.clone();

        let outcome = r
            .resolve(grid, &SpinRequest::base(1.0), &mut dull_source())
            .unwrap();
        assert_eq!(outcome.tumbles.len(), 1);
        let step = &outcome.tumbles[0];
        assert_eq!(step.removed.len(), 12);
        assert_eq!(step.refills.len(), 12);
        assert!(step.refills.iter().all(|f| f.position.1 < 2));

        // Old rows 0..3 slide down to rows 2..5; new symbols fill rows 0..2
        for col in 0..6 {
            for row in 0..3 {
                assert_eq!(outcome.final_grid.get((col, row + 2)), before.get((col, row)));
            }
        }
        for refill in &step.refills {
            assert_eq!(outcome.final_grid.get(refill.position), Some(refill.symbol_id));
        }
    }

    #[test]
    fn test_gravity_carries_multiplier_values() {
        let mut config = GameConfig::default();
        config.tumble.refill = RefillMode::Gravity;
        let r = TumbleResolver::new(config).unwrap();

        // Column 0: multiplier on top, four 2s below; columns 1.. rows are 2s
        let mut grid = dead_grid();
        grid.set((0, 0), MULTIPLIER_ID);
        grid.set_multiplier_value((0, 0), 10);
        for row in 1..5 {
            grid.set((0, row), 2);
        }
        for row in 0..5 {
            grid.set((1, row), 2);
        }

        let outcome = r
            .resolve(grid, &SpinRequest::base(1.0), &mut dull_source())
            .unwrap();
        let step = &outcome.tumbles[0];
        assert_eq!(step.clusters[0].size(), 9);
        assert_eq!(step.applied_multiplier, 10);
        assert_eq!(outcome.final_grid.get((0, 4)), Some(MULTIPLIER_ID));
        assert_eq!(outcome.final_grid.multiplier_value((0, 4)), Some(10));
    }

    #[test]
    fn test_seeded_spins_are_reproducible() {
        let r = resolver();
        let request = SpinRequest::base(1.0);
        let mut a = crate::draw::WeightedDraw::seeded(r.config(), 2024).unwrap();
        let mut b = crate::draw::WeightedDraw::seeded(r.config(), 2024).unwrap();
        for _ in 0..50 {
            let x = r.spin(&request, &mut a).unwrap();
            let y = r.spin(&request, &mut b).unwrap();
            assert_eq!(x, y);
        }
    }
}
