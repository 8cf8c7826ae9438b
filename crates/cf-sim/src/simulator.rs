//! Parallel batch simulator
//!
//! Rounds are split into fixed-size chunks. Chunk `i` gets its own engine
//! seeded with `seed + i`, so a report depends only on the seed and chunk
//! size, never on thread count or scheduling.

use std::time::Instant;

use cf_math::{ClusterSlotEngine, GameConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::report::{ChunkStats, SimReport};

/// Batch run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Base rounds to play
    pub spins: u64,
    /// Master seed
    pub seed: u64,
    /// Bet per round (game default when `None`)
    pub bet: Option<f64>,
    /// Ante wager on
    pub ante: bool,
    /// Rounds per chunk
    pub chunk_size: u64,
    /// Worker threads (all cores when `None`)
    pub threads: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spins: 1_000_000,
            seed: 1,
            bet: None,
            ante: false,
            chunk_size: 10_000,
            threads: None,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.spins == 0 {
            return Err(SimError::InvalidConfig("spins must be positive".into()));
        }
        if self.chunk_size == 0 {
            return Err(SimError::InvalidConfig("chunk_size must be positive".into()));
        }
        if let Some(bet) = self.bet {
            if !bet.is_finite() || bet <= 0.0 {
                return Err(SimError::InvalidConfig(format!("bet {} must be positive", bet)));
            }
        }
        if self.threads == Some(0) {
            return Err(SimError::InvalidConfig("threads must be positive".into()));
        }
        Ok(())
    }

    pub fn chunk_count(&self) -> u64 {
        self.spins.div_ceil(self.chunk_size)
    }

    /// Rounds in chunk `index`
    pub fn chunk_len(&self, index: u64) -> u64 {
        let start = index * self.chunk_size;
        self.chunk_size.min(self.spins.saturating_sub(start))
    }
}

/// Monte Carlo runner for one game config
pub struct Simulator {
    game: GameConfig,
}

impl Simulator {
    pub fn new(game: GameConfig) -> SimResult<Self> {
        game.validate()?;
        Ok(Self { game })
    }

    pub fn game(&self) -> &GameConfig {
        &self.game
    }

    /// Play `config.spins` rounds and aggregate
    pub fn run(&self, config: &SimConfig) -> SimResult<SimReport> {
        config.validate()?;
        if let Some(bet) = config.bet {
            if !self.game.is_bet_level(bet) {
                return Err(SimError::InvalidConfig(format!(
                    "bet {} is not one of {:?}",
                    bet, self.game.bet_levels
                )));
            }
        }

        let threads = config.threads.unwrap_or_else(num_cpus::get).max(1);
        let chunks = config.chunk_count();
        log::info!(
            "Simulating {} rounds of '{}' in {} chunks on {} threads (seed {})",
            config.spins,
            self.game.name,
            chunks,
            threads,
            config.seed
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SimError::ThreadPool(e.to_string()))?;

        let started = Instant::now();
        let results: Vec<SimResult<ChunkStats>> = pool.install(|| {
            (0..chunks)
                .into_par_iter()
                .map(|chunk| self.run_chunk(config, chunk))
                .collect()
        });

        // Merge in chunk order so float sums are reproducible
        let mut total = ChunkStats::default();
        for result in results {
            total.merge(&result?);
        }

        log::info!(
            "Simulation finished in {:.2}s",
            started.elapsed().as_secs_f64()
        );

        let bet = config.bet.unwrap_or(self.game.default_bet);
        Ok(SimReport::from_stats(
            &self.game.name,
            config.seed,
            bet,
            config.ante,
            config.chunk_size,
            &total,
        ))
    }

    fn run_chunk(&self, config: &SimConfig, chunk: u64) -> SimResult<ChunkStats> {
        let mut engine =
            ClusterSlotEngine::with_seed(self.game.clone(), config.seed.wrapping_add(chunk))?;
        if let Some(bet) = config.bet {
            engine.set_bet(bet)?;
        }
        engine.set_ante(config.ante);

        let mut stats = ChunkStats::default();
        for _ in 0..config.chunk_len(chunk) {
            let round = engine.play_round()?;
            stats.record(&round);
        }
        log::debug!(
            "Chunk {} done: {} rounds, won {:.2}",
            chunk,
            stats.rounds,
            stats.total_won()
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: u64) -> SimConfig {
        SimConfig {
            spins: 2_000,
            seed,
            chunk_size: 500,
            threads: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_chunk_layout() {
        let config = SimConfig {
            spins: 1_050,
            chunk_size: 500,
            ..Default::default()
        };
        assert_eq!(config.chunk_count(), 3);
        assert_eq!(config.chunk_len(0), 500);
        assert_eq!(config.chunk_len(2), 50);
        assert_eq!(config.chunk_len(3), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let sim = Simulator::new(GameConfig::default()).unwrap();
        for bad in [
            SimConfig { spins: 0, ..small(1) },
            SimConfig { chunk_size: 0, ..small(1) },
            SimConfig { bet: Some(-1.0), ..small(1) },
            SimConfig { bet: Some(3.0), ..small(1) },
            SimConfig { threads: Some(0), ..small(1) },
        ] {
            assert!(matches!(sim.run(&bad), Err(SimError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_spin_count_and_stake() {
        let sim = Simulator::new(GameConfig::default()).unwrap();
        let report = sim.run(&small(3)).unwrap();
        assert_eq!(report.spins, 2_000);
        assert_eq!(report.total_staked, 2_000.0);
        let bucketed: u64 = report.histogram.iter().map(|b| b.rounds).sum();
        assert_eq!(bucketed, 2_000);
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let sim = Simulator::new(GameConfig::default()).unwrap();
        let one = sim.run(&SimConfig { threads: Some(1), ..small(9) }).unwrap();
        let four = sim.run(&SimConfig { threads: Some(4), ..small(9) }).unwrap();
        assert_eq!(one, four);
    }

    #[test]
    fn test_ante_stake() {
        let sim = Simulator::new(GameConfig::default()).unwrap();
        let report = sim
            .run(&SimConfig {
                ante: true,
                bet: Some(2.0),
                ..small(4)
            })
            .unwrap();
        assert_eq!(report.total_staked, 2_000.0 * 2.5);
    }
}
