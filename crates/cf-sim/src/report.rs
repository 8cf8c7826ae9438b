//! Simulation accumulators and the final report

use cf_math::RoundResult;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Lower bounds of the win-ratio histogram buckets for winning rounds.
/// Bucket 0 holds rounds that paid nothing.
pub const HISTOGRAM_EDGES: [f64; 10] = [0.0, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 500.0, 1000.0];

fn bucket_for(win_ratio: f64) -> usize {
    if win_ratio <= 0.0 {
        0
    } else {
        HISTOGRAM_EDGES.partition_point(|&edge| edge <= win_ratio)
    }
}

/// Running totals for one chunk of rounds
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkStats {
    pub rounds: u64,
    pub free_spins_played: u64,
    pub total_staked: f64,
    pub base_won: f64,
    pub free_spins_won: f64,
    pub winning_rounds: u64,
    pub free_spin_triggers: u64,
    pub retriggers: u64,
    pub tumbles: u64,
    pub longest_tumble_chain: usize,
    pub max_win_ratio: f64,
    pub histogram: Vec<u64>,
}

impl Default for ChunkStats {
    fn default() -> Self {
        Self {
            rounds: 0,
            free_spins_played: 0,
            total_staked: 0.0,
            base_won: 0.0,
            free_spins_won: 0.0,
            winning_rounds: 0,
            free_spin_triggers: 0,
            retriggers: 0,
            tumbles: 0,
            longest_tumble_chain: 0,
            max_win_ratio: 0.0,
            histogram: vec![0; HISTOGRAM_EDGES.len() + 1],
        }
    }
}

impl ChunkStats {
    /// Fold one round in
    pub fn record(&mut self, round: &RoundResult) {
        self.rounds += 1;
        self.total_staked += round.stake;

        for spin in &round.spins {
            if spin.is_free_spin {
                self.free_spins_played += 1;
                self.free_spins_won += spin.total_win;
            } else {
                self.base_won += spin.total_win;
                if spin.free_spins_triggered() {
                    self.free_spin_triggers += 1;
                }
            }
            if spin.is_free_spin && spin.free_spins_triggered() {
                self.retriggers += 1;
            }
            self.tumbles += spin.tumble_count() as u64;
            self.longest_tumble_chain = self.longest_tumble_chain.max(spin.tumble_count());
        }

        if round.is_win() {
            self.winning_rounds += 1;
        }

        let ratio = round.win_ratio();
        if ratio > self.max_win_ratio {
            self.max_win_ratio = ratio;
        }
        self.histogram[bucket_for(ratio)] += 1;
    }

    /// Combine with another chunk
    pub fn merge(&mut self, other: &ChunkStats) {
        self.rounds += other.rounds;
        self.free_spins_played += other.free_spins_played;
        self.total_staked += other.total_staked;
        self.base_won += other.base_won;
        self.free_spins_won += other.free_spins_won;
        self.winning_rounds += other.winning_rounds;
        self.free_spin_triggers += other.free_spin_triggers;
        self.retriggers += other.retriggers;
        self.tumbles += other.tumbles;
        self.longest_tumble_chain = self.longest_tumble_chain.max(other.longest_tumble_chain);
        self.max_win_ratio = self.max_win_ratio.max(other.max_win_ratio);
        for (mine, theirs) in self.histogram.iter_mut().zip(&other.histogram) {
            *mine += theirs;
        }
    }

    pub fn total_won(&self) -> f64 {
        self.base_won + self.free_spins_won
    }
}

/// One histogram bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Inclusive lower bound (win / bet); `None` for the no-win bucket
    pub from: Option<f64>,
    /// Exclusive upper bound; `None` for the open top bucket
    pub to: Option<f64>,
    pub rounds: u64,
    /// Share of all rounds in percent
    pub percent: f64,
}

/// Outcome of a batch simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    pub game: String,
    pub seed: u64,
    pub bet: f64,
    pub ante: bool,
    pub chunk_size: u64,

    /// Paid base rounds
    pub spins: u64,
    pub free_spins_played: u64,
    pub total_staked: f64,
    pub total_won: f64,

    /// Return to player in percent
    pub rtp: f64,
    pub base_game_rtp: f64,
    pub free_spins_rtp: f64,
    /// Rounds with any win, in percent
    pub hit_rate: f64,
    /// Rounds triggering free spins, in percent
    pub free_spins_trigger_rate: f64,
    pub retriggers: u64,
    /// Tumbles per spin played (free spins included)
    pub avg_tumbles: f64,
    pub longest_tumble_chain: usize,
    /// Largest round win over bet
    pub max_win_ratio: f64,
    pub histogram: Vec<HistogramBucket>,
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

impl SimReport {
    pub(crate) fn from_stats(
        game: &str,
        seed: u64,
        bet: f64,
        ante: bool,
        chunk_size: u64,
        stats: &ChunkStats,
    ) -> Self {
        let rounds = stats.rounds as f64;
        let spins_played = (stats.rounds + stats.free_spins_played) as f64;

        let histogram = stats
            .histogram
            .iter()
            .enumerate()
            .map(|(i, &count)| HistogramBucket {
                from: if i == 0 { None } else { Some(HISTOGRAM_EDGES[i - 1]) },
                to: if i == 0 {
                    None
                } else {
                    HISTOGRAM_EDGES.get(i).copied()
                },
                rounds: count,
                percent: percent(count as f64, rounds),
            })
            .collect();

        Self {
            game: game.to_string(),
            seed,
            bet,
            ante,
            chunk_size,
            spins: stats.rounds,
            free_spins_played: stats.free_spins_played,
            total_staked: stats.total_staked,
            total_won: stats.total_won(),
            rtp: percent(stats.total_won(), stats.total_staked),
            base_game_rtp: percent(stats.base_won, stats.total_staked),
            free_spins_rtp: percent(stats.free_spins_won, stats.total_staked),
            hit_rate: percent(stats.winning_rounds as f64, rounds),
            free_spins_trigger_rate: percent(stats.free_spin_triggers as f64, rounds),
            retriggers: stats.retriggers,
            avg_tumbles: if spins_played > 0.0 {
                stats.tumbles as f64 / spins_played
            } else {
                0.0
            },
            longest_tumble_chain: stats.longest_tumble_chain,
            max_win_ratio: stats.max_win_ratio,
            histogram,
        }
    }

    /// Average base rounds between free spin triggers
    pub fn trigger_frequency(&self) -> Option<f64> {
        if self.free_spins_trigger_rate > 0.0 {
            Some(100.0 / self.free_spins_trigger_rate)
        } else {
            None
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Serialization(e.to_string()))
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Game:              {}\n", self.game));
        out.push_str(&format!(
            "Spins:             {} (bet {:.2}{}, seed {})\n",
            self.spins,
            self.bet,
            if self.ante { ", ante" } else { "" },
            self.seed
        ));
        out.push_str(&format!("Total staked:      {:.2}\n", self.total_staked));
        out.push_str(&format!("Total won:         {:.2}\n", self.total_won));
        out.push_str(&format!(
            "RTP:               {:.3}% (base {:.3}%, free spins {:.3}%)\n",
            self.rtp, self.base_game_rtp, self.free_spins_rtp
        ));
        out.push_str(&format!("Hit rate:          {:.2}%\n", self.hit_rate));
        match self.trigger_frequency() {
            Some(freq) => out.push_str(&format!(
                "Free spins:        {:.3}% (1 in {:.0}), {} retriggers\n",
                self.free_spins_trigger_rate, freq, self.retriggers
            )),
            None => out.push_str("Free spins:        never triggered\n"),
        }
        out.push_str(&format!(
            "Tumbles per spin:  {:.3} (longest chain {})\n",
            self.avg_tumbles, self.longest_tumble_chain
        ));
        out.push_str(&format!("Max win:           {:.2}x\n", self.max_win_ratio));
        out.push_str("Win distribution:\n");
        for bucket in &self.histogram {
            let label = match (bucket.from, bucket.to) {
                (None, _) => "no win".to_string(),
                (Some(from), Some(to)) => format!("{}x - {}x", from, to),
                (Some(from), None) => format!("{}x +", from),
            };
            out.push_str(&format!(
                "  {:<14} {:>12} {:>8.3}%\n",
                label, bucket.rounds, bucket.percent
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket_for(0.0), 0);
        assert_eq!(bucket_for(0.2), 1);
        assert_eq!(bucket_for(1.0), 2);
        assert_eq!(bucket_for(4.99), 3);
        assert_eq!(bucket_for(5.0), 4);
        assert_eq!(bucket_for(999.0), 9);
        assert_eq!(bucket_for(1000.0), 10);
        assert_eq!(bucket_for(25_000.0), 10);
    }

    #[test]
    fn test_merge_adds_up() {
        let mut a = ChunkStats {
            rounds: 10,
            total_staked: 10.0,
            base_won: 4.0,
            max_win_ratio: 2.0,
            ..Default::default()
        };
        a.histogram[0] = 6;
        let mut b = ChunkStats {
            rounds: 5,
            total_staked: 5.0,
            free_spins_won: 6.0,
            max_win_ratio: 7.5,
            ..Default::default()
        };
        b.histogram[0] = 1;

        a.merge(&b);
        assert_eq!(a.rounds, 15);
        assert_eq!(a.total_won(), 10.0);
        assert_eq!(a.max_win_ratio, 7.5);
        assert_eq!(a.histogram[0], 7);
    }

    #[test]
    fn test_report_percentages() {
        let stats = ChunkStats {
            rounds: 200,
            total_staked: 200.0,
            base_won: 120.0,
            free_spins_won: 70.0,
            winning_rounds: 50,
            free_spin_triggers: 2,
            ..Default::default()
        };
        let report = SimReport::from_stats("Test", 1, 1.0, false, 100, &stats);
        assert_relative_eq!(report.rtp, 95.0);
        assert_relative_eq!(report.base_game_rtp, 60.0);
        assert_relative_eq!(report.free_spins_rtp, 35.0);
        assert_relative_eq!(report.hit_rate, 25.0);
        assert_relative_eq!(report.free_spins_trigger_rate, 1.0);
        assert_relative_eq!(report.trigger_frequency().unwrap(), 100.0);
        assert_eq!(report.histogram.len(), HISTOGRAM_EDGES.len() + 1);
        assert!(report.summary().contains("RTP:"));
    }
}
