//! Cluster pay table
//!
//! Size-tiered: a cluster pays the bet multiplier of the highest tier whose
//! `min_size` it reaches. The numbers shipped in `standard()` are placeholder
//! math, not a certified model; real values come in through config.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::symbols::SymbolSet;

/// One size tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayTier {
    /// Smallest cluster size this tier covers
    pub min_size: usize,
    /// Payout as a multiple of the bet
    pub bet_multiplier: f64,
}

impl PayTier {
    pub fn new(min_size: usize, bet_multiplier: f64) -> Self {
        Self {
            min_size,
            bet_multiplier,
        }
    }
}

/// Complete cluster pay table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPayTable {
    /// Tiers shared by every pay symbol, ascending by `min_size`
    pub tiers: Vec<PayTier>,
    /// Per-symbol tiers replacing the shared ones
    #[serde(default)]
    pub overrides: BTreeMap<u32, Vec<PayTier>>,
}

impl ClusterPayTable {
    /// [8,10)→0.5, [10,12)→1, [12,15)→2, [15,20)→5, [20,25)→10, [25,∞)→20
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                PayTier::new(8, 0.5),
                PayTier::new(10, 1.0),
                PayTier::new(12, 2.0),
                PayTier::new(15, 5.0),
                PayTier::new(20, 10.0),
                PayTier::new(25, 20.0),
            ],
            overrides: BTreeMap::new(),
        }
    }

    /// Same tiers for every symbol
    pub fn from_tiers(tiers: Vec<PayTier>) -> Self {
        Self {
            tiers,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, symbol_id: u32, tiers: Vec<PayTier>) -> Self {
        self.overrides.insert(symbol_id, tiers);
        self
    }

    fn tiers_for(&self, symbol_id: u32) -> &[PayTier] {
        self.overrides
            .get(&symbol_id)
            .map(Vec::as_slice)
            .unwrap_or(&self.tiers)
    }

    /// Bet multiplier for a cluster of `size` (0.0 below the first tier)
    pub fn multiplier_for(&self, symbol_id: u32, size: usize) -> f64 {
        let tiers = self.tiers_for(symbol_id);
        let idx = tiers.partition_point(|t| t.min_size <= size);
        if idx == 0 {
            0.0
        } else {
            tiers[idx - 1].bet_multiplier
        }
    }

    /// Payout for a cluster at `bet`
    pub fn payout(&self, symbol_id: u32, size: usize, bet: f64) -> f64 {
        bet * self.multiplier_for(symbol_id, size)
    }

    pub fn validate(&self, symbols: &SymbolSet) -> MathResult<()> {
        validate_tiers(&self.tiers, "shared")?;
        for (&symbol_id, tiers) in &self.overrides {
            if !symbols.is_pay(symbol_id) {
                return Err(MathError::InvalidPayTable(format!(
                    "override for non-pay symbol {}",
                    symbol_id
                )));
            }
            validate_tiers(tiers, symbols.name_of(symbol_id))?;
        }
        Ok(())
    }
}

impl Default for ClusterPayTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_tiers(tiers: &[PayTier], label: &str) -> MathResult<()> {
    if tiers.is_empty() {
        return Err(MathError::InvalidPayTable(format!("{} tiers are empty", label)));
    }
    for tier in tiers {
        if tier.min_size == 0 {
            return Err(MathError::InvalidPayTable(format!(
                "{} tier with min_size 0",
                label
            )));
        }
        if !tier.bet_multiplier.is_finite() || tier.bet_multiplier < 0.0 {
            return Err(MathError::InvalidPayTable(format!(
                "{} tier {} has multiplier {}",
                label, tier.min_size, tier.bet_multiplier
            )));
        }
    }
    for pair in tiers.windows(2) {
        if pair[1].min_size <= pair[0].min_size {
            return Err(MathError::InvalidPayTable(format!(
                "{} tiers not strictly ascending at size {}",
                label, pair[1].min_size
            )));
        }
        if pair[1].bet_multiplier < pair[0].bet_multiplier {
            return Err(MathError::InvalidPayTable(format!(
                "{} tier {} pays less than tier {}",
                label, pair[1].min_size, pair[0].min_size
            )));
        }
    }
    Ok(())
}
