//! Weighted symbol draw
//!
//! Each call samples one symbol from a fixed categorical distribution.
//! Ante swaps in a heavier scatter weight; everything else is identical.
//! The weights are tuning data and the draw only promises faithful sampling.

use std::collections::HashSet;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, GridSpec};
use crate::error::{MathError, MathResult};
use crate::grid::Grid;
use crate::symbols::SymbolSet;

/// Relative weight of one symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub symbol_id: u32,
    pub weight: u32,
}

impl WeightEntry {
    pub fn new(symbol_id: u32, weight: u32) -> Self {
        Self { symbol_id, weight }
    }
}

/// Symbol weights for base play and ante
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolWeights {
    /// Weights without ante
    pub base: Vec<WeightEntry>,
    /// Scatter weight that replaces the base one while ante is on
    pub ante_scatter_weight: u32,
}

impl SymbolWeights {
    /// Placeholder weights for the standard candy set
    pub fn standard() -> Self {
        Self {
            base: vec![
                WeightEntry::new(1, 8),
                WeightEntry::new(2, 10),
                WeightEntry::new(3, 12),
                WeightEntry::new(4, 14),
                WeightEntry::new(5, 18),
                WeightEntry::new(6, 20),
                WeightEntry::new(7, 22),
                WeightEntry::new(8, 24),
                WeightEntry::new(9, 26),
                WeightEntry::new(crate::symbols::SCATTER_ID, 3),
                WeightEntry::new(crate::symbols::MULTIPLIER_ID, 2),
            ],
            ante_scatter_weight: 6,
        }
    }

    pub fn weight_of(&self, symbol_id: u32) -> u32 {
        self.base
            .iter()
            .find(|e| e.symbol_id == symbol_id)
            .map(|e| e.weight)
            .unwrap_or(0)
    }

    /// Base table with the scatter weight replaced (or added)
    pub fn ante_table(&self, scatter_id: u32) -> Vec<WeightEntry> {
        let mut table = self.base.clone();
        match table.iter_mut().find(|e| e.symbol_id == scatter_id) {
            Some(entry) => entry.weight = self.ante_scatter_weight,
            None => table.push(WeightEntry::new(scatter_id, self.ante_scatter_weight)),
        }
        table
    }

    pub fn validate(&self, symbols: &SymbolSet) -> MathResult<()> {
        let mut seen = HashSet::new();
        for entry in &self.base {
            if !symbols.contains(entry.symbol_id) {
                return Err(MathError::InvalidWeights(format!(
                    "weight for unknown symbol {}",
                    entry.symbol_id
                )));
            }
            if !seen.insert(entry.symbol_id) {
                return Err(MathError::InvalidWeights(format!(
                    "duplicate weight for symbol {}",
                    entry.symbol_id
                )));
            }
        }
        if !self
            .base
            .iter()
            .any(|e| e.weight > 0 && symbols.is_pay(e.symbol_id))
        {
            return Err(MathError::InvalidWeights(
                "no pay symbol has a positive weight".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SymbolWeights {
    fn default() -> Self {
        Self::standard()
    }
}

/// One multiplier value and its weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierValue {
    pub value: u32,
    pub weight: u32,
}

impl MultiplierValue {
    pub fn new(value: u32, weight: u32) -> Self {
        Self { value, weight }
    }
}

/// Largest value a single multiplier symbol may carry. A full 255×255 grid
/// of this value still sums inside a u32.
pub const MAX_MULTIPLIER_VALUE: u32 = 10_000;

/// Values a landing multiplier symbol may carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTable {
    pub values: Vec<MultiplierValue>,
}

impl MultiplierTable {
    pub fn standard() -> Self {
        Self {
            values: vec![
                MultiplierValue::new(2, 40),
                MultiplierValue::new(3, 25),
                MultiplierValue::new(4, 15),
                MultiplierValue::new(5, 10),
                MultiplierValue::new(6, 6),
                MultiplierValue::new(8, 5),
                MultiplierValue::new(10, 4),
                MultiplierValue::new(12, 3),
                MultiplierValue::new(15, 2),
                MultiplierValue::new(20, 2),
                MultiplierValue::new(25, 1),
                MultiplierValue::new(50, 1),
                MultiplierValue::new(100, 1),
            ],
        }
    }

    pub fn validate(&self) -> MathResult<()> {
        if self.values.iter().any(|v| v.value == 0) {
            return Err(MathError::InvalidMultiplierTable(
                "multiplier value 0".into(),
            ));
        }
        if let Some(v) = self.values.iter().find(|v| v.value > MAX_MULTIPLIER_VALUE) {
            return Err(MathError::InvalidMultiplierTable(format!(
                "multiplier value {} above {}",
                v.value, MAX_MULTIPLIER_VALUE
            )));
        }
        WeightedIndex::new(self.values.iter().map(|v| v.weight))
            .map(|_| ())
            .map_err(|e| MathError::InvalidMultiplierTable(e.to_string()))
    }
}

impl Default for MultiplierTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Source of fresh symbols for initial grids and refills
pub trait SymbolSource {
    /// Draw one symbol id
    fn next_symbol(&mut self, ante: bool) -> u32;

    /// Draw the value for a multiplier symbol that just landed
    fn next_multiplier_value(&mut self) -> u32;

    /// Draw a complete grid, column-major
    fn draw_grid(&mut self, spec: GridSpec, ante: bool, multiplier_id: u32) -> Grid {
        let mut grid = Grid::filled(spec, 0);
        let positions: Vec<_> = grid.positions().collect();
        for pos in positions {
            let symbol_id = self.next_symbol(ante);
            grid.set(pos, symbol_id);
            if symbol_id == multiplier_id {
                let value = self.next_multiplier_value();
                grid.set_multiplier_value(pos, value);
            }
        }
        grid
    }
}

fn weighted_index(entries: &[WeightEntry]) -> MathResult<(Vec<u32>, WeightedIndex<u32>)> {
    let index = WeightedIndex::new(entries.iter().map(|e| e.weight))
        .map_err(|e| MathError::InvalidWeights(e.to_string()))?;
    Ok((entries.iter().map(|e| e.symbol_id).collect(), index))
}

/// Production draw: independent weighted samples from an RNG
#[derive(Debug, Clone)]
pub struct WeightedDraw<R: Rng> {
    rng: R,
    base_ids: Vec<u32>,
    base: WeightedIndex<u32>,
    ante_ids: Vec<u32>,
    ante: WeightedIndex<u32>,
    multiplier_values: Vec<u32>,
    multipliers: WeightedIndex<u32>,
}

impl<R: Rng> WeightedDraw<R> {
    /// Build from a config's weight tables
    pub fn new(config: &GameConfig, rng: R) -> MathResult<Self> {
        config.weights.validate(&config.symbols)?;
        config.multipliers.validate()?;
        let scatter_id = config
            .symbols
            .scatter_id()
            .ok_or_else(|| MathError::InvalidSymbolSet("no scatter symbol".into()))?;

        let (base_ids, base) = weighted_index(&config.weights.base)?;
        let (ante_ids, ante) = weighted_index(&config.weights.ante_table(scatter_id))?;
        let multipliers = WeightedIndex::new(config.multipliers.values.iter().map(|v| v.weight))
            .map_err(|e| MathError::InvalidMultiplierTable(e.to_string()))?;

        Ok(Self {
            rng,
            base_ids,
            base,
            ante_ids,
            ante,
            multiplier_values: config.multipliers.values.iter().map(|v| v.value).collect(),
            multipliers,
        })
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl WeightedDraw<ChaCha8Rng> {
    /// Reproducible stream for a seed
    pub fn seeded(config: &GameConfig, seed: u64) -> MathResult<Self> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seeded from the OS
    pub fn from_os_rng(config: &GameConfig) -> MathResult<Self> {
        Self::new(config, ChaCha8Rng::from_os_rng())
    }
}

impl<R: Rng> SymbolSource for WeightedDraw<R> {
    fn next_symbol(&mut self, ante: bool) -> u32 {
        if ante {
            self.ante_ids[self.ante.sample(&mut self.rng)]
        } else {
            self.base_ids[self.base.sample(&mut self.rng)]
        }
    }

    fn next_multiplier_value(&mut self) -> u32 {
        self.multiplier_values[self.multipliers.sample(&mut self.rng)]
    }
}

/// Replays a fixed symbol sequence, cycling when exhausted.
///
/// Used to reproduce a recorded outcome or to pin refills in tests.
#[derive(Debug, Clone)]
pub struct ScriptedDraw {
    symbols: Vec<u32>,
    multiplier_values: Vec<u32>,
    next_symbol: usize,
    next_multiplier: usize,
}

impl ScriptedDraw {
    pub fn new(symbols: Vec<u32>) -> MathResult<Self> {
        if symbols.is_empty() {
            return Err(MathError::InvalidWeights("empty symbol script".into()));
        }
        Ok(Self {
            symbols,
            multiplier_values: vec![2],
            next_symbol: 0,
            next_multiplier: 0,
        })
    }

    pub fn with_multiplier_values(mut self, values: Vec<u32>) -> MathResult<Self> {
        if values.is_empty() || values.contains(&0) {
            return Err(MathError::InvalidMultiplierTable(
                "scripted values must be non-empty and positive".into(),
            ));
        }
        self.multiplier_values = values;
        Ok(self)
    }

    /// Symbols handed out so far
    pub fn symbols_drawn(&self) -> usize {
        self.next_symbol
    }
}

impl SymbolSource for ScriptedDraw {
    fn next_symbol(&mut self, _ante: bool) -> u32 {
        let symbol = self.symbols[self.next_symbol % self.symbols.len()];
        self.next_symbol += 1;
        symbol
    }

    fn next_multiplier_value(&mut self) -> u32 {
        let value = self.multiplier_values[self.next_multiplier % self.multiplier_values.len()];
        self.next_multiplier += 1;
        value
    }
}
