//! Game configuration
//!
//! Every table the resolver reads (pay tiers, symbol weights, multiplier
//! values, free spin thresholds) lives here as data. `GameConfig::validate`
//! runs before any resolver or engine is built so malformed tables fail at
//! startup, never mid-spin.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::draw::{MultiplierTable, SymbolWeights};
use crate::error::{MathError, MathResult};
use crate::paytable::ClusterPayTable;
use crate::symbols::SymbolSet;

/// Grid specification (columns × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns (reels)
    pub columns: u8,
    /// Number of visible rows per column
    pub rows: u8,
}

impl GridSpec {
    pub fn new(columns: u8, rows: u8) -> Self {
        Self { columns, rows }
    }

    /// Standard 6×5 cluster grid
    pub fn standard_6x5() -> Self {
        Self::new(6, 5)
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn validate(&self) -> MathResult<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(MathError::InvalidGridSpec {
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_6x5()
    }
}

/// How vacated cells are refilled after a tumble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefillMode {
    /// Each vacated cell gets a fresh symbol where it stands
    #[default]
    InPlace,
    /// Survivors drop to the bottom of their column, new symbols fill from the top
    Gravity,
}

/// Cluster and tumble loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TumbleConfig {
    /// Minimum connected cells for a winning cluster
    pub min_cluster_size: usize,
    /// Safety cap on tumbles per spin (not part of the game rules)
    pub max_tumbles: u32,
    /// Refill behaviour
    #[serde(default)]
    pub refill: RefillMode,
}

impl Default for TumbleConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: 8,
            max_tumbles: 50,
            refill: RefillMode::InPlace,
        }
    }
}

/// Free spin trigger and award settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeSpinConfig {
    /// Scatters on the initial base-game grid needed to trigger
    pub trigger_scatters: u8,
    /// Spins awarded by a base-game trigger
    pub award_spins: u32,
    /// Scatters needed to retrigger during the session
    pub retrigger_scatters: u8,
    /// Extra spins per retrigger (0 disables retriggers)
    pub retrigger_spins: u32,
}

impl Default for FreeSpinConfig {
    fn default() -> Self {
        Self {
            trigger_scatters: 4,
            award_spins: 10,
            retrigger_scatters: 3,
            retrigger_spins: 5,
        }
    }
}

impl FreeSpinConfig {
    /// Spins awarded for a base-game scatter count
    pub fn base_award(&self, scatter_count: usize) -> Option<u32> {
        (scatter_count >= self.trigger_scatters as usize).then_some(self.award_spins)
    }

    /// Extra spins for a scatter count seen during free spins
    pub fn retrigger_award(&self, scatter_count: usize) -> Option<u32> {
        (self.retrigger_spins > 0 && scatter_count >= self.retrigger_scatters as usize)
            .then_some(self.retrigger_spins)
    }

    pub fn validate(&self, total_positions: usize) -> MathResult<()> {
        if self.trigger_scatters == 0 || self.trigger_scatters as usize > total_positions {
            return Err(MathError::InvalidFreeSpinConfig(format!(
                "trigger_scatters {} outside 1..={}",
                self.trigger_scatters, total_positions
            )));
        }
        if self.award_spins == 0 {
            return Err(MathError::InvalidFreeSpinConfig(
                "award_spins must be positive".into(),
            ));
        }
        if self.retrigger_scatters == 0 {
            return Err(MathError::InvalidFreeSpinConfig(
                "retrigger_scatters must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Complete cluster game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Game name
    pub name: String,
    /// Grid specification
    pub grid: GridSpec,
    /// Symbol definitions
    pub symbols: SymbolSet,
    /// Cluster size → bet multiplier tiers
    pub pay_table: ClusterPayTable,
    /// Symbol draw weights
    pub weights: SymbolWeights,
    /// Multiplier symbol values
    pub multipliers: MultiplierTable,
    /// Cluster and tumble settings
    pub tumble: TumbleConfig,
    /// Free spins settings
    pub free_spins: FreeSpinConfig,
    /// Stake factor while ante is on (1.25 = +25%)
    pub ante_cost_multiplier: f64,
    /// Default bet amount
    pub default_bet: f64,
    /// Allowed bets, ascending; `default_bet` must be one of them
    pub bet_levels: Vec<f64>,
    /// RTP target in percent (for display, not enforced)
    pub target_rtp: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "Candyfall".into(),
            grid: GridSpec::default(),
            symbols: SymbolSet::standard(),
            pay_table: ClusterPayTable::standard(),
            weights: SymbolWeights::standard(),
            multipliers: MultiplierTable::standard(),
            tumble: TumbleConfig::default(),
            free_spins: FreeSpinConfig::default(),
            ante_cost_multiplier: 1.25,
            default_bet: 1.0,
            bet_levels: vec![0.20, 0.40, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0],
            target_rtp: 96.5,
        }
    }
}

impl GameConfig {
    /// Fail fast on any table the resolver cannot use
    pub fn validate(&self) -> MathResult<()> {
        self.grid.validate()?;
        self.symbols.validate()?;

        let total = self.grid.total_positions();
        let min = self.tumble.min_cluster_size;
        if min == 0 || min > total {
            return Err(MathError::InvalidMinClusterSize {
                size: min,
                max: total,
            });
        }
        if self.tumble.max_tumbles == 0 {
            return Err(MathError::InvalidTumbleLimit(self.tumble.max_tumbles));
        }

        self.pay_table.validate(&self.symbols)?;
        self.weights.validate(&self.symbols)?;
        self.multipliers.validate()?;
        self.free_spins.validate(total)?;

        if !self.ante_cost_multiplier.is_finite() || self.ante_cost_multiplier < 1.0 {
            return Err(MathError::InvalidWeights(format!(
                "ante_cost_multiplier {} must be >= 1.0",
                self.ante_cost_multiplier
            )));
        }
        self.validate_bet_levels()?;
        if !self.is_bet_level(self.default_bet) {
            return Err(MathError::InvalidBet(self.default_bet));
        }

        if let Some(first) = self.pay_table.tiers.first() {
            if first.min_size < min {
                log::warn!(
                    "Pay tier starting at {} is below the minimum cluster size {}; sizes under {} never pay",
                    first.min_size,
                    min,
                    min
                );
            }
        }
        Ok(())
    }

    fn validate_bet_levels(&self) -> MathResult<()> {
        if self.bet_levels.is_empty() {
            return Err(MathError::InvalidBetLevels("no bet levels".into()));
        }
        if let Some(level) = self
            .bet_levels
            .iter()
            .find(|l| !l.is_finite() || **l <= 0.0)
        {
            return Err(MathError::InvalidBetLevels(format!(
                "bet level {} must be positive",
                level
            )));
        }
        if self.bet_levels.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::InvalidBetLevels(
                "bet levels must be strictly ascending".into(),
            ));
        }
        Ok(())
    }

    /// True when `bet` matches one of the configured levels
    pub fn is_bet_level(&self, bet: f64) -> bool {
        bet.is_finite()
            && self
                .bet_levels
                .iter()
                .any(|level| (level - bet).abs() < 1e-9)
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> MathResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MathError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml(yaml: &str) -> MathResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| MathError::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load by file extension (`.json`, `.yaml`, `.yml`)
    pub fn load(path: impl AsRef<Path>) -> MathResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let config = match ext.as_str() {
            "json" => Self::from_json(&text)?,
            "yaml" | "yml" => Self::from_yaml(&text)?,
            other => return Err(MathError::UnsupportedFormat(other.to_string())),
        };
        log::info!("Loaded game config '{}' from {:?}", config.name, path);
        Ok(config)
    }

    pub fn to_json(&self) -> MathResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MathError::Json(e.to_string()))
    }

    pub fn to_yaml(&self) -> MathResult<String> {
        serde_yml::to_string(self).map_err(|e| MathError::Yaml(e.to_string()))
    }

    /// Stake charged for one base-game spin
    pub fn stake(&self, bet: f64, ante: bool) -> f64 {
        if ante {
            bet * self.ante_cost_multiplier
        } else {
            bet
        }
    }
}
