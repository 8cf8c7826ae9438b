//! Error types for cluster math

use thiserror::Error;

/// Cluster math error types
#[derive(Error, Debug)]
pub enum MathError {
    /// Minimum cluster size is zero or larger than the grid
    #[error("Invalid minimum cluster size {size}: must be between 1 and {max}")]
    InvalidMinClusterSize { size: usize, max: usize },

    /// Grid spec with a zero dimension
    #[error("Invalid grid spec: {columns}x{rows}")]
    InvalidGridSpec { columns: u8, rows: u8 },

    /// Symbol set is malformed (duplicate ids, missing scatter, ...)
    #[error("Invalid symbol set: {0}")]
    InvalidSymbolSet(String),

    /// Weight table cannot be sampled
    #[error("Invalid symbol weights: {0}")]
    InvalidWeights(String),

    /// Multiplier value table cannot be sampled
    #[error("Invalid multiplier table: {0}")]
    InvalidMultiplierTable(String),

    /// Pay tiers are empty, unsorted or not monotone
    #[error("Invalid pay table: {0}")]
    InvalidPayTable(String),

    /// Free spin thresholds or awards are unusable
    #[error("Invalid free spin config: {0}")]
    InvalidFreeSpinConfig(String),

    /// Tumble cap of zero
    #[error("Invalid tumble limit: {0}")]
    InvalidTumbleLimit(u32),

    /// Grid does not match the configured dimensions
    #[error("Grid dimension mismatch: expected {expected_columns}x{expected_rows}, got {columns}x{rows}")]
    GridDimensionMismatch {
        expected_columns: u8,
        expected_rows: u8,
        columns: usize,
        rows: usize,
    },

    /// Grid cell holds an id outside the symbol set
    #[error("Unknown symbol {symbol_id} at reel {col}, row {row}")]
    UnknownSymbol { symbol_id: u32, col: u8, row: u8 },

    /// Bet ladder is empty, unsorted or holds a non-positive level
    #[error("Invalid bet levels: {0}")]
    InvalidBetLevels(String),

    /// Bet is not positive and finite, or not one of the configured levels
    #[error("Invalid bet amount: {0}")]
    InvalidBet(f64),

    /// Tumble loop ran past its safety cap
    #[error("Tumble limit exceeded: more than {limit} tumbles in one spin")]
    TumbleLimitExceeded { limit: u32 },

    /// Multiplier total does not fit in a u32
    #[error("Multiplier overflow: {accumulated} + {added}")]
    MultiplierOverflow { accumulated: u32, added: u32 },

    /// JSON config parse/serialize error
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML config parse/serialize error
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Config file has an extension we don't read
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cluster math operations
pub type MathResult<T> = Result<T, MathError>;
