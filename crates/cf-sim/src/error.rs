//! Error types for batch simulation

use cf_math::MathError;
use thiserror::Error;

/// Simulation errors
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("Game math error: {0}")]
    Math(#[from] MathError),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for simulation
pub type SimResult<T> = Result<T, SimError>;
