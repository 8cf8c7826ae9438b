//! # cf-math — Cluster-pay tumble math for Candyfall
//!
//! Resolves a 6×5 cluster-pay slot spin into its complete tumble sequence:
//! detect connected clusters, pay them, remove them, refill, and repeat until
//! the grid settles.
//!
//! ## Features
//!
//! - **Cluster Detection**: 4-connected flood fill with an explicit stack
//! - **Tumble Resolver**: Eager DETECT → RESOLVE → REFILL loop with a hard cap
//! - **Multipliers**: Per-tumble in the base game, accumulated in free spins
//! - **Free Spins**: Scatter trigger, retrigger on the settled grid
//! - **Playback**: Time-stamped events for a display layer, Normal/Turbo/Instant
//!
//! ## Architecture
//!
//! ```text
//! ClusterSlotEngine
//!     │
//!     ├── GameConfig (grid, symbols, pay tiers, weights, free spins)
//!     ├── WeightedDraw (SymbolSource, ChaCha8 stream)
//!     ├── FreeSpinSession (remaining spins, accumulated multiplier)
//!     └── TumbleResolver
//!           │
//!           ├── ClusterDetector
//!           └── ClusterPayTable
//!                 │
//!                 v
//!     SpinOutcome → Vec<TimedEvent>
//! ```

pub mod cluster;
pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
pub mod grid;
pub mod paytable;
pub mod playback;
pub mod session;
pub mod symbols;
pub mod tumble;

pub use cluster::*;
pub use config::*;
pub use draw::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use paytable::*;
pub use playback::*;
pub use session::*;
pub use symbols::*;
pub use tumble::*;
