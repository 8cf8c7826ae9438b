//! # cf-sim — Batch spin simulator for Candyfall
//!
//! Plays millions of rounds through [`cf_math::ClusterSlotEngine`] in
//! parallel and reports RTP, hit rate, free spin frequency and the win
//! distribution.
//!
//! ```text
//! SimConfig ──► Simulator::run
//!                   │
//!                   ├── chunk 0 (seed + 0) ─┐
//!                   ├── chunk 1 (seed + 1) ─┼─► ChunkStats::merge ──► SimReport
//!                   └── chunk N (seed + N) ─┘
//! ```

pub mod error;
pub mod report;
pub mod simulator;

pub use error::*;
pub use report::*;
pub use simulator::*;
