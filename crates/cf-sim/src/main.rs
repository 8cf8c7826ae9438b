//! Candyfall RTP simulator
//!
//! Usage:
//!   cf-sim --spins 1000000 --seed 7
//!   cf-sim --config game.yaml --ante --json
//!   cf-sim --print-config > game.yaml

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cf_math::GameConfig;
use cf_sim::{SimConfig, Simulator};

#[derive(Parser)]
#[command(name = "cf-sim", about = "Candyfall cluster-pay RTP simulator")]
struct Cli {
    /// Game config (.json, .yaml, .yml); standard game when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base rounds to play
    #[arg(short = 'n', long, default_value_t = 1_000_000)]
    spins: u64,

    /// Master seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Bet per round, one of the game's bet levels (game default when omitted)
    #[arg(short, long)]
    bet: Option<f64>,

    /// Play with the ante wager on
    #[arg(long)]
    ante: bool,

    /// Rounds per parallel chunk
    #[arg(long, default_value_t = 10_000)]
    chunk_size: u64,

    /// Worker threads (all cores when omitted)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print the game config as YAML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let game = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load game config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if cli.print_config {
        let yaml = game.to_yaml().context("Failed to serialize game config")?;
        print!("{}", yaml);
        return Ok(());
    }

    let sim_config = SimConfig {
        spins: cli.spins,
        seed: cli.seed,
        bet: cli.bet,
        ante: cli.ante,
        chunk_size: cli.chunk_size,
        threads: cli.threads,
    };

    let simulator = Simulator::new(game).context("Invalid game config")?;
    let report = simulator.run(&sim_config).context("Simulation failed")?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.summary());
    }
    Ok(())
}
