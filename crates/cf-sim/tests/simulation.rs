//! Batch Simulation Integration Tests
//!
//! - Reproducibility across runs and thread counts
//! - Config files driving the simulator
//! - Report consistency

use approx::assert_relative_eq;
use cf_math::{GameConfig, RefillMode};
use cf_sim::{SimConfig, Simulator};

fn config(seed: u64) -> SimConfig {
    SimConfig {
        spins: 3_000,
        seed,
        chunk_size: 1_000,
        threads: Some(3),
        ..Default::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPRODUCIBILITY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_seed_same_report() {
    let sim = Simulator::new(GameConfig::default()).unwrap();
    let a = sim.run(&config(42)).unwrap();
    let b = sim.run(&config(42)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
}

#[test]
fn test_different_seed_different_report() {
    let sim = Simulator::new(GameConfig::default()).unwrap();
    let a = sim.run(&config(1)).unwrap();
    let b = sim.run(&config(2)).unwrap();
    assert_ne!(a.total_won, b.total_won);
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT CONSISTENCY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_report_is_internally_consistent() {
    let sim = Simulator::new(GameConfig::default()).unwrap();
    let report = sim.run(&config(5)).unwrap();

    assert_eq!(report.spins, 3_000);
    assert_relative_eq!(report.rtp, report.total_won / report.total_staked * 100.0);
    assert_relative_eq!(
        report.rtp,
        report.base_game_rtp + report.free_spins_rtp,
        max_relative = 1e-9
    );
    assert!(report.hit_rate > 0.0 && report.hit_rate < 100.0);
    assert!(report.max_win_ratio >= 0.0);

    let no_win = report.histogram[0].percent;
    assert_relative_eq!(no_win, 100.0 - report.hit_rate, epsilon = 1e-9);
}

#[test]
fn test_gravity_config_from_yaml_file() {
    let mut game = GameConfig::default();
    game.name = "Gravity Candyfall".into();
    game.tumble.refill = RefillMode::Gravity;

    let path = std::env::temp_dir().join(format!("cf-sim-gravity-{}.yaml", std::process::id()));
    std::fs::write(&path, game.to_yaml().unwrap()).unwrap();
    let loaded = GameConfig::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.tumble.refill, RefillMode::Gravity);
    let report = Simulator::new(loaded).unwrap().run(&config(8)).unwrap();
    assert_eq!(report.game, "Gravity Candyfall");
    assert_eq!(report.spins, 3_000);
}

#[test]
fn test_invalid_game_rejected() {
    let mut game = GameConfig::default();
    game.tumble.min_cluster_size = 31;
    assert!(Simulator::new(game).is_err());
}
