//! Literal end-to-end scenarios from spec.md §8, run against the public
//! `run_simulation` entry point.

use tile_attn_sim::{run_simulation, SimConfig};

fn base_config() -> SimConfig {
    SimConfig {
        core_num: 1,
        sram_capacity: 65536,
        mac_lane: 16,
        mac_num: 32,
        sram_access_latency: 1,
        gb_access_latency: 50,
        gb_sram_bandwidth: 32,
        array_access_and_calculation_latency: 1,
        softmax_cal_latency: 60,
        softmax_throughput: 6,
        layernorm_cal_latency: 10,
        gb_ln_bandwidth: 4,
        ln_sram_bandwidth: 4,
        seq_length: 384,
        embedding_dim: 1024,
        head_num: 16,
        head_id: 0,
        debug_flag: false,
        max_ticks: 50_000_000,
    }
}

#[test]
fn one_core_seq_384_runs_to_completion_with_positive_latency() {
    let cfg = base_config();
    let report = run_simulation(&cfg).unwrap();
    assert_eq!(report.stage_ticks.len(), 8);
    assert!(report.latency_ns > 0.0);
    assert_eq!(report.per_core_utilization.len(), 1);
}

#[test]
fn eight_core_seq_384_runs_to_completion_with_per_core_utilization() {
    let mut cfg = base_config();
    cfg.core_num = 8;
    let report = run_simulation(&cfg).unwrap();
    assert_eq!(report.per_core_utilization.len(), 8);
    assert!(report.latency_ns > 0.0);
}

#[test]
fn seq_64_uses_sram_fast_path_for_attention() {
    let mut cfg = base_config();
    cfg.seq_length = 64;
    assert!(cfg.use_sram_for_attn());
    let report = run_simulation(&cfg).unwrap();
    assert!(report.latency_ns > 0.0);
}

#[test]
fn seq_128_streams_sram2_and_still_completes() {
    let mut cfg = base_config();
    cfg.seq_length = 128;
    let report = run_simulation(&cfg).unwrap();
    assert!(report.latency_ns > 0.0);
}

#[test]
fn seq_192_eight_core_completes() {
    let mut cfg = base_config();
    cfg.seq_length = 192;
    cfg.core_num = 8;
    let report = run_simulation(&cfg).unwrap();
    assert_eq!(report.stage_ticks.len(), 8);
}

#[test]
fn larger_seq_length_increases_total_latency() {
    let mut small = base_config();
    small.seq_length = 64;
    let mut large = base_config();
    large.seq_length = 192;

    let small_report = run_simulation(&small).unwrap();
    let large_report = run_simulation(&large).unwrap();
    assert!(large_report.total_ticks > small_report.total_ticks);
}

#[test]
fn identical_config_yields_identical_tick_count() {
    let cfg = base_config();
    let a = run_simulation(&cfg).unwrap();
    let b = run_simulation(&cfg).unwrap();
    assert_eq!(a.total_ticks, b.total_ticks);
}

#[test]
fn debug_flag_does_not_change_simulated_latency() {
    let mut plain = base_config();
    plain.seq_length = 64;
    let mut debugged = plain.clone();
    debugged.debug_flag = true;

    let plain_report = run_simulation(&plain).unwrap();
    let debug_report = run_simulation(&debugged).unwrap();
    assert_eq!(plain_report.total_ticks, debug_report.total_ticks);
}
