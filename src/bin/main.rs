use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use tile_attn_sim::{run_simulation, SimConfig};

/// Cycle-accurate latency/utilization estimator for a tiled matrix
/// accelerator running one Transformer encoder attention head.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Load a base configuration from a JSON file (spec.md §6); CLI flags
    /// below override individual fields on top of it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    core_num: Option<u32>,

    #[arg(long)]
    seq_length: Option<usize>,

    #[arg(long)]
    embedding_dim: Option<usize>,

    #[arg(long)]
    head_num: Option<usize>,

    #[arg(long)]
    max_ticks: Option<u64>,

    /// Print intermediate per-tick state (spec.md §6 `debug_flag`).
    #[arg(long)]
    debug: bool,

    /// Emit the report as JSON instead of a human-readable summary.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_json::from_str::<SimConfig>(&text)?
        }
        None => SimConfig::default(),
    };

    if let Some(v) = cli.core_num {
        cfg.core_num = v;
    }
    if let Some(v) = cli.seq_length {
        cfg.seq_length = v;
    }
    if let Some(v) = cli.embedding_dim {
        cfg.embedding_dim = v;
    }
    if let Some(v) = cli.head_num {
        cfg.head_num = v;
    }
    if let Some(v) = cli.max_ticks {
        cfg.max_ticks = v;
    }
    cfg.debug_flag = cli.debug;

    info!("running simulation with core_num={}", cfg.core_num);
    let report = run_simulation(&cfg)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("total ticks:   {}", report.total_ticks);
        println!("latency:       {:.1} ns", report.latency_ns);
        for (role, ticks) in &report.stage_ticks {
            println!("  {role:?}: {ticks} ticks");
        }
        for (idx, util) in report.per_core_utilization.iter().enumerate() {
            println!("core[{idx}] utilization: {:.2}%", util * 100.0);
        }
    }

    Ok(())
}
