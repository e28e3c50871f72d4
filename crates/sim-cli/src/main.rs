//! # sim-cli
//!
//! Command-line runner for the PoW gossip simulator. Wires up a topology
//! from flags, runs it to completion, and prints a per-miner summary —
//! either human-readable or as JSON for piping into analysis tooling.
//!
//! This binary is the "external collaborator" the core explicitly refuses
//! to depend on: CLI parsing, logging setup, and process exit codes live
//! here, not in `sim-core`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use sim_core::{InMemoryIdAllocator, SimulationConfig, StrategyKind};
use sim_telemetry::NullTelemetrySink;
use tracing::info;

/// Run a discrete-event simulation of a proof-of-work gossip network.
#[derive(Parser, Debug)]
#[command(name = "sim-cli")]
#[command(about = "Discrete-event simulator for a PoW mining network")]
struct Args {
    /// Number of miners in the network.
    #[arg(short = 'n', long, default_value_t = 3)]
    miners: usize,

    /// Simulation duration, in virtual days.
    #[arg(short, long, default_value_t = 1.0)]
    duration_days: f64,

    /// Chain-selection strategy applied to miner 0; every other miner is honest.
    #[arg(short, long, default_value = "honest")]
    strategy: String,

    /// Hashrate share for miner 0 when `strategy` is not `honest` (remaining
    /// share is split evenly across the other miners).
    #[arg(long, default_value_t = 0.4)]
    deviant_hashrate: f64,

    /// Seed for every random draw. Two runs with the same seed and topology
    /// are bit-for-bit reproducible.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Propagation delay on every link, in virtual seconds.
    #[arg(long, default_value_t = sim_types::DEFAULT_LINK_DELAY)]
    link_delay: f64,

    /// Print the report as JSON instead of a human-readable table.
    #[arg(long)]
    json: bool,

    /// Verbosity: repeat for more detail (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct MinerSummary {
    id: u64,
    blocks_mined: u64,
    chain_head: String,
    chain_head_height: u64,
    known_blocks: usize,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    miners: Vec<MinerSummary>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let strategy: StrategyKind = args
        .strategy
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("invalid --strategy")?;

    if args.miners == 0 {
        bail!("--miners must be at least 1");
    }

    let config = build_config(&args, strategy)?;

    info!(
        miners = args.miners,
        duration_days = args.duration_days,
        strategy = args.strategy,
        seed = args.seed,
        "starting simulation"
    );

    let mut telemetry = NullTelemetrySink;
    let mut id_alloc = InMemoryIdAllocator::new();
    let report = sim_core::simulate_with(&config, &mut telemetry, &mut id_alloc)?;

    info!(miners = report.miners.len(), "simulation complete");

    let summary = RunSummary {
        miners: report
            .miners
            .iter()
            .map(|m| MinerSummary {
                id: m.id.0,
                blocks_mined: m.blocks_mined,
                chain_head: m.chain_head.to_string(),
                chain_head_height: m.chain_head_height,
                known_blocks: m.known_blocks.len(),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_table(&summary);
    }

    Ok(())
}

fn build_config(args: &Args, strategy: StrategyKind) -> Result<SimulationConfig> {
    if matches!(strategy, StrategyKind::Honest) {
        return Ok(
            SimulationConfig::uniform(args.miners, args.duration_days, strategy, args.seed)
                .with_link_delay(args.link_delay),
        );
    }

    if args.miners < 2 {
        bail!("a deviant strategy needs at least 2 miners");
    }
    if !(0.0..=1.0).contains(&args.deviant_hashrate) {
        bail!("--deviant-hashrate must be in [0, 1]");
    }

    let remaining = args.miners - 1;
    let rest_share = (1.0 - args.deviant_hashrate) / remaining as f64;
    let mut miners = vec![sim_core::MinerSpec {
        hashrate: args.deviant_hashrate,
        verify_rate: sim_types::DEFAULT_VERIFY_RATE,
        strategy,
    }];
    miners.extend((0..remaining).map(|_| sim_core::MinerSpec::honest(rest_share)));

    Ok(SimulationConfig {
        miners,
        duration_seconds: args.duration_days * 86_400.0,
        seed: args.seed,
        default_link_delay: args.link_delay,
        links: Vec::new(),
    })
}

fn print_table(summary: &RunSummary) {
    println!("{:<10} {:>14} {:>12} {:>14}", "miner", "blocks_mined", "head_height", "known_blocks");
    for m in &summary.miners {
        println!(
            "{:<10} {:>14} {:>12} {:>14}",
            m.id, m.blocks_mined, m.chain_head_height, m.known_blocks
        );
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "sim_cli=info,sim_core=info",
        1 => "sim_cli=debug,sim_core=debug",
        _ => "sim_cli=trace,sim_core=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
