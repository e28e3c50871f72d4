//! # Simulator Core
//!
//! The virtual-time discrete-event engine that drives a network of miners
//! through a proof-of-work gossip simulation: a [`scheduler::Scheduler`], a
//! [`topology::Topology`] of wired-up [`miner::Miner`]s, and an
//! [`engine::Engine`] that batches activations and runs the mining and
//! network loops against them.
//!
//! `simulate` is the small convenience entry point for an equal-hashrate
//! honest mesh with one deviating miner; `simulate_with` is the richer
//! entry point tests and callers with custom topologies use directly.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod ids;
pub mod miner;
pub mod report;
pub mod scheduler;
pub mod topology;

pub use config::{LinkSpec, MinerSpec, SimulationConfig, StrategyKind};
pub use engine::Engine;
pub use error::SimError;
pub use ids::{IdAllocator, IdNamespace, InMemoryIdAllocator};
pub use report::{MinerReport, SimulationReport};

use sim_telemetry::{NullTelemetrySink, TelemetrySink};

/// Run an equal-hashrate, fully-meshed network of `num_miners` honest
/// miners for `duration_days` virtual days, with `strategy` applied to one
/// miner, reseeded deterministically from `seed`.
pub fn simulate(
    num_miners: usize,
    duration_days: f64,
    strategy: StrategyKind,
    seed: u64,
) -> Result<SimulationReport, SimError> {
    let config = SimulationConfig::uniform(num_miners, duration_days, strategy, seed);
    let mut telemetry = NullTelemetrySink;
    let mut id_alloc = InMemoryIdAllocator::new();
    simulate_with(&config, &mut telemetry, &mut id_alloc)
}

/// Run a fully custom topology, routing telemetry and id allocation through
/// caller-supplied collaborators.
pub fn simulate_with(
    config: &SimulationConfig,
    telemetry: &mut dyn TelemetrySink,
    id_alloc: &mut dyn IdAllocator,
) -> Result<SimulationReport, SimError> {
    let mut engine = Engine::new(config, telemetry, id_alloc)?;
    engine.run(config.duration_seconds);
    Ok(report::build_report(engine.topology()))
}
