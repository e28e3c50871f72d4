//! # Topology Builder
//!
//! Constructs miners and wires them together with [`Link`]s. Two modes: a
//! symmetric full mesh at a single delay (the common case, and what
//! `simulate()`'s convenience entry point uses), or an explicit asymmetric
//! link list for topologies such as a line of miners joined by one
//! long-delay link.

use crate::config::{LinkSpec, MinerSpec, SimulationConfig};
use crate::error::SimError;
use crate::event::{Link, Socket};
use crate::ids::{IdAllocator, IdNamespace};
use crate::miner::Miner;
use sim_telemetry::TelemetrySink;
use sim_types::{LinkId, MinerId};
use std::collections::HashMap;

/// The wired-up, not-yet-run state: one [`Miner`] and one [`Socket`] per
/// participant.
pub struct Topology {
    pub miners: HashMap<MinerId, Miner>,
    pub sockets: HashMap<MinerId, Socket>,
}

pub fn build(
    config: &SimulationConfig,
    telemetry: &mut dyn TelemetrySink,
    id_alloc: &mut dyn IdAllocator,
) -> Result<Topology, SimError> {
    if config.miners.is_empty() {
        return Err(SimError::EmptyTopology);
    }
    let sum: f64 = config.miners.iter().map(|m| m.hashrate).sum();
    if (sum - 1.0).abs() > 1e-6 {
        return Err(SimError::HashrateImbalance {
            sum,
            tolerance: 1e-6,
        });
    }

    let mut index_to_id = Vec::with_capacity(config.miners.len());
    let mut miners = HashMap::new();
    let mut sockets = HashMap::new();

    for spec in &config.miners {
        let id = MinerId(id_alloc.next_id(IdNamespace::Miners));
        index_to_id.push(id);
        telemetry.register_miner(id, spec.hashrate, spec.verify_rate);
        miners.insert(id, Miner::new(id, spec.hashrate, spec.verify_rate, spec.strategy));
        sockets.insert(id, Socket::new(id));
    }

    let link_specs = if config.links.is_empty() {
        full_mesh(config.miners.len(), config.default_link_delay)
    } else {
        config.links.clone()
    };

    for spec in link_specs {
        wire(&mut sockets, &index_to_id, spec, telemetry, id_alloc)?;
    }

    Ok(Topology { miners, sockets })
}

fn full_mesh(n: usize, delay: f64) -> Vec<LinkSpec> {
    let mut links = Vec::with_capacity(n * n.saturating_sub(1));
    for src in 0..n {
        for dst in 0..n {
            if src != dst {
                links.push(LinkSpec { src, dst, delay });
            }
        }
    }
    links
}

fn wire(
    sockets: &mut HashMap<MinerId, Socket>,
    index_to_id: &[MinerId],
    spec: LinkSpec,
    telemetry: &mut dyn TelemetrySink,
    id_alloc: &mut dyn IdAllocator,
) -> Result<(), SimError> {
    let num_miners = index_to_id.len();
    let src_id = *index_to_id
        .get(spec.src)
        .ok_or(SimError::InvalidLinkIndex { index: spec.src, num_miners })?;
    let dst_id = *index_to_id
        .get(spec.dst)
        .ok_or(SimError::InvalidLinkIndex { index: spec.dst, num_miners })?;

    let link_id = LinkId(id_alloc.next_id(IdNamespace::Links));
    let link = Link {
        id: link_id,
        src: src_id,
        dst: dst_id,
        delay: spec.delay,
    };
    sockets
        .get_mut(&src_id)
        .expect("src just inserted")
        .add_link(link);
    telemetry.register_link(link_id, src_id, dst_id);
    Ok(())
}
