//! Summarizes a finished run's final state into a snapshot a caller can
//! inspect without reaching into `Topology` internals.

use crate::topology::Topology;
use sim_types::{Block, BlockHash, MinerId};
use std::collections::HashMap;

/// One miner's outcome at the end of a run.
#[derive(Debug, Clone)]
pub struct MinerReport {
    pub id: MinerId,
    pub blocks_mined: u64,
    pub chain_head: BlockHash,
    pub chain_head_height: u64,
    pub known_blocks: HashMap<BlockHash, Block>,
}

/// The full-network outcome of a run, one entry per miner.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub miners: Vec<MinerReport>,
}

impl SimulationReport {
    pub fn miner(&self, id: MinerId) -> Option<&MinerReport> {
        self.miners.iter().find(|m| m.id == id)
    }
}

pub fn build_report(topology: &Topology) -> SimulationReport {
    let genesis_hash = Block::genesis().hash();

    let mut miners: Vec<MinerReport> = topology
        .miners
        .values()
        .map(|m| {
            let blocks_mined = m
                .blocks
                .values()
                .filter(|b| b.hash() != genesis_hash && b.miner_id == m.id)
                .count() as u64;

            MinerReport {
                id: m.id,
                blocks_mined,
                chain_head: m.chain_head,
                chain_head_height: m.head_height(),
                known_blocks: m.blocks.clone(),
            }
        })
        .collect();

    miners.sort_by_key(|m| m.id);
    SimulationReport { miners }
}
