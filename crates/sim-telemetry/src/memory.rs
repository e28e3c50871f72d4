use crate::{BlockRecord, TelemetrySink};
use sim_types::{BlockHash, LinkId, MinerId};

/// A miner's static registration record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinerRecord {
    pub id: MinerId,
    pub hashrate: f64,
    pub verify_rate: f64,
}

/// A link's static registration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: LinkId,
    pub src: MinerId,
    pub dst: MinerId,
}

/// Collects every record into memory. Useful for tests and for building a
/// `SimulationReport` without a separate telemetry backend.
#[derive(Debug, Default)]
pub struct InMemoryTelemetrySink {
    pub miners: Vec<MinerRecord>,
    pub blocks: Vec<BlockRecord>,
    pub links: Vec<LinkRecord>,
}

impl InMemoryTelemetrySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetrySink for InMemoryTelemetrySink {
    fn register_miner(&mut self, id: MinerId, hashrate: f64, verify_rate: f64) {
        self.miners.push(MinerRecord {
            id,
            hashrate,
            verify_rate,
        });
    }

    fn register_block(&mut self, miner_id: MinerId, block_hash: BlockHash, height: u64) {
        self.blocks.push(BlockRecord {
            miner_id,
            block_hash,
            height,
        });
    }

    fn register_link(&mut self, link_id: LinkId, src: MinerId, dst: MinerId) {
        self.links.push(LinkRecord {
            id: link_id,
            src,
            dst,
        });
    }
}
