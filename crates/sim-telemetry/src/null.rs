use crate::TelemetrySink;
use sim_types::{BlockHash, LinkId, MinerId};

/// A sink that discards every record. The default for production runs that
/// only care about the final [`crate::BlockRecord`]-free `SimulationReport`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn register_miner(&mut self, _id: MinerId, _hashrate: f64, _verify_rate: f64) {}

    fn register_block(&mut self, _miner_id: MinerId, _block_hash: BlockHash, _height: u64) {}

    fn register_link(&mut self, _link_id: LinkId, _src: MinerId, _dst: MinerId) {}
}
