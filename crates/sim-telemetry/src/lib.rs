//! # Telemetry Sink
//!
//! The simulator core calls into a pluggable [`TelemetrySink`] rather than
//! owning any notion of where research data ends up — the task queue,
//! key-value store, and dashboards that would consume these records are
//! external collaborators. The core only needs to know the
//! calls are infallible from its perspective: a sink never returns an error
//! to the caller, and a no-op sink must be a legal choice.
//!
//! This is a narrower concern than the `tracing` logging the rest of the
//! crate emits: logging is for an operator watching a run unfold, the
//! telemetry sink is for a researcher collecting structured records to
//! analyze once the run has finished.

mod memory;
mod null;

pub use memory::{InMemoryTelemetrySink, LinkRecord, MinerRecord};
pub use null::NullTelemetrySink;

use sim_types::{BlockHash, LinkId, MinerId};

/// Per-block record passed to [`TelemetrySink::register_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    pub miner_id: MinerId,
    pub block_hash: BlockHash,
    pub height: u64,
}

/// Receives per-miner, per-block, and per-link records as the simulation
/// runs. Implementations must tolerate being called from a single thread in
/// strict `now`-order; they must never panic on duplicate registrations.
pub trait TelemetrySink {
    /// A miner has been constructed with the given hash power share and
    /// validation throughput.
    fn register_miner(&mut self, id: MinerId, hashrate: f64, verify_rate: f64);

    /// A block has been accepted into some miner's `blocks` store.
    fn register_block(&mut self, miner_id: MinerId, block_hash: BlockHash, height: u64);

    /// A directed link has been wired between two miners.
    fn register_link(&mut self, link_id: LinkId, src: MinerId, dst: MinerId);
}
