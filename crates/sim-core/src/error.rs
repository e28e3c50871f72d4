use sim_types::MinerId;
use thiserror::Error;

/// Fatal errors the engine surfaces to its caller. Malformed peer input
/// (unknown parents, failed validation) is handled locally by dropping or
/// re-queuing the offending block — only scheduler-level and topology-level
/// invariant violations reach this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Attempted to schedule an activation before the current virtual clock.
    #[error("cannot schedule at t={at} when now={now}")]
    ScheduleInPast { at: f64, now: f64 },

    /// A socket tried to send to a destination it has no outbound link for.
    #[error("{src} has no outbound link to {dst}")]
    UnknownPeer { src: MinerId, dst: MinerId },

    /// The topology builder was asked to build zero miners.
    #[error("a simulation requires at least one miner")]
    EmptyTopology,

    /// A link spec referenced a miner index outside the configured roster.
    #[error("link references miner index {index}, but only {num_miners} miners are configured")]
    InvalidLinkIndex { index: usize, num_miners: usize },

    /// Hashrate shares did not sum to 1 within tolerance.
    #[error("hashrates sum to {sum}, expected 1.0 +/- {tolerance}")]
    HashrateImbalance { sum: f64, tolerance: f64 },
}
