/// Network-wide block discovery rate: one block every 600 virtual seconds,
/// summed across all miners' hashrate shares.
pub const NET_BLOCK_RATE: f64 = 1.0 / 600.0;

/// Upper bound on a mined block's size, in bytes.
pub const MAX_BLOCK_SIZE: u64 = 1 << 20; // 1 MiB

/// Default per-miner validation throughput, in bytes per virtual second.
pub const DEFAULT_VERIFY_RATE: f64 = 200.0 * 1024.0;

/// Default propagation delay on a link, in virtual seconds.
pub const DEFAULT_LINK_DELAY: f64 = 0.02;
