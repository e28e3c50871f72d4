//! # Simulator Types
//!
//! Domain entities shared by every miner strategy: the immutable [`Block`],
//! its content-derived [`BlockHash`], the integer ids that identify miners and
//! links, and the fixed network constants from the simulator's design
//! parameters.
//!
//! Hashes here are identity labels, not cryptographic digests — the simulator
//! is explicitly not modeling hash-based proof-of-work security, only which
//! blocks are the "same" block as seen by different miners.

mod block;
mod constants;
mod hash;
mod ids;

pub use block::{Block, GENESIS_HASH};
pub use constants::{DEFAULT_LINK_DELAY, DEFAULT_VERIFY_RATE, MAX_BLOCK_SIZE, NET_BLOCK_RATE};
pub use hash::BlockHash;
pub use ids::{LinkId, MinerId};
