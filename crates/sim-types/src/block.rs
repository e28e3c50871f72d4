use crate::hash::BlockHash;
use crate::ids::MinerId;
use serde::{Deserialize, Serialize};

/// Sentinel parent-hash of the genesis block. No block ever has this as its
/// own identity; it only ever appears in `Block::prev_hash`.
pub const GENESIS_HASH: BlockHash = BlockHash::NIL;

/// An immutable mined block. Identity (`hash`) is a content hash computed
/// once at construction and never recomputed — blocks are never mutated
/// after insertion into a miner's store (data model invariant 2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    hash: BlockHash,
    pub prev_hash: BlockHash,
    pub height: u64,
    pub timestamp: f64,
    pub miner_id: MinerId,
    pub size: u64,
    pub difficulty: f64,
}

impl Block {
    /// Construct a new block, computing and caching its content hash.
    pub fn new(
        prev_hash: BlockHash,
        height: u64,
        timestamp: f64,
        miner_id: MinerId,
        size: u64,
        difficulty: f64,
    ) -> Self {
        let hash = content_hash(prev_hash, height, timestamp, miner_id, size, difficulty);
        Block {
            hash,
            prev_hash,
            height,
            timestamp,
            miner_id,
            size,
            difficulty,
        }
    }

    /// The genesis block: height 0, parented on the sentinel hash.
    pub fn genesis() -> Self {
        Block::new(GENESIS_HASH, 0, 0.0, MinerId(0), 0, 1.0)
    }

    /// This block's content-derived identity.
    pub fn hash(&self) -> BlockHash {
        self.hash
    }
}

fn content_hash(
    prev_hash: BlockHash,
    height: u64,
    timestamp: f64,
    miner_id: MinerId,
    size: u64,
    difficulty: f64,
) -> BlockHash {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(prev_hash.to_string().as_bytes());
    buf.extend_from_slice(&height.to_le_bytes());
    buf.extend_from_slice(&timestamp.to_bits().to_le_bytes());
    buf.extend_from_slice(&miner_id.0.to_le_bytes());
    buf.extend_from_slice(&size.to_le_bytes());
    buf.extend_from_slice(&difficulty.to_bits().to_le_bytes());
    BlockHash::of_bytes(&buf)
}
