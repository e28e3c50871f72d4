use serde::{Deserialize, Serialize};
use std::fmt;

/// 128-bit FNV-1a offset basis / prime, per the reference algorithm.
const FNV_OFFSET_BASIS: u128 = 0x6c62272e07bb014262b821756295c58d;
const FNV_PRIME: u128 = 0x0000000001000000000000000000013b;

fn fnv1a_128(bytes: &[u8]) -> u128 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u128::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Content-derived block identity: a 128-bit FNV-1a digest of a block's
/// fields, not a cryptographic hash. Two blocks with identical fields collide
/// on this hash by construction, which is the behavior the simulator relies
/// on for block identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHash(u128);

impl BlockHash {
    /// Sentinel identity used for a block's missing parent (the genesis
    /// block's `prev_hash`).
    pub const NIL: BlockHash = BlockHash(0);

    /// Hash arbitrary serialized block content.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        BlockHash(fnv1a_128(bytes))
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}
