use super::{Miner, Strategy};
use sim_types::{Block, BlockHash, GENESIS_HASH};

/// The three-way classification a candidate block gets on arrival.
/// `UnknownParent` and `Invalid` never become a returned `Err` — the engine
/// handles both locally: re-queue-and-request, or drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    UnknownParent,
    Invalid,
}

/// Shared across every strategy: a self-mined extension is checked against
/// `chain_head`, which for the selfish miner is its private tip, so no
/// strategy needs a bespoke override here.
pub fn verify_block(miner: &Miner, b: &Block) -> Verdict {
    let Some(parent) = miner.blocks.get(&b.prev_hash) else {
        return Verdict::UnknownParent;
    };
    if b.height != parent.height + 1 {
        return Verdict::Invalid;
    }
    if b.miner_id == miner.id && b.prev_hash != miner.chain_head {
        return Verdict::Invalid;
    }
    Verdict::Valid
}

pub fn add_block(miner: &mut Miner, b: Block) -> Option<BlockHash> {
    match miner.strategy {
        Strategy::Honest => honest_add_block(miner, b),
        Strategy::Bad => bad_add_block(miner, b),
        Strategy::Selfish { .. } => selfish_add_block(miner, b),
    }
}

/// Longest-chain rule, first-seen wins on ties.
fn honest_add_block(miner: &mut Miner, b: Block) -> Option<BlockHash> {
    let hash = b.hash();
    let new_height = b.height;
    let current_head_height = miner.head_height();
    miner.blocks.insert(hash, b);

    if miner.chain_head == GENESIS_HASH {
        // Dead in practice (genesis is always pre-seeded at construction)
        // but preserved literally per the source's own defensive check.
        miner.chain_head = hash;
        None
    } else if new_height > current_head_height {
        miner.chain_head = hash;
        Some(hash)
    } else {
        None
    }
}

/// Identical to the honest rule except a foreign block is stored (and so
/// can still be served on `BLOCK_REQUEST`) but never adopted as head.
fn bad_add_block(miner: &mut Miner, b: Block) -> Option<BlockHash> {
    let hash = b.hash();
    let is_self = b.miner_id == miner.id;
    let new_height = b.height;
    let current_head_height = miner.head_height();
    miner.blocks.insert(hash, b);

    if !is_self {
        return None;
    }

    if miner.chain_head == GENESIS_HASH {
        miner.chain_head = hash;
        None
    } else if new_height > current_head_height {
        miner.chain_head = hash;
        Some(hash)
    } else {
        None
    }
}

/// Withhold self-mined blocks on a private branch, release per the classic
/// "lead=2" rule, and drip-leak the private advantage once the public chain
/// gets close.
fn selfish_add_block(miner: &mut Miner, b: Block) -> Option<BlockHash> {
    let hash = b.hash();
    let is_self = b.miner_id == miner.id;
    let new_height = b.height;

    let (public_head, _) = match miner.strategy {
        Strategy::Selfish {
            public_head,
            private_branch_len,
        } => (public_head, private_branch_len),
        _ => unreachable!("selfish_add_block called on a non-selfish miner"),
    };

    let current_private_height = miner.head_height();
    let public_height = miner
        .height_of(public_head)
        .expect("public_head must always resolve to a known block");
    let delta_before = current_private_height as i64 - public_height as i64;

    miner.blocks.insert(hash, b);

    if is_self && new_height > current_private_height {
        miner.chain_head = hash;
        let mut announce = None;
        if let Strategy::Selfish {
            private_branch_len, ..
        } = &mut miner.strategy
        {
            *private_branch_len += 1;
            if delta_before == 0 && *private_branch_len == 2 {
                announce = Some(hash);
                *private_branch_len = 0;
            }
        }
        return announce;
    }

    if !is_self && new_height > public_height {
        if let Strategy::Selfish { public_head, .. } = &mut miner.strategy {
            *public_head = hash;
        }

        return match delta_before {
            d if d <= 0 => {
                miner.chain_head = hash;
                if let Strategy::Selfish {
                    private_branch_len, ..
                } = &mut miner.strategy
                {
                    *private_branch_len = 0;
                }
                None
            }
            1 => Some(miner.chain_head),
            2 => {
                if let Strategy::Selfish {
                    private_branch_len, ..
                } = &mut miner.strategy
                {
                    *private_branch_len = 0;
                }
                Some(miner.chain_head)
            }
            _ => {
                let adj: u64 = if delta_before >= 6 { 1 } else { 0 };
                let target_height = new_height + adj;
                Some(ancestor_at_height(miner, miner.chain_head, target_height))
            }
        };
    }

    None
}

/// Walk the private chain backward from `from` until reaching the block at
/// `target_height` (used by the drip-leak branch above).
fn ancestor_at_height(miner: &Miner, mut hash: BlockHash, target_height: u64) -> BlockHash {
    loop {
        let block = miner
            .blocks
            .get(&hash)
            .expect("private chain ancestors must be locally known");
        if block.height <= target_height {
            return hash;
        }
        hash = block.prev_hash;
    }
}
