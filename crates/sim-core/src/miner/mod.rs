//! # Miner State
//!
//! The three mining strategies share one state shape (`Miner`) and one
//! mining/network loop (driven by [`crate::engine::Engine`]); they only
//! disagree on chain-selection policy, captured in [`Strategy`] and
//! dispatched in the sibling [`policy`] module.

mod policy;

pub use policy::Verdict;

use crate::config::StrategyKind;
use sim_types::{Block, BlockHash, MinerId};
use std::collections::{HashMap, VecDeque};

/// Per-strategy state beyond the shared `blocks`/`chain_head`/`pending`.
#[derive(Debug, Clone)]
pub enum Strategy {
    Honest,
    /// Majority-censor attacker: no extra state, just a different
    /// `add_block`.
    Bad,
    /// Private-branch withholding attacker.
    Selfish {
        public_head: BlockHash,
        private_branch_len: u32,
    },
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Honest => StrategyKind::Honest,
            Strategy::Bad => StrategyKind::Bad,
            Strategy::Selfish { .. } => StrategyKind::Selfish,
        }
    }
}

/// One miner's full local state. `mining_generation` implements a
/// suspendable mining-attempt handle: bumping it invalidates any in-flight
/// [`crate::scheduler::Activation::MiningWakeup`] for this miner, modeling
/// interrupt-and-discard without an actual cancellable task.
#[derive(Debug)]
pub struct Miner {
    pub id: MinerId,
    pub hashrate: f64,
    pub verify_rate: f64,
    pub blocks: HashMap<BlockHash, Block>,
    pub chain_head: BlockHash,
    pub pending: VecDeque<Block>,
    pub strategy: Strategy,
    pub mining_generation: u64,
}

impl Miner {
    /// Construct a miner already seeded with the genesis block.
    pub fn new(id: MinerId, hashrate: f64, verify_rate: f64, strategy_kind: StrategyKind) -> Self {
        let genesis = Block::genesis();
        let genesis_hash = genesis.hash();
        let mut blocks = HashMap::new();
        blocks.insert(genesis_hash, genesis);

        let strategy = match strategy_kind {
            StrategyKind::Honest => Strategy::Honest,
            StrategyKind::Bad => Strategy::Bad,
            StrategyKind::Selfish => Strategy::Selfish {
                public_head: genesis_hash,
                private_branch_len: 0,
            },
        };

        Miner {
            id,
            hashrate,
            verify_rate,
            blocks,
            chain_head: genesis_hash,
            pending: VecDeque::new(),
            strategy,
            mining_generation: 0,
        }
    }

    pub fn height_of(&self, hash: BlockHash) -> Option<u64> {
        self.blocks.get(&hash).map(|b| b.height)
    }

    pub fn head_height(&self) -> u64 {
        self.height_of(self.chain_head)
            .expect("chain_head must always resolve to a known block")
    }

    /// Classify a candidate block. Shared by every strategy: the selfish
    /// miner needs no override because `chain_head` already denotes its
    /// private tip rather than the publicly-known head.
    pub fn verify_block(&self, b: &Block) -> Verdict {
        policy::verify_block(self, b)
    }

    /// Integrate a verified-valid block under this miner's chain-selection
    /// policy. Returns the hash to announce via `HEAD_NEW`, if the policy
    /// decides to announce.
    pub fn add_block(&mut self, b: Block) -> Option<BlockHash> {
        policy::add_block(self, b)
    }
}
