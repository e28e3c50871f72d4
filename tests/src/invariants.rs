//! The quantified invariants and idempotence laws from the design doc,
//! exercised against the public `simulate_with` entry point and directly
//! against `sim_core::miner::Miner` where the property is about a single
//! `add_block` call rather than a full run.

#[cfg(test)]
mod tests {
    use sim_core::config::StrategyKind;
    use sim_core::miner::Miner;
    use sim_core::{InMemoryIdAllocator, MinerSpec, SimulationConfig};
    use sim_telemetry::NullTelemetrySink;
    use sim_types::{Block, MinerId};

    fn run(config: &SimulationConfig) -> sim_core::SimulationReport {
        let mut telemetry = NullTelemetrySink;
        let mut id_alloc = InMemoryIdAllocator::new();
        sim_core::simulate_with(config, &mut telemetry, &mut id_alloc).expect("simulation run")
    }

    /// Invariant 1: every non-genesis block whose parent a miner knows
    /// satisfies `height == parent.height + 1`.
    #[test]
    fn parent_height_invariant_holds_after_a_run() {
        let config = SimulationConfig::uniform(3, 0.5, StrategyKind::Honest, 11);
        let report = run(&config);

        let genesis_hash = Block::genesis().hash();
        for miner in &report.miners {
            for block in miner.known_blocks.values() {
                if block.hash() == genesis_hash {
                    continue;
                }
                if let Some(parent) = miner.known_blocks.get(&block.prev_hash) {
                    assert_eq!(
                        block.height,
                        parent.height + 1,
                        "miner {:?} holds a block at the wrong height relative to its parent",
                        miner.id
                    );
                }
            }
        }
    }

    /// Invariant 2 (scoped to honest miners, per the data model note):
    /// `chain_head` must be the maximal height reachable via a fully-linked
    /// ancestor path from any block the miner knows.
    #[test]
    fn honest_chain_head_is_the_locally_maximal_fully_linked_height() {
        let config = SimulationConfig::uniform(3, 0.5, StrategyKind::Honest, 17);
        let report = run(&config);

        for miner in &report.miners {
            let head_height = miner.chain_head_height;
            for block in miner.known_blocks.values() {
                if fully_linked(&miner.known_blocks, block.hash()) {
                    assert!(
                        block.height <= head_height,
                        "miner {:?} knows a fully-linked block taller than its own chain head",
                        miner.id
                    );
                }
            }
        }
    }

    fn fully_linked(blocks: &std::collections::HashMap<sim_types::BlockHash, Block>, mut hash: sim_types::BlockHash) -> bool {
        let genesis_hash = Block::genesis().hash();
        loop {
            if hash == genesis_hash {
                return true;
            }
            let Some(block) = blocks.get(&hash) else {
                return false;
            };
            hash = block.prev_hash;
        }
    }

    /// Invariant 4: hashrate shares must sum to 1 within tolerance, enforced
    /// at topology-build time.
    #[test]
    fn hashrate_imbalance_is_rejected() {
        let config = SimulationConfig {
            miners: vec![MinerSpec::honest(0.5), MinerSpec::honest(0.4)],
            duration_seconds: 10.0,
            seed: 1,
            default_link_delay: 0.02,
            links: Vec::new(),
        };
        let mut telemetry = NullTelemetrySink;
        let mut id_alloc = InMemoryIdAllocator::new();
        let err = sim_core::simulate_with(&config, &mut telemetry, &mut id_alloc).unwrap_err();
        assert!(matches!(err, sim_core::SimError::HashrateImbalance { .. }));
    }

    /// `add_block` is idempotent: applying the identical block twice leaves
    /// `blocks` and `chain_head` unchanged after the first application.
    #[test]
    fn add_block_is_idempotent() {
        let mut miner = Miner::new(MinerId(0), 1.0, 1000.0, StrategyKind::Honest);
        let genesis_hash = miner.chain_head;
        let block = Block::new(genesis_hash, 1, 0.0, MinerId(0), 512, 1.0);

        let block_hash = block.hash();
        let first = miner.add_block(block.clone());
        assert_eq!(first, Some(block_hash), "first application should announce the new head");
        let head_after_first = miner.chain_head;
        let blocks_after_first = miner.blocks.len();

        let second = miner.add_block(block);
        assert_eq!(second, None, "re-applying an already-adopted block announces nothing new");
        assert_eq!(miner.chain_head, head_after_first);
        assert_eq!(miner.blocks.len(), blocks_after_first);
    }

    /// A boundary case: a single miner with no peers mines indefinitely,
    /// advancing its own chain head by exactly one per mined block, with
    /// zero orphans (nothing to fork against).
    #[test]
    fn single_miner_no_links_advances_monotonically() {
        let config = SimulationConfig::uniform(1, 1.0, StrategyKind::Honest, 3);
        let report = run(&config);

        let miner = &report.miners[0];
        assert_eq!(miner.blocks_mined, miner.chain_head_height);
        assert_eq!(miner.known_blocks.len() as u64, miner.chain_head_height + 1); // + genesis
    }
}
