//! # Simulation Engine
//!
//! Ties the [`crate::scheduler::Scheduler`], the built [`Topology`], a
//! telemetry sink, and a seeded RNG together into the run loop: batches of
//! activations pop off the event heap, the mining loop and network loop
//! dispatch on them, and any miner that saw new blocks this batch gets its
//! mining attempt interrupted and restarted after `process_pending` settles.

use crate::error::SimError;
use crate::event::{Action, Payload};
use crate::miner::Verdict;
use crate::scheduler::{Activation, Scheduler};
use crate::topology::{self, Topology};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp};
use sim_telemetry::TelemetrySink;
use sim_types::{Block, MinerId, MAX_BLOCK_SIZE, NET_BLOCK_RATE};
use std::collections::HashMap;

pub struct Engine<'a> {
    scheduler: Scheduler,
    topology: Topology,
    telemetry: &'a mut dyn TelemetrySink,
    rng: ChaCha8Rng,
    /// Blocks that landed on a miner's doorstep this batch, either self-mined
    /// or delivered, keyed by the miner they arrived for. Cleared and
    /// refilled once per batch.
    arrived_this_batch: HashMap<MinerId, Vec<Block>>,
}

impl<'a> Engine<'a> {
    pub fn new(
        config: &crate::config::SimulationConfig,
        telemetry: &'a mut dyn TelemetrySink,
        id_alloc: &mut dyn crate::ids::IdAllocator,
    ) -> Result<Self, SimError> {
        let topology = topology::build(config, telemetry, id_alloc)?;
        let scheduler = Scheduler::new();
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut engine = Engine {
            scheduler,
            topology,
            telemetry,
            rng,
            arrived_this_batch: HashMap::new(),
        };

        let miner_ids: Vec<MinerId> = engine.topology.miners.keys().copied().collect();
        for id in miner_ids {
            engine
                .start_mining_attempt(id)
                .expect("scheduling at t=0 on a fresh scheduler cannot fail");
        }

        Ok(engine)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Drive the scheduler until no activation remains at or before
    /// `duration_seconds`.
    pub fn run(&mut self, duration_seconds: f64) {
        loop {
            self.arrived_this_batch.clear();
            let Some(batch) = self.scheduler.next_batch(duration_seconds) else {
                break;
            };

            for activation in batch {
                match activation {
                    Activation::MiningWakeup {
                        miner,
                        generation,
                        size,
                    } => self.handle_mining_wakeup(miner, generation, size),
                    Activation::Deliver { dst, event } => self.handle_deliver(dst, event),
                }
            }

            let touched: Vec<MinerId> = self.arrived_this_batch.keys().copied().collect();
            for miner_id in touched {
                self.integrate_arrivals(miner_id);
            }
        }
    }

    /// Draw a fresh block size and inter-arrival delay and schedule this
    /// miner's next natural wake-up. Both are drawn together, at attempt
    /// start, from the same RNG stream — not re-drawn at wake time.
    fn start_mining_attempt(&mut self, miner_id: MinerId) -> Result<(), SimError> {
        let miner = &self.topology.miners[&miner_id];
        let hashrate = miner.hashrate;
        let generation = miner.mining_generation;
        let now = self.scheduler.now();

        let rate = hashrate * NET_BLOCK_RATE;
        let delay = if rate > 0.0 {
            Exp::new(rate)
                .expect("positive hashrate implies a positive exponential rate")
                .sample(&mut self.rng)
        } else {
            f64::INFINITY
        };
        let size = self.rng.gen_range(1..=MAX_BLOCK_SIZE);

        if delay.is_finite() {
            self.scheduler.schedule_at(
                now + delay,
                Activation::MiningWakeup {
                    miner: miner_id,
                    generation,
                    size,
                },
            )?;
        }
        Ok(())
    }

    fn handle_mining_wakeup(&mut self, miner_id: MinerId, generation: u64, size: u64) {
        let miner = &self.topology.miners[&miner_id];
        if miner.mining_generation != generation {
            tracing::trace!(miner = %miner_id, "discarding interrupted mining attempt");
            return;
        }

        let now = self.scheduler.now();
        let prev = miner.chain_head;
        let height = miner.head_height() + 1;
        let block = Block::new(prev, height, now, miner_id, size, 1.0);
        tracing::debug!(miner = %miner_id, height, now, "mined a block");
        self.arrived_this_batch.entry(miner_id).or_default().push(block);
    }

    fn handle_deliver(&mut self, dst: MinerId, event: crate::event::Event) {
        match event.action {
            Action::BlockRequest => {
                if let Payload::Hash(h) = event.payload {
                    let known = self.topology.miners[&dst].blocks.get(&h).cloned();
                    if let Some(block) = known {
                        if let Err(err) =
                            self.send_event(dst, event.origin, Action::BlockResponse, Payload::Block(block))
                        {
                            tracing::warn!(?err, "dropping block response");
                        }
                    }
                }
            }
            Action::BlockResponse => {
                if let Payload::Block(block) = event.payload {
                    self.arrived_this_batch.entry(dst).or_default().push(block);
                }
            }
            Action::HeadNew => {
                if let Payload::Hash(h) = event.payload {
                    let known = self.topology.miners[&dst].blocks.contains_key(&h);
                    if !known {
                        self.broadcast(dst, Action::BlockRequest, Payload::Hash(h));
                    }
                }
            }
            Action::BlockNew => {
                tracing::trace!(miner = %dst, "ignoring BlockNew: never emitted by this network loop");
            }
        }
    }

    /// Interrupt the in-flight mining attempt, feed this batch's arrivals
    /// into `pending`, run validation, and restart mining with a fresh draw.
    fn integrate_arrivals(&mut self, miner_id: MinerId) {
        let arrivals = self.arrived_this_batch.remove(&miner_id).unwrap_or_default();

        let miner = self.topology.miners.get_mut(&miner_id).unwrap();
        miner.mining_generation = miner.mining_generation.wrapping_add(1);
        miner.pending.extend(arrivals);

        self.process_pending(miner_id);

        if let Err(err) = self.start_mining_attempt(miner_id) {
            tracing::warn!(?err, miner = %miner_id, "failed to restart mining attempt");
        }
    }

    /// Validate every block currently queued for `miner_id`, in order,
    /// charging `size / verify_rate` virtual seconds per block before
    /// classifying it. Valid blocks are integrated immediately — so a later
    /// block in the same batch sees chain-head updates from an earlier one
    /// in the same pass. Blocks with an unknown parent stay queued and
    /// trigger a `BlockRequest`; invalid blocks are dropped.
    fn process_pending(&mut self, miner_id: MinerId) {
        let verify_rate = self.topology.miners[&miner_id].verify_rate;
        let pending = std::mem::take(&mut self.topology.miners.get_mut(&miner_id).unwrap().pending);
        let mut still_pending = std::collections::VecDeque::new();

        for block in pending {
            let cost = block.size as f64 / verify_rate;
            self.scheduler.advance_now(self.scheduler.now() + cost);

            let verdict = self.topology.miners[&miner_id].verify_block(&block);
            match verdict {
                Verdict::Valid => {
                    let block_hash = block.hash();
                    let height = block.height;
                    let announce = self.topology.miners.get_mut(&miner_id).unwrap().add_block(block);
                    self.telemetry.register_block(miner_id, block_hash, height);
                    if let Some(head) = announce {
                        tracing::debug!(miner = %miner_id, height, "adopted new chain head");
                        self.broadcast(miner_id, Action::HeadNew, Payload::Hash(head));
                    }
                }
                Verdict::UnknownParent => {
                    let prev_hash = block.prev_hash;
                    still_pending.push_back(block);
                    self.broadcast(miner_id, Action::BlockRequest, Payload::Hash(prev_hash));
                }
                Verdict::Invalid => {
                    tracing::trace!(miner = %miner_id, "dropping invalid block");
                }
            }
        }

        self.topology.miners.get_mut(&miner_id).unwrap().pending = still_pending;
    }

    fn broadcast(&mut self, miner_id: MinerId, action: Action, payload: Payload) {
        let now = self.scheduler.now();
        let peers: Vec<crate::event::Link> = self.topology.sockets[&miner_id].peers().copied().collect();
        for link in peers {
            let event = crate::event::Event {
                action,
                payload: payload.clone(),
                origin: miner_id,
                deliver_at: now + link.delay,
            };
            let _ = self
                .scheduler
                .schedule_at(now + link.delay, Activation::Deliver { dst: link.dst, event });
        }
    }

    fn send_event(&mut self, src: MinerId, dst: MinerId, action: Action, payload: Payload) -> Result<(), SimError> {
        let now = self.scheduler.now();
        let link = self.topology.sockets[&src].link_to(dst).copied();
        match link {
            Some(link) => {
                let event = crate::event::Event {
                    action,
                    payload,
                    origin: src,
                    deliver_at: now + link.delay,
                };
                self.scheduler
                    .schedule_at(now + link.delay, Activation::Deliver { dst, event })
            }
            None => Err(SimError::UnknownPeer { src, dst }),
        }
    }
}
