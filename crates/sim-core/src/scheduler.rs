//! # Virtual-Time Scheduler
//!
//! A deterministic, single-threaded discrete-event scheduler. It owns the
//! virtual clock `now` and a min-heap of pending activations keyed
//! by `(deliver_at, insertion sequence)`, so that equal-time activations
//! always dispatch in the order they were scheduled, regardless of how the
//! underlying `BinaryHeap` happens to store them.
//!
//! There is no real concurrency here — "tasks" are represented as
//! [`Activation`] values the engine interprets; suspension and resumption
//! are just popping the next activation and calling back into domain logic.

use crate::error::SimError;
use crate::event::Event;
use sim_types::MinerId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A unit of scheduled work. The mining loop's timed sleep and a socket
/// delivery are the only two things the scheduler ever wakes up for; the
/// engine handles interruption out-of-band via generation counters rather
/// than a third activation kind.
#[derive(Debug, Clone)]
pub enum Activation {
    /// A miner's mining delay has elapsed naturally. `generation` lets the
    /// engine detect and silently drop a wakeup that was interrupted before
    /// it fired ("if interrupted before the delay elapses, discard the
    /// in-progress attempt"). `size` is drawn together with the delay when
    /// the attempt starts, not at wake time.
    MiningWakeup {
        miner: MinerId,
        generation: u64,
        size: u64,
    },
    /// An event has arrived at `dst`'s socket.
    Deliver { dst: MinerId, event: Event },
}

struct QueueEntry {
    deliver_at: f64,
    seq: u64,
    activation: Activation,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deliver_at == other.deliver_at && self.seq == other.seq
    }
}
impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both keys so the smallest
        // (deliver_at, seq) pair is always the top of the heap.
        other
            .deliver_at
            .total_cmp(&self.deliver_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// The scheduler's event heap and virtual clock.
pub struct Scheduler {
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<QueueEntry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            now: 0.0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Insert a wake-up at virtual time `t >= now`. Fails if `t < now`.
    pub fn schedule_at(&mut self, t: f64, activation: Activation) -> Result<(), SimError> {
        if t < self.now {
            return Err(SimError::ScheduleInPast { at: t, now: self.now });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(QueueEntry {
            deliver_at: t,
            seq,
            activation,
        });
        Ok(())
    }

    /// Advance the clock directly, for the validation-cost time charges in
    /// `process_pending`. Never decreases `now`.
    pub fn advance_now(&mut self, t: f64) {
        if t > self.now {
            self.now = t;
        }
    }

    /// Pop every activation that shares the earliest scheduled `deliver_at`
    /// (before any clamping against `now`), in insertion order, and advance
    /// `now` to their dispatch time. This is what makes "a locally mined
    /// block and a peer-delivered block arriving at the same instant" a
    /// single batch the engine observes atomically.
    ///
    /// Returns `None` when the queue is empty or the earliest activation is
    /// scheduled beyond `t_end`.
    pub fn next_batch(&mut self, t_end: f64) -> Option<Vec<Activation>> {
        let target = self.queue.peek()?.deliver_at;
        if target > t_end {
            return None;
        }
        let mut batch = Vec::new();
        while let Some(top) = self.queue.peek() {
            if top.deliver_at != target {
                break;
            }
            batch.push(self.queue.pop().expect("just peeked").activation);
        }
        // `now` never decreases even if a prior validation charge pushed it
        // past this activation's originally-scheduled time.
        self.advance_now(target);
        Some(batch)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new()
    }
}
