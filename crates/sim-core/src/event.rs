use sim_types::{Block, BlockHash, LinkId, MinerId};
use std::collections::HashMap;

/// Wire-level action tag. `BlockNew` is carried for schema completeness but
/// the network loop never emits it — only `HeadNew` announces a new tip.
/// The loop ignores it if it ever arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    BlockRequest,
    BlockResponse,
    HeadNew,
    BlockNew,
}

/// An Event's payload: a bare hash for requests/announcements, a full block
/// for responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Hash(BlockHash),
    Block(Block),
}

/// A message in flight on a [`Link`].
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub action: Action,
    pub payload: Payload,
    pub origin: MinerId,
    pub deliver_at: f64,
}

/// A directed channel from one miner to another with a fixed propagation
/// delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub src: MinerId,
    pub dst: MinerId,
    pub delay: f64,
}

/// A miner's outbound routing table. Delivery itself (the timed arrival
/// into a peer's inbox) is modeled by the scheduler's event heap directly —
/// a [`crate::scheduler::Activation::Deliver`] popping off the heap *is*
/// the peer's `receive()` firing, so a socket only needs to remember where
/// its outbound links go, not buffer arrivals itself.
#[derive(Debug, Default)]
pub struct Socket {
    owner: MinerId,
    out_links: HashMap<MinerId, Link>,
}

impl Socket {
    pub fn new(owner: MinerId) -> Self {
        Socket {
            owner,
            out_links: HashMap::new(),
        }
    }

    pub fn owner(&self) -> MinerId {
        self.owner
    }

    /// Idempotent on `(src, dst)`: registering the same destination twice
    /// keeps the first link.
    pub fn add_link(&mut self, link: Link) {
        self.out_links.entry(link.dst).or_insert(link);
    }

    pub fn link_to(&self, dst: MinerId) -> Option<&Link> {
        self.out_links.get(&dst)
    }

    pub fn peers(&self) -> impl Iterator<Item = &Link> {
        self.out_links.values()
    }

    pub fn has_no_links(&self) -> bool {
        self.out_links.is_empty()
    }
}
