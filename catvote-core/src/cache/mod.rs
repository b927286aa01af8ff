//! In-memory cache of the current user's votes.
//!
//! The cache is an ordered sequence of votes scoped to one identity. It
//! supports optimistic insertion with whole-cache snapshot rollback, the
//! temporary-to-confirmed swap performed during reconciliation, and a
//! staleness flag that routes the next read through the gateway.

use catvote_shared::types::{Vote, VoteId};

/// Opaque token capturing the cache state at optimistic-insert time.
///
/// Rollback restores the entire captured state. A concurrent unrelated
/// write made between the snapshot and the rollback is clobbered; this
/// is the accepted tradeoff for a single-identity, single-session cache.
#[derive(Debug)]
pub struct CacheSnapshot {
    votes: Vec<Vote>,
    stale: bool,
}

/// Ordered collection of one user's votes, keyed by image id.
///
/// Mutated only by the voting coordinator; everything else reads.
#[derive(Debug, Default)]
pub struct VoteCache {
    votes: Vec<Vote>,
    stale: bool,
}

impl VoteCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self {
            votes: Vec::new(),
            stale: false,
        }
    }

    /// Returns the vote for the given image, if any.
    pub fn get(&self, image_id: &str) -> Option<&Vote> {
        self.votes.iter().find(|vote| vote.image_id == image_id)
    }

    /// All cached votes, in insertion order.
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Appends an optimistic vote and returns a snapshot of the prior
    /// state for rollback.
    pub fn insert_optimistic(&mut self, vote: Vote) -> CacheSnapshot {
        let snapshot = CacheSnapshot {
            votes: self.votes.clone(),
            stale: self.stale,
        };
        self.votes.push(vote);
        snapshot
    }

    /// Restores the exact state captured at `insert_optimistic` time.
    pub fn rollback(&mut self, snapshot: CacheSnapshot) {
        self.votes = snapshot.votes;
        self.stale = snapshot.stale;
    }

    /// Removes the entry with the given temporary id and appends the
    /// confirmed vote, preserving the relative order of other entries.
    pub fn replace(&mut self, temp_id: &VoteId, confirmed: Vote) {
        self.votes.retain(|vote| &vote.id != temp_id);
        self.votes.push(confirmed);
    }

    /// Marks the cache stale; the next read should refetch from the
    /// gateway rather than serve cached state.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Whether the next read should reconcile with the server.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Rebuilds the cache wholesale from server-confirmed votes and
    /// clears staleness.
    pub fn reload(&mut self, votes: Vec<Vote>) {
        self.votes = votes;
        self.stale = false;
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}
