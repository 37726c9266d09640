//! Pending-suppression table.
//!
//! Every write the engine makes is registered here first, as one token per
//! expected mutation record. A record that finds a matching token consumes it
//! and is dropped; anything else is an external change.
//!
//! Tokens expire by generation. [`SuppressionTable::advance`] runs at each
//! scheduling boundary (the end of a notify pass) and evicts tokens that
//! were already pending at the previous boundary, so a token outlives at most
//! one delivery of the records it was meant for.

use std::collections::HashMap;

use dom::NodeId;
use log::trace;

/// What kind of record a write will produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteKind {
    /// An inline style write on the element.
    Style,
    /// Removal of the element from its parent.
    Removal,
}

#[derive(Debug)]
struct Pending {
    tokens: u32,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct SuppressionTable {
    entries: HashMap<(NodeId, WriteKind), Pending>,
    generation: u64,
}

impl SuppressionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect one more record of `kind` on `node`.
    pub fn register(&mut self, node: NodeId, kind: WriteKind) {
        let generation = self.generation;
        let entry = self
            .entries
            .entry((node, kind))
            .or_insert(Pending { tokens: 0, generation });
        entry.tokens += 1;
        entry.generation = generation;
    }

    /// Consume one token for `node`/`kind`. Returns `true` if the record is
    /// the engine's own and should be ignored.
    pub fn consume(&mut self, node: NodeId, kind: WriteKind) -> bool {
        let Some(entry) = self.entries.get_mut(&(node, kind)) else {
            return false;
        };
        entry.tokens -= 1;
        if entry.tokens == 0 {
            self.entries.remove(&(node, kind));
        }
        true
    }

    pub fn is_pending(&self, node: NodeId, kind: WriteKind) -> bool {
        self.entries.contains_key(&(node, kind))
    }

    /// Scheduling boundary: evict tokens older than the current generation,
    /// then start a new one.
    pub fn advance(&mut self) {
        let current = self.generation;
        let before = self.entries.len();
        self.entries.retain(|_, p| p.generation >= current);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            trace!("evicted {evicted} stale suppression entries");
        }
        self.generation += 1;
    }

    /// Forget everything, e.g. when the observed list is dropped.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of distinct (element, kind) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
