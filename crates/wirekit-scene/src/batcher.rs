//! Attribute change batching.
//!
//! Mutations on scene nodes are recorded here instead of being dispatched
//! immediately. A flush (one animation frame) drains everything recorded since
//! the previous flush, one entry per node, so a burst of intermediate x/y
//! updates during a gesture reaches listeners as a single notification.

use indexmap::IndexMap;

use crate::node::{Attribute, NodeId};

/// Coalesces per-node attribute changes between flushes.
#[derive(Debug, Default)]
pub struct AttributeChangeBatcher {
    /// Changed attributes per node, in first-change order
    pending: IndexMap<NodeId, Vec<Attribute>>,
    /// Number of flushes that delivered at least one change
    flushes: u64,
}

impl AttributeChangeBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `attribute` of `node` changed.
    pub fn record(&mut self, node: NodeId, attribute: Attribute) {
        let changed = self.pending.entry(node).or_default();
        if !changed.contains(&attribute) {
            changed.push(attribute);
        }
    }

    /// Drain all pending changes.
    pub fn take(&mut self) -> Vec<(NodeId, Vec<Attribute>)> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        self.flushes += 1;
        self.pending.drain(..).collect()
    }

    /// Drop pending changes of `node` so no stale notification is delivered.
    ///
    /// Returns true if something was pending.
    pub fn cancel(&mut self, node: NodeId) -> bool {
        self.pending.shift_remove(&node).is_some()
    }

    pub fn is_pending(&self, node: NodeId) -> bool {
        self.pending.contains_key(&node)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn flushes(&self) -> u64 {
        self.flushes
    }
}
