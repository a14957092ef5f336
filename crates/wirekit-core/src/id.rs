//! Identity allocation for drawable nodes.
//!
//! Layouts and containers key their bookkeeping by a stable string id. Nodes
//! created without one receive an id from an [`IdAllocator`].

use uuid::Uuid;

/// Supplies stable unique string ids.
pub trait IdAllocator: Send + Sync {
    /// Produce a fresh id. Never returns the same value twice.
    fn allocate(&mut self) -> String;
}

/// Allocates random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidAllocator;

impl IdAllocator for UuidAllocator {
    fn allocate(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Allocates `prefix-1`, `prefix-2`, ... for reproducible ids in tests and demos.
#[derive(Debug, Clone)]
pub struct SequentialAllocator {
    prefix: String,
    next: u64,
}

impl SequentialAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialAllocator {
    fn default() -> Self {
        Self::new("node")
    }
}

impl IdAllocator for SequentialAllocator {
    fn allocate(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
