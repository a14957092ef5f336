//! Optional alignment/indexing collaborator.

/// Shape alignment index consulted when a shape joins a container.
///
/// Installing one is optional; the engine works without it.
pub trait AlignmentIndex: Send + Sync {
    /// Whether the index tracks the shape with this id.
    fn is_indexed(&self, id: &str) -> bool;

    /// Refresh the alignment control of the shape with this id.
    fn refresh_control(&mut self, id: &str);
}
