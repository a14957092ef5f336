//! Error handling for WireKit
//!
//! Provides error types for every layer of the container/layout core:
//! - Scene errors (drawable node lookups on the substrate)
//! - Layout errors (grid configuration and entry management)
//! - Container errors (ownership tree and lifecycle)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Scene error type
///
/// Raised by the drawable substrate when a node handle does not resolve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The node handle is unknown or was removed from the scene
    #[error("Unknown scene node: {node}")]
    UnknownNode {
        /// Debug rendering of the node handle.
        node: String,
    },

    /// A grouping operation was attempted on a leaf primitive
    #[error("Scene node {node} is not a group")]
    NotAGroup {
        /// Debug rendering of the node handle.
        node: String,
    },

    /// Attaching the node would make a group its own ancestor
    #[error("Attaching {child} to {group} would create a cycle")]
    WouldCycle {
        /// Debug rendering of the group handle.
        group: String,
        /// Debug rendering of the child handle.
        child: String,
    },
}

/// Layout error type
///
/// Represents failures of grid layout containers and their entries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// An argument was rejected before any mutation took place
    #[error("Invalid layout argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected.
        reason: String,
    },

    /// No entry is registered for the given child
    #[error("No layout entry registered for child '{child}'")]
    NotFound {
        /// The child identity that was looked up.
        child: String,
    },

    /// Grid dimensions must both be positive
    #[error("Invalid grid {rows}x{columns}: rows and columns must be > 0")]
    InvalidGrid {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },

    /// The layout was destroyed and can no longer be used
    #[error("Layout has been destroyed")]
    Destroyed,
}

/// Container error type
///
/// Represents failures of the container ownership tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContainerError {
    /// An argument was rejected before any mutation took place
    #[error("Invalid container argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected.
        reason: String,
    },

    /// The container handle does not exist
    #[error("Container not found: {container}")]
    NotFound {
        /// Debug rendering of the container handle.
        container: String,
    },

    /// The container was destroyed and can no longer be used
    #[error("Container {container} has been destroyed")]
    Destroyed {
        /// Debug rendering of the container handle.
        container: String,
    },
}

/// Main error type for WireKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Layout error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Container error
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error rejected an argument (including unresolvable handles)
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::Layout(LayoutError::InvalidArgument { .. })
                | Error::Layout(LayoutError::InvalidGrid { .. })
                | Error::Container(ContainerError::InvalidArgument { .. })
                | Error::Scene(SceneError::UnknownNode { .. })
                | Error::Scene(SceneError::NotAGroup { .. })
                | Error::Scene(SceneError::WouldCycle { .. })
        )
    }

    /// Check if this is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Layout(LayoutError::NotFound { .. })
                | Error::Container(ContainerError::NotFound { .. })
        )
    }

    /// Check if this is a use-after-destroy error
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Error::Layout(LayoutError::Destroyed) | Error::Container(ContainerError::Destroyed { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
