//! # WireKit
//!
//! Container ownership tree and grid layout engine for interactive diagram
//! editors.
//!
//! ## Architecture
//!
//! WireKit is organized as a workspace with multiple crates:
//!
//! 1. **wirekit-core** - Errors, geometry, identity allocation, event bus
//! 2. **wirekit-scene** - Drawable node arena, attribute batching, drag sessions
//! 3. **wirekit-settings** - Runtime configuration (JSON/TOML)
//! 4. **wirekit-wires** - Containers, move/drag propagation, grid layouts
//! 5. **wirekit** - Facade and demo binary

pub use wirekit_core::{
    BoundingBox, ContainerError, Error, EventFilter, IdAllocator, LayoutError, Point, Result,
    SceneError, SequentialAllocator, SubscriptionId, UuidAllocator,
};
pub use wirekit_scene::{Attribute, DragPhase, NodeId, NodeKind};
pub use wirekit_settings::{Config, SettingsError};
pub use wirekit_wires::{
    AlignmentIndex, Container, ContainerConfig, ContainerId, Grid, GridLayoutAlgorithm, Layout,
    LayoutChild, LayoutContainer, LayoutId, LayoutKind, WireScene, Wires, WiresEvent,
    WiresEventKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
