//! # WireKit Wires
//!
//! Containers that own child shapes, propagate move and drag notifications,
//! and position their children with grid layouts recomputed whenever a child's
//! geometry changes.
//!
//! ```
//! use wirekit_wires::{ContainerConfig, LayoutKind, Wires};
//!
//! let mut wires = Wires::new();
//! let board = wires
//!     .create_container(
//!         ContainerConfig::new()
//!             .with_layout(LayoutKind::Flat { rows: 2, columns: 3 })
//!             .with_size(300.0, 200.0),
//!     )
//!     .unwrap();
//! let card = wires.create_shape(ContainerConfig::new(), 20.0, 10.0).unwrap();
//!
//! wires.add_at(board, card, Some(1), Some(2)).unwrap();
//! assert_eq!(wires.location(card).unwrap().x, 200.0);
//! ```

pub mod alignment;
pub mod container;
pub mod event;
pub mod layout;
pub mod listener;
pub mod wires;

pub use alignment::AlignmentIndex;
pub use container::{
    Container, ContainerConfig, ContainerGeometry, ContainerId, InteractionState, PreDestroyHook,
};
pub use event::{WiresEvent, WiresEventKind};
pub use layout::{
    CellSize, Grid, GridLayout, GridLayoutAlgorithm, Layout, LayoutChild, LayoutContainer,
    LayoutContext, LayoutEntries, LayoutEntry, LayoutId, LayoutKind, NestedGridLayout, WireScene,
};
pub use listener::Listener;
pub use wires::Wires;
