//! Listener payloads stored in the scene.
//!
//! Subscriptions made by layouts and containers carry one of these values; the
//! engine matches on it when the scene hands back a notification.

use crate::container::ContainerId;
use crate::layout::LayoutId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    /// A transforming attribute of a child entry changed.
    LayoutChild { layout: LayoutId },
    /// The frame of a nested layout's own group changed.
    LayoutBounds { layout: LayoutId },
    /// The container's group moved (interactive containers only).
    ContainerMove { container: ContainerId },
    /// Drag gesture on the container's group.
    ContainerDrag { container: ContainerId },
}
