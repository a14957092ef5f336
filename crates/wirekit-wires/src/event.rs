//! Container events published on each container's bus.

use serde::{Deserialize, Serialize};
use std::fmt;
use wirekit_core::{BusEvent, Point};

use crate::container::ContainerId;

/// Event kind, used to filter subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WiresEventKind {
    Move,
    DragStart,
    DragMove,
    DragEnd,
}

impl fmt::Display for WiresEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => write!(f, "move"),
            Self::DragStart => write!(f, "drag-start"),
            Self::DragMove => write!(f, "drag-move"),
            Self::DragEnd => write!(f, "drag-end"),
        }
    }
}

/// A container moved or is being dragged.
///
/// `location` is the container's location relative to its parent group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WiresEvent {
    Move {
        container: ContainerId,
        location: Point,
    },
    DragStart {
        container: ContainerId,
        location: Point,
    },
    DragMove {
        container: ContainerId,
        location: Point,
    },
    DragEnd {
        container: ContainerId,
        location: Point,
    },
}

impl WiresEvent {
    pub fn new(kind: WiresEventKind, container: ContainerId, location: Point) -> Self {
        match kind {
            WiresEventKind::Move => Self::Move {
                container,
                location,
            },
            WiresEventKind::DragStart => Self::DragStart {
                container,
                location,
            },
            WiresEventKind::DragMove => Self::DragMove {
                container,
                location,
            },
            WiresEventKind::DragEnd => Self::DragEnd {
                container,
                location,
            },
        }
    }

    pub fn kind(&self) -> WiresEventKind {
        match self {
            Self::Move { .. } => WiresEventKind::Move,
            Self::DragStart { .. } => WiresEventKind::DragStart,
            Self::DragMove { .. } => WiresEventKind::DragMove,
            Self::DragEnd { .. } => WiresEventKind::DragEnd,
        }
    }

    pub fn container(&self) -> ContainerId {
        match *self {
            Self::Move { container, .. }
            | Self::DragStart { container, .. }
            | Self::DragMove { container, .. }
            | Self::DragEnd { container, .. } => container,
        }
    }

    pub fn location(&self) -> Point {
        match *self {
            Self::Move { location, .. }
            | Self::DragStart { location, .. }
            | Self::DragMove { location, .. }
            | Self::DragEnd { location, .. } => location,
        }
    }
}

impl BusEvent for WiresEvent {
    type Category = WiresEventKind;

    fn category(&self) -> WiresEventKind {
        self.kind()
    }
}
