//! Per-child layout records.

use wirekit_core::Point;
use wirekit_scene::NodeId;

use super::LayoutId;

/// What a layout entry positions: a plain scene node or another layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChild {
    Node(NodeId),
    Layout(LayoutId),
}

impl From<NodeId> for LayoutChild {
    fn from(node: NodeId) -> Self {
        LayoutChild::Node(node)
    }
}

impl From<LayoutId> for LayoutChild {
    fn from(layout: LayoutId) -> Self {
        LayoutChild::Layout(layout)
    }
}

/// Logical grid placement of one child plus its frozen initial offset.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEntry {
    child: LayoutChild,
    /// Scene node moved by the layout (a nested layout's group)
    node: NodeId,
    row: Option<u32>,
    column: Option<u32>,
    initial_offset: Point,
}

impl LayoutEntry {
    pub fn new(
        child: LayoutChild,
        node: NodeId,
        row: Option<u32>,
        column: Option<u32>,
        initial_offset: Point,
    ) -> Self {
        Self {
            child,
            node,
            row,
            column,
            initial_offset,
        }
    }

    pub fn child(&self) -> LayoutChild {
        self.child
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn row(&self) -> Option<u32> {
        self.row
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }

    /// Child position captured when the entry was created.
    pub fn initial_offset(&self) -> Point {
        self.initial_offset
    }

    pub fn is_assigned(&self) -> bool {
        self.row.is_some() && self.column.is_some()
    }

    /// Move the entry to another cell. The initial offset is kept.
    pub fn set_cell(&mut self, row: Option<u32>, column: Option<u32>) {
        self.row = row;
        self.column = column;
    }
}
