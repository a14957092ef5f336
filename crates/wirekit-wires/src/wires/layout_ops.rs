//! Layout creation and entry management.

use tracing::debug;
use wirekit_core::{BoundingBox, LayoutError, Result};
use wirekit_scene::{Attribute, NodeId};

use super::{layout_not_found, Wires};
use crate::layout::{
    GridLayout, Grid, Layout, LayoutChild, LayoutContainer, LayoutId, LayoutKind,
    NestedGridLayout,
};
use crate::listener::Listener;

impl Wires {
    /// Create a layout with its own empty group.
    pub fn create_layout(&mut self, kind: LayoutKind) -> Result<LayoutId> {
        let grid = kind.grid()?;
        let group = self.scene.create_group();
        let id = self.layouts.insert_with_key(|id| match kind {
            LayoutKind::Flat { .. } => Layout::Flat(GridLayout::new(id, group, grid)),
            LayoutKind::Nested { .. } => Layout::Nested(NestedGridLayout::new(id, group, grid)),
        });

        if kind_is_nested(kind) {
            let listener = Listener::LayoutBounds { layout: id };
            let subscriptions = vec![
                self.scene
                    .subscribe_attribute(group, Attribute::Width, listener)?,
                self.scene
                    .subscribe_attribute(group, Attribute::Height, listener)?,
            ];
            if let Some(Layout::Nested(nested)) = self.layouts.get_mut(id) {
                nested.track_bounds(subscriptions);
            }
        }

        debug!(
            "Created {:?} layout {:?} ({}x{})",
            kind,
            id,
            grid.rows(),
            grid.columns()
        );
        Ok(id)
    }

    pub fn layout(&self, id: LayoutId) -> Result<&Layout> {
        self.layouts.get(id).ok_or_else(|| layout_not_found(id))
    }

    /// Register `child` with a layout at (row, column) and position it.
    ///
    /// `None` for either axis lets the grid pick the first free cell.
    pub fn layout_add(
        &mut self,
        layout: LayoutId,
        child: impl Into<LayoutChild>,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()> {
        let child = child.into();
        let node = self.resolve_child(child)?;
        self.with_layout(layout, |l, cx| l.add(cx, child, node, row, column))
    }

    /// Drop the entry of `child` and detach it. Unknown children are ignored.
    pub fn layout_remove(&mut self, layout: LayoutId, child: impl Into<LayoutChild>) -> Result<bool> {
        let node = self.resolve_child(child.into())?;
        self.with_layout(layout, |l, cx| l.remove(cx, node))
    }

    /// Move a registered child to another cell, repositioning only that child.
    pub fn layout_set(
        &mut self,
        layout: LayoutId,
        child: impl Into<LayoutChild>,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()> {
        let node = self.resolve_child(child.into())?;
        self.with_layout(layout, |l, cx| l.set(cx, node, row, column))
    }

    pub fn layout_refresh(&mut self, layout: LayoutId) -> Result<usize> {
        self.with_layout(layout, |l, cx| l.refresh(cx))
    }

    pub fn layout_execute(&mut self, layout: LayoutId) -> Result<usize> {
        self.with_layout(layout, |l, cx| l.execute(cx))
    }

    pub fn layout_clear(&mut self, layout: LayoutId) -> Result<()> {
        self.with_layout(layout, |l, cx| l.clear(cx))
    }

    /// Destroy a layout. A layout nested in another one is first removed from
    /// its owner so no entry keeps tracking the torn-down group.
    pub fn layout_destroy(&mut self, layout: LayoutId) -> Result<()> {
        let target = self.layout(layout)?;
        if !target.is_destroyed() {
            let group = target.group();
            if let Some(owner) = self.owning_layout(layout, group) {
                self.layout_remove(owner, group)?;
            }
        }
        self.with_layout(layout, |l, cx| l.destroy(cx))
    }

    /// Live layout other than `layout` holding an entry for `group`.
    fn owning_layout(&self, layout: LayoutId, group: NodeId) -> Option<LayoutId> {
        self.layouts
            .iter()
            .find(|(id, l)| {
                *id != layout && !l.is_destroyed() && l.entries().key_of(group).is_some()
            })
            .map(|(id, _)| id)
    }

    pub fn layout_set_grid(&mut self, layout: LayoutId, grid: Grid) -> Result<()> {
        self.with_layout(layout, |l, _| l.set_grid(grid))
    }

    pub fn layout_set_offset(&mut self, layout: LayoutId, dx: f64, dy: f64) -> Result<()> {
        self.with_layout(layout, |l, _| l.set_offset(dx, dy))
    }

    pub fn layout_set_size(&mut self, layout: LayoutId, width: f64, height: f64) -> Result<()> {
        self.with_layout(layout, |l, _| l.set_size(width, height))
    }

    pub fn layout_bounding_box(&self, layout: LayoutId) -> Result<BoundingBox> {
        self.layout(layout)?.bounding_box(&self.scene)
    }

    /// Scene node a layout entry moves.
    fn resolve_child(&self, child: LayoutChild) -> Result<NodeId> {
        match child {
            LayoutChild::Node(node) => Ok(node),
            LayoutChild::Layout(id) => {
                let layout = self.layout(id)?;
                if layout.is_destroyed() {
                    return Err(LayoutError::Destroyed.into());
                }
                Ok(layout.group())
            }
        }
    }
}

fn kind_is_nested(kind: LayoutKind) -> bool {
    matches!(kind, LayoutKind::Nested { .. })
}
