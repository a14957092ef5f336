//! Nested (delegating) grid layout.
//!
//! Entries may be plain nodes or other layouts, so grids can be composed.
//! The cell size is memoized and only recomputed after the bounds are
//! refreshed; a change of one child repositions only that child's entry.

use tracing::trace;
use wirekit_core::{BoundingBox, Point, Result, SubscriptionId};
use wirekit_scene::{Attribute, NodeId};

use super::{
    CellSize, Grid, GridLayoutAlgorithm, LayoutChild, LayoutContainer, LayoutContext, LayoutCore,
    LayoutEntries, LayoutId, WireScene,
};

#[derive(Debug)]
pub struct NestedGridLayout {
    core: LayoutCore,
    /// Explicit size; the group frame is used when unset
    size: Option<(f64, f64)>,
    cell_size: Option<CellSize>,
    /// Width/height subscriptions on the layout's own group
    bounds_subscriptions: Vec<SubscriptionId>,
}

impl NestedGridLayout {
    pub fn new(id: LayoutId, group: NodeId, grid: Grid) -> Self {
        Self {
            core: LayoutCore::new(id, group, grid),
            size: None,
            cell_size: None,
            bounds_subscriptions: Vec::new(),
        }
    }

    /// Remember the subscriptions watching this layout's own frame.
    pub fn track_bounds(&mut self, subscriptions: Vec<SubscriptionId>) {
        self.bounds_subscriptions.extend(subscriptions);
    }

    /// Forget the memoized cell size; the next query recomputes it.
    pub fn on_refresh_bounds(&mut self) {
        self.cell_size = None;
    }

    pub fn has_cached_cell_size(&self) -> bool {
        self.cell_size.is_some()
    }

    pub fn cell_size(&mut self, scene: &WireScene) -> Result<CellSize> {
        if let Some(cell) = self.cell_size {
            return Ok(cell);
        }
        let bounds = self.bounding_box(scene)?;
        let cell = GridLayoutAlgorithm::cell_size(self.core.grid, bounds.width, bounds.height);
        trace!(
            "Layout {:?}: cell size {}x{}",
            self.core.id,
            cell.width,
            cell.height
        );
        self.cell_size = Some(cell);
        Ok(cell)
    }
}

impl LayoutContainer for NestedGridLayout {
    fn id(&self) -> LayoutId {
        self.core.id
    }

    fn group(&self) -> NodeId {
        self.core.group
    }

    fn grid(&self) -> Grid {
        self.core.grid
    }

    fn offset(&self) -> Point {
        self.core.offset
    }

    fn entries(&self) -> &LayoutEntries {
        &self.core.entries
    }

    fn is_destroyed(&self) -> bool {
        self.core.destroyed
    }

    fn set_grid(&mut self, grid: Grid) -> Result<()> {
        self.core.ensure_alive()?;
        self.core.grid = grid;
        self.on_refresh_bounds();
        Ok(())
    }

    fn set_offset(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.core.ensure_alive()?;
        self.core.offset = Point::new(dx, dy);
        Ok(())
    }

    fn set_size(&mut self, width: f64, height: f64) -> Result<()> {
        self.core.ensure_alive()?;
        self.size = Some((width, height));
        self.on_refresh_bounds();
        Ok(())
    }

    fn bounding_box(&self, scene: &WireScene) -> Result<BoundingBox> {
        self.core.ensure_alive()?;
        let frame = scene.bounding_box(self.core.group)?;
        Ok(match self.size {
            Some((width, height)) => BoundingBox::new(frame.x, frame.y, width, height),
            None => frame,
        })
    }

    fn add(
        &mut self,
        cx: &mut LayoutContext<'_>,
        child: LayoutChild,
        node: NodeId,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()> {
        self.core.ensure_alive()?;
        let before = self.core.placements();
        self.core.register(cx, child, node, row, column)?;
        let cell = self.cell_size(cx.scene)?;
        self.core.position_affected(cx.scene, node, &before, cell)?;
        Ok(())
    }

    fn remove(&mut self, cx: &mut LayoutContext<'_>, node: NodeId) -> Result<bool> {
        self.core.ensure_alive()?;
        self.core.unregister(cx, node)
    }

    fn set(
        &mut self,
        cx: &mut LayoutContext<'_>,
        node: NodeId,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()> {
        self.core.ensure_alive()?;
        let before = self.core.placements();
        self.core.update(node, row, column)?;
        let cell = self.cell_size(cx.scene)?;
        self.core.position_affected(cx.scene, node, &before, cell)?;
        Ok(())
    }

    fn refresh(&mut self, cx: &mut LayoutContext<'_>) -> Result<usize> {
        self.core.ensure_alive()?;
        let cell = self.cell_size(cx.scene)?;
        self.core.position_all(cx.scene, cell)
    }

    fn execute(&mut self, cx: &mut LayoutContext<'_>) -> Result<usize> {
        self.core.ensure_alive()?;
        let cell = self.cell_size(cx.scene)?;
        self.core.position_group_children(cx.scene, cell)
    }

    fn clear(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        self.core.ensure_alive()?;
        self.core.clear(cx)
    }

    fn destroy(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        if self.core.destroyed {
            return Ok(());
        }
        for subscription in self.bounds_subscriptions.drain(..) {
            cx.scene.unsubscribe(subscription);
        }
        self.cell_size = None;
        self.core.destroy(cx)
    }

    fn on_child_changed(
        &mut self,
        cx: &mut LayoutContext<'_>,
        node: NodeId,
        _attributes: &[Attribute],
    ) -> Result<()> {
        self.core.ensure_alive()?;
        let cell = self.cell_size(cx.scene)?;
        self.core.position_node(cx.scene, node, cell)?;
        Ok(())
    }

    fn on_bounds_changed(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        self.on_refresh_bounds();
        self.refresh(cx).map(|_| ())
    }
}
