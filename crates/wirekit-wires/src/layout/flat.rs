//! Flat grid layout.

use wirekit_core::{BoundingBox, Point, Result};
use wirekit_scene::{Attribute, NodeId};

use super::{
    CellSize, Grid, GridLayoutAlgorithm, LayoutChild, LayoutContainer, LayoutContext, LayoutCore,
    LayoutEntries, LayoutId, WireScene,
};

/// Grid layout whose size is set explicitly.
///
/// Any transforming attribute change of a registered child repositions every
/// tracked entry.
#[derive(Debug)]
pub struct GridLayout {
    core: LayoutCore,
    width: f64,
    height: f64,
}

impl GridLayout {
    pub fn new(id: LayoutId, group: NodeId, grid: Grid) -> Self {
        Self {
            core: LayoutCore::new(id, group, grid),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn cell_size(&self) -> CellSize {
        GridLayoutAlgorithm::cell_size(self.core.grid, self.width, self.height)
    }
}

impl LayoutContainer for GridLayout {
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
        Ok(())
    }

    fn set_offset(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.core.ensure_alive()?;
        self.core.offset = Point::new(dx, dy);
        Ok(())
    }

    fn set_size(&mut self, width: f64, height: f64) -> Result<()> {
        self.core.ensure_alive()?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn bounding_box(&self, scene: &WireScene) -> Result<BoundingBox> {
        self.core.ensure_alive()?;
        let origin = scene.position(self.core.group)?;
        Ok(BoundingBox::new(origin.x, origin.y, self.width, self.height))
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
        if self.core.position_affected(cx.scene, node, &before, self.cell_size())? > 0 {
            cx.scene.request_redraw_batch();
        }
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
        if self.core.position_affected(cx.scene, node, &before, self.cell_size())? > 0 {
            cx.scene.request_redraw_batch();
        }
        Ok(())
    }

    fn refresh(&mut self, cx: &mut LayoutContext<'_>) -> Result<usize> {
        self.core.ensure_alive()?;
        let positioned = self.core.position_all(cx.scene, self.cell_size())?;
        if positioned > 0 {
            cx.scene.request_redraw_batch();
        }
        Ok(positioned)
    }

    fn execute(&mut self, cx: &mut LayoutContext<'_>) -> Result<usize> {
        self.core.ensure_alive()?;
        self.core
            .position_group_children(cx.scene, self.cell_size())
    }

    fn clear(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        self.core.ensure_alive()?;
        self.core.clear(cx)
    }

    fn destroy(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        if self.core.destroyed {
            return Ok(());
        }
        self.core.destroy(cx)
    }

    fn on_child_changed(
        &mut self,
        cx: &mut LayoutContext<'_>,
        _node: NodeId,
        _attributes: &[Attribute],
    ) -> Result<()> {
        self.refresh(cx).map(|_| ())
    }

    fn on_bounds_changed(&mut self, _cx: &mut LayoutContext<'_>) -> Result<()> {
        Ok(())
    }
}
