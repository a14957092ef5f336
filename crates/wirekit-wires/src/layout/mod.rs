//! Grid layout containers.
//!
//! A layout owns a scene group and positions the children registered with it
//! in a grid of cells. Two flavors exist:
//!
//! - [`GridLayout`]: flat; any child change refreshes every entry and the size
//!   comes from [`LayoutContainer::set_size`]
//! - [`NestedGridLayout`]: entries may be other layouts; the cell size is
//!   memoized and a child change refreshes only that child's entry
//!
//! Both are driven through [`LayoutContainer`] and stored as [`Layout`].

pub mod entries;
pub mod entry;
pub mod flat;
pub mod grid;
pub mod nested;

pub use entries::LayoutEntries;
pub use entry::{LayoutChild, LayoutEntry};
pub use flat::GridLayout;
pub use grid::{CellSize, Grid, GridLayoutAlgorithm, Slot};
pub use nested::NestedGridLayout;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use tracing::{debug, trace, warn};
use wirekit_core::{BoundingBox, IdAllocator, LayoutError, Point, Result};
use wirekit_scene::{Attribute, NodeId, Scene};

use crate::listener::Listener;

new_key_type! {
    /// Handle to a layout owned by [`crate::Wires`].
    pub struct LayoutId;
}

/// The scene type the wires engine runs on.
pub type WireScene = Scene<Listener>;

/// Mutable collaborators a layout needs while it works.
pub struct LayoutContext<'a> {
    pub scene: &'a mut WireScene,
    pub ids: &'a mut dyn IdAllocator,
}

/// Layout flavor and grid requested for a new layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    Flat { rows: u32, columns: u32 },
    Nested { rows: u32, columns: u32 },
}

impl LayoutKind {
    pub fn grid(&self) -> std::result::Result<Grid, LayoutError> {
        match *self {
            LayoutKind::Flat { rows, columns } | LayoutKind::Nested { rows, columns } => {
                Grid::new(rows, columns)
            }
        }
    }
}

/// Entry management and relayout of one grid layout.
pub trait LayoutContainer {
    fn id(&self) -> LayoutId;

    /// Scene group the children are attached to.
    fn group(&self) -> NodeId;

    fn grid(&self) -> Grid;

    fn offset(&self) -> Point;

    fn entries(&self) -> &LayoutEntries;

    fn is_destroyed(&self) -> bool;

    /// Replace the grid. Follow with [`LayoutContainer::execute`] to relayout.
    fn set_grid(&mut self, grid: Grid) -> Result<()>;

    /// Offset added to every computed child position.
    fn set_offset(&mut self, dx: f64, dy: f64) -> Result<()>;

    fn set_size(&mut self, width: f64, height: f64) -> Result<()>;

    fn bounding_box(&self, scene: &WireScene) -> Result<BoundingBox>;

    /// Register `child` (whose scene node is `node`) at (row, column) and
    /// position it. `None` lets the grid pick a free cell.
    fn add(
        &mut self,
        cx: &mut LayoutContext<'_>,
        child: LayoutChild,
        node: NodeId,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()>;

    /// Drop the entry of `node` and detach it from the group. Returns whether
    /// an entry existed.
    fn remove(&mut self, cx: &mut LayoutContext<'_>, node: NodeId) -> Result<bool>;

    /// Move an existing entry to another cell.
    fn set(
        &mut self,
        cx: &mut LayoutContext<'_>,
        node: NodeId,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()>;

    /// Reposition the tracked entries. Returns how many were positioned.
    fn refresh(&mut self, cx: &mut LayoutContext<'_>) -> Result<usize>;

    /// Reposition every child of the group and request a redraw.
    fn execute(&mut self, cx: &mut LayoutContext<'_>) -> Result<usize>;

    /// Drop all entries and detach all children of the group.
    fn clear(&mut self, cx: &mut LayoutContext<'_>) -> Result<()>;

    /// Clear, release every subscription and detach the group from its parent.
    /// Calling it again is a no-op.
    fn destroy(&mut self, cx: &mut LayoutContext<'_>) -> Result<()>;

    /// A transforming attribute of a registered child changed.
    fn on_child_changed(
        &mut self,
        cx: &mut LayoutContext<'_>,
        node: NodeId,
        attributes: &[Attribute],
    ) -> Result<()>;

    /// The frame of the layout's own group changed.
    fn on_bounds_changed(&mut self, cx: &mut LayoutContext<'_>) -> Result<()>;
}

/// A stored layout of either flavor.
#[derive(Debug)]
pub enum Layout {
    Flat(GridLayout),
    Nested(NestedGridLayout),
}

impl Layout {
    pub fn is_nested(&self) -> bool {
        matches!(self, Layout::Nested(_))
    }

    fn inner(&self) -> &dyn LayoutContainer {
        match self {
            Layout::Flat(l) => l,
            Layout::Nested(l) => l,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn LayoutContainer {
        match self {
            Layout::Flat(l) => l,
            Layout::Nested(l) => l,
        }
    }
}

impl LayoutContainer for Layout {
    fn id(&self) -> LayoutId {
        self.inner().id()
    }

    fn group(&self) -> NodeId {
        self.inner().group()
    }

    fn grid(&self) -> Grid {
        self.inner().grid()
    }

    fn offset(&self) -> Point {
        self.inner().offset()
    }

    fn entries(&self) -> &LayoutEntries {
        self.inner().entries()
    }

    fn is_destroyed(&self) -> bool {
        self.inner().is_destroyed()
    }

    fn set_grid(&mut self, grid: Grid) -> Result<()> {
        self.inner_mut().set_grid(grid)
    }

    fn set_offset(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.inner_mut().set_offset(dx, dy)
    }

    fn set_size(&mut self, width: f64, height: f64) -> Result<()> {
        self.inner_mut().set_size(width, height)
    }

    fn bounding_box(&self, scene: &WireScene) -> Result<BoundingBox> {
        self.inner().bounding_box(scene)
    }

    fn add(
        &mut self,
        cx: &mut LayoutContext<'_>,
        child: LayoutChild,
        node: NodeId,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()> {
        self.inner_mut().add(cx, child, node, row, column)
    }

    fn remove(&mut self, cx: &mut LayoutContext<'_>, node: NodeId) -> Result<bool> {
        self.inner_mut().remove(cx, node)
    }

    fn set(
        &mut self,
        cx: &mut LayoutContext<'_>,
        node: NodeId,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()> {
        self.inner_mut().set(cx, node, row, column)
    }

    fn refresh(&mut self, cx: &mut LayoutContext<'_>) -> Result<usize> {
        self.inner_mut().refresh(cx)
    }

    fn execute(&mut self, cx: &mut LayoutContext<'_>) -> Result<usize> {
        self.inner_mut().execute(cx)
    }

    fn clear(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        self.inner_mut().clear(cx)
    }

    fn destroy(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        self.inner_mut().destroy(cx)
    }

    fn on_child_changed(
        &mut self,
        cx: &mut LayoutContext<'_>,
        node: NodeId,
        attributes: &[Attribute],
    ) -> Result<()> {
        self.inner_mut().on_child_changed(cx, node, attributes)
    }

    fn on_bounds_changed(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        self.inner_mut().on_bounds_changed(cx)
    }
}

/// State and entry bookkeeping shared by both layout flavors.
#[derive(Debug)]
pub(crate) struct LayoutCore {
    pub id: LayoutId,
    pub group: NodeId,
    pub grid: Grid,
    pub offset: Point,
    pub entries: LayoutEntries,
    pub destroyed: bool,
}

impl LayoutCore {
    pub fn new(id: LayoutId, group: NodeId, grid: Grid) -> Self {
        Self {
            id,
            group,
            grid,
            offset: Point::zero(),
            entries: LayoutEntries::new(),
            destroyed: false,
        }
    }

    pub fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            return Err(LayoutError::Destroyed.into());
        }
        Ok(())
    }

    fn check_cell(&self, row: Option<u32>, column: Option<u32>) -> Result<()> {
        if let Some(row) = row.filter(|r| *r >= self.grid.rows()) {
            return Err(LayoutError::InvalidArgument {
                reason: format!("row {} outside a grid of {} rows", row, self.grid.rows()),
            }
            .into());
        }
        if let Some(column) = column.filter(|c| *c >= self.grid.columns()) {
            return Err(LayoutError::InvalidArgument {
                reason: format!(
                    "column {} outside a grid of {} columns",
                    column,
                    self.grid.columns()
                ),
            }
            .into());
        }
        Ok(())
    }

    /// Create (or re-place) the entry for `node`. Nothing is positioned.
    pub fn register(
        &mut self,
        cx: &mut LayoutContext<'_>,
        child: LayoutChild,
        node: NodeId,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()> {
        self.check_cell(row, column)?;
        if !cx.scene.contains(node) {
            return Err(LayoutError::InvalidArgument {
                reason: format!("child node {:?} does not exist", node),
            }
            .into());
        }

        if let Some(entry) = self
            .entries
            .key_of(node)
            .map(str::to_string)
            .and_then(|id| self.entries.get_mut(&id))
        {
            entry.set_cell(row, column);
            return Ok(());
        }

        let existing = cx.scene.id(node)?.map(str::to_string);
        let named = existing.is_some();
        let id = existing.unwrap_or_else(|| cx.ids.allocate());
        if self.entries.contains(&id) {
            return Err(LayoutError::InvalidArgument {
                reason: format!("another child is already registered as '{}'", id),
            }
            .into());
        }

        // The node is only renamed once it has been accepted into the group.
        cx.scene.add_child(self.group, node)?;
        if !named {
            cx.scene.set_id(node, id.clone())?;
        }
        let initial_offset = cx.scene.position(node)?;
        self.entries.insert(
            id.clone(),
            LayoutEntry::new(child, node, row, column, initial_offset),
        );

        for attribute in cx.scene.transforming_attributes(node)? {
            let subscription = cx.scene.subscribe_attribute(
                node,
                *attribute,
                Listener::LayoutChild { layout: self.id },
            )?;
            self.entries.register(&id, *attribute, subscription);
        }

        debug!(
            "Layout {:?}: registered '{}' at {:?}/{:?}",
            self.id, id, row, column
        );
        Ok(())
    }

    /// Change the cell of an existing entry.
    pub fn update(&mut self, node: NodeId, row: Option<u32>, column: Option<u32>) -> Result<()> {
        self.check_cell(row, column)?;
        let id = self.entries.key_of(node).map(str::to_string);
        match id.as_deref().and_then(|id| self.entries.get_mut(id)) {
            Some(entry) => {
                entry.set_cell(row, column);
                Ok(())
            }
            None => Err(LayoutError::NotFound {
                child: format!("{:?}", node),
            }
            .into()),
        }
    }

    pub fn unregister(&mut self, cx: &mut LayoutContext<'_>, node: NodeId) -> Result<bool> {
        let removed = match self.entries.key_of(node).map(str::to_string) {
            Some(id) => {
                if let Some((_, subscriptions)) = self.entries.remove(&id) {
                    for subscription in subscriptions {
                        cx.scene.unsubscribe(subscription);
                    }
                }
                debug!("Layout {:?}: removed '{}'", self.id, id);
                true
            }
            None => false,
        };
        if cx.scene.contains(node) {
            cx.scene.remove_child(self.group, node)?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        for subscription in self.entries.clear() {
            cx.scene.unsubscribe(subscription);
        }
        cx.scene.remove_all(self.group)?;
        Ok(())
    }

    pub fn destroy(&mut self, cx: &mut LayoutContext<'_>) -> Result<()> {
        self.clear(cx)?;
        cx.scene.cancel_pending(self.group);
        cx.scene.detach(self.group)?;
        self.destroyed = true;
        debug!("Layout {:?} destroyed", self.id);
        Ok(())
    }

    /// Resolved cells of all entries, in entry order.
    pub fn placements(&self) -> Vec<Option<(u32, u32)>> {
        GridLayoutAlgorithm::place(self.grid, &self.entries.slots())
    }

    /// Position the entry at `index` given precomputed placements.
    pub fn position_at(
        &self,
        scene: &mut WireScene,
        index: usize,
        placements: &[Option<(u32, u32)>],
        cell: CellSize,
    ) -> Result<bool> {
        let Some((id, entry)) = self.entries.get_index(index) else {
            return Ok(false);
        };
        let Some(target) = placements.get(index).copied().flatten() else {
            warn!("Layout {:?}: no free cell left for '{}'", self.id, id);
            return Ok(false);
        };

        let position =
            GridLayoutAlgorithm::coordinates(cell, target, entry.initial_offset(), self.offset);
        scene.set_position(entry.node(), position)?;
        scene.move_to_top(entry.node())?;
        trace!(
            "Layout {:?}: '{}' -> cell {:?} at ({}, {})",
            self.id,
            id,
            target,
            position.x,
            position.y
        );
        Ok(true)
    }

    /// Position the entry of `node`, if it has one.
    pub fn position_node(
        &self,
        scene: &mut WireScene,
        node: NodeId,
        cell: CellSize,
    ) -> Result<bool> {
        let Some(index) = self
            .entries
            .key_of(node)
            .and_then(|id| self.entries.index_of(id))
        else {
            return Ok(false);
        };
        self.position_at(scene, index, &self.placements(), cell)
    }

    /// Position the entry of `node` plus every entry whose resolved cell
    /// differs from `before`, the placements taken ahead of the change.
    ///
    /// Auto-placed entries are resolved against the fixed ones, so moving or
    /// adding one entry can shift its auto-placed siblings.
    pub fn position_affected(
        &self,
        scene: &mut WireScene,
        node: NodeId,
        before: &[Option<(u32, u32)>],
        cell: CellSize,
    ) -> Result<usize> {
        let target = self
            .entries
            .key_of(node)
            .and_then(|id| self.entries.index_of(id));
        let placements = self.placements();
        let mut positioned = 0;
        for (index, placement) in placements.iter().enumerate() {
            let shifted = before.get(index).map_or(true, |b| b != placement);
            if (Some(index) == target || shifted)
                && self.position_at(scene, index, &placements, cell)?
            {
                positioned += 1;
            }
        }
        Ok(positioned)
    }

    /// Position every entry.
    pub fn position_all(&self, scene: &mut WireScene, cell: CellSize) -> Result<usize> {
        let placements = self.placements();
        let mut positioned = 0;
        for index in 0..self.entries.len() {
            if self.position_at(scene, index, &placements, cell)? {
                positioned += 1;
            }
        }
        Ok(positioned)
    }

    /// Position every child of the group that has an entry, then request a
    /// redraw batch.
    pub fn position_group_children(&self, scene: &mut WireScene, cell: CellSize) -> Result<usize> {
        let placements = self.placements();
        let children = scene.children(self.group)?.to_vec();
        let mut positioned = 0;
        for child in children {
            let index = self
                .entries
                .key_of(child)
                .and_then(|id| self.entries.index_of(id));
            if let Some(index) = index {
                if self.position_at(scene, index, &placements, cell)? {
                    positioned += 1;
                }
            }
        }
        scene.request_redraw_batch();
        Ok(positioned)
    }
}
