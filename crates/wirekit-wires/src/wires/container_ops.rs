//! Container ownership tree operations.

use tracing::debug;
use wirekit_core::{BoundingBox, ContainerError, LayoutError, Point, Result};
use wirekit_scene::{Attribute, NodeId};

use super::Wires;
use crate::container::{Container, ContainerConfig, ContainerGeometry, ContainerId, InteractionState};
use crate::event::WiresEventKind;
use crate::layout::{LayoutContainer, LayoutKind};
use crate::listener::Listener;

impl Wires {
    /// Create a container with its layout already constructed.
    pub fn create_container(&mut self, config: ContainerConfig) -> Result<ContainerId> {
        self.build_container(config, None)
    }

    /// Create a shape: a container whose group carries a `width` x `height`
    /// body primitive. The group takes the body size unless `config` sets one.
    pub fn create_shape(
        &mut self,
        mut config: ContainerConfig,
        width: f64,
        height: f64,
    ) -> Result<ContainerId> {
        if config.size.is_none() {
            config.size = Some((width, height));
        }
        self.build_container(config, Some((width, height)))
    }

    fn build_container(
        &mut self,
        config: ContainerConfig,
        body_size: Option<(f64, f64)>,
    ) -> Result<ContainerId> {
        let kind = config.layout.unwrap_or(LayoutKind::Flat {
            rows: self.config.layout.default_rows,
            columns: self.config.layout.default_columns,
        });
        let layout = self.create_layout(kind)?;
        let group = self.layout(layout)?.group();

        let uuid = match config.id {
            Some(id) => id,
            None => self.ids.allocate(),
        };
        self.scene.set_id(group, uuid.clone())?;
        self.scene.set_position(group, config.location)?;
        if let Some((width, height)) = config.size {
            self.scene.set_size(group, width, height)?;
            self.layout_set_size(layout, width, height)?;
        }

        let body = match body_size {
            Some((width, height)) => {
                let body = self
                    .scene
                    .create_primitive(BoundingBox::new(0.0, 0.0, width, height));
                self.scene.add_child(group, body)?;
                Some(body)
            }
            None => None,
        };

        let events = self.config.event_bus_config();
        let id = self
            .containers
            .insert_with_key(|id| Container::new(id, group, layout, body, events));

        if config.interactive {
            self.enter_interactive(id)?;
            self.scene.set_draggable(group, true)?;
        }
        // Construction is not a change anyone should hear about.
        self.scene.cancel_pending(group);

        debug!("Created container {:?} '{}'", id, uuid);
        Ok(id)
    }

    /// Look up a container. Destroyed containers are still returned.
    pub fn container(&self, id: ContainerId) -> Result<&Container> {
        self.containers
            .get(id)
            .ok_or_else(|| container_not_found(id))
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Result<&mut Container> {
        self.containers
            .get_mut(id)
            .ok_or_else(|| container_not_found(id))
    }

    fn live(&self, id: ContainerId) -> Result<&Container> {
        let container = self.container(id)?;
        container.ensure_alive()?;
        Ok(container)
    }

    /// Id of the container's group.
    pub fn uuid(&self, id: ContainerId) -> Result<Option<String>> {
        let group = self.container(id)?.group;
        Ok(self.scene.id(group)?.map(str::to_string))
    }

    /// Make `shape` a child of `parent`.
    ///
    /// No-op if it already is. A shape parented elsewhere is detached from its
    /// old parent first. The shape's group joins the parent's group, then
    /// the shape announces a move.
    pub fn add(&mut self, parent: ContainerId, shape: ContainerId) -> Result<()> {
        if parent == shape {
            return Err(ContainerError::InvalidArgument {
                reason: "a container cannot contain itself".to_string(),
            }
            .into());
        }
        let parent_group = self.live(parent)?.group;
        let (shape_group, current) = {
            let s = self.live(shape)?;
            (s.group, s.parent)
        };
        if current == Some(parent) {
            return Ok(());
        }
        if self.is_ancestor(shape, parent) {
            return Err(ContainerError::InvalidArgument {
                reason: format!("{:?} is an ancestor of {:?}", shape, parent),
            }
            .into());
        }

        if let Some(old) = current {
            self.detach_shape(old, shape, shape_group)?;
            debug!("Reparenting {:?} from {:?} to {:?}", shape, old, parent);
        }

        self.scene.add_child(parent_group, shape_group)?;
        self.container_mut(parent)?.child_shapes.push(shape);
        self.container_mut(shape)?.parent = Some(parent);
        debug!("Added {:?} to {:?}", shape, parent);

        self.shape_moved(shape)?;
        self.refresh_alignment(shape_group)?;
        Ok(())
    }

    /// [`Wires::add`], then register the shape with the parent's layout.
    pub fn add_at(
        &mut self,
        parent: ContainerId,
        shape: ContainerId,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<()> {
        let layout = self.live(parent)?.layout;
        // Reject a bad cell before the shape leaves its current parent.
        let target = self.layout(layout)?;
        if target.is_destroyed() {
            return Err(LayoutError::Destroyed.into());
        }
        let grid = target.grid();
        if !grid.contains(row.unwrap_or(0), column.unwrap_or(0)) {
            return Err(LayoutError::InvalidArgument {
                reason: format!(
                    "cell {:?}/{:?} outside a {}x{} grid",
                    row,
                    column,
                    grid.rows(),
                    grid.columns()
                ),
            }
            .into());
        }

        self.add(parent, shape)?;
        let group = self.live(shape)?.group;
        self.layout_add(layout, group, row, column)
    }

    /// Remove `shape` from `parent`. No-op if it is not a child.
    pub fn remove(&mut self, parent: ContainerId, shape: ContainerId) -> Result<()> {
        self.live(parent)?;
        let Some(shape_group) = self.containers.get(shape).map(|s| s.group) else {
            return Ok(());
        };
        if !self.container(parent)?.child_shapes.contains(&shape) {
            return Ok(());
        }

        self.detach_shape(parent, shape, shape_group)?;
        debug!("Removed {:?} from {:?}", shape, parent);
        Ok(())
    }

    /// Drop `shape` from `parent`'s bookkeeping, layout entries and group.
    fn detach_shape(
        &mut self,
        parent: ContainerId,
        shape: ContainerId,
        shape_group: NodeId,
    ) -> Result<()> {
        if let Some(p) = self.containers.get_mut(parent) {
            p.child_shapes.retain(|c| *c != shape);
        }
        if let Some(s) = self.containers.get_mut(shape) {
            if s.parent == Some(parent) {
                s.parent = None;
            }
        }

        let layout = self.container(parent)?.layout;
        let tracked = self.layout(layout).is_ok_and(|l| {
            !l.is_destroyed() && l.entries().key_of(shape_group).is_some()
        });
        if tracked {
            self.layout_remove(layout, shape_group)?;
        } else {
            let group = self.container(parent)?.group;
            self.scene.remove_child(group, shape_group)?;
        }
        Ok(())
    }

    fn is_ancestor(&self, candidate: ContainerId, of: ContainerId) -> bool {
        let mut current = self.containers.get(of).and_then(|c| c.parent);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.containers.get(id).and_then(|c| c.parent);
        }
        false
    }

    fn refresh_alignment(&mut self, group: NodeId) -> Result<()> {
        let Some(index) = self.alignment.as_mut() else {
            return Ok(());
        };
        if let Some(uuid) = self.scene.id(group)? {
            if index.is_indexed(uuid) {
                index.refresh_control(uuid);
            }
        }
        Ok(())
    }

    /// Announce a move of `id` and of its whole subtree, children first.
    pub fn shape_moved(&self, id: ContainerId) -> Result<()> {
        let container = self.live(id)?;
        for child in &container.child_shapes {
            self.shape_moved(*child)?;
        }
        let location = self.scene.position(container.group)?;
        container.fire(WiresEventKind::Move, location);
        Ok(())
    }

    /// Set the group's draggable flag, installing the drag and position
    /// listeners the first time.
    pub fn set_draggable(&mut self, id: ContainerId, draggable: bool) -> Result<()> {
        let container = self.live(id)?;
        let group = container.group;
        if !container.is_interactive() {
            self.enter_interactive(id)?;
        }
        self.scene.set_draggable(group, draggable)?;
        Ok(())
    }

    fn enter_interactive(&mut self, id: ContainerId) -> Result<()> {
        let group = self.live(id)?.group;
        let subscriptions = vec![
            self.scene
                .subscribe_drag(group, Listener::ContainerDrag { container: id })?,
            self.scene.subscribe_attribute(
                group,
                Attribute::X,
                Listener::ContainerMove { container: id },
            )?,
            self.scene.subscribe_attribute(
                group,
                Attribute::Y,
                Listener::ContainerMove { container: id },
            )?,
        ];
        self.container_mut(id)?.interaction = InteractionState::Interactive { subscriptions };
        debug!("Container {:?} is now interactive", id);
        Ok(())
    }

    /// Anchor `id` to `target`. Pure relation.
    pub fn set_docked_to(&mut self, id: ContainerId, target: Option<ContainerId>) -> Result<()> {
        if let Some(target) = target {
            self.container(target)?;
        }
        self.container_mut(id)?.set_docked_to(target)
    }

    /// Attach raw geometry to the container's group without a layout entry.
    pub fn add_primitive(&mut self, id: ContainerId, node: NodeId) -> Result<()> {
        let group = self.live(id)?.group;
        self.scene.add_child(group, node)?;
        Ok(())
    }

    pub fn remove_primitive(&mut self, id: ContainerId, node: NodeId) -> Result<bool> {
        let group = self.live(id)?.group;
        Ok(self.scene.remove_child(group, node)?)
    }

    /// Location relative to the parent group.
    pub fn location(&self, id: ContainerId) -> Result<Point> {
        let group = self.container(id)?.group;
        Ok(self.scene.position(group)?)
    }

    pub fn set_location(&mut self, id: ContainerId, location: Point) -> Result<()> {
        let group = self.live(id)?.group;
        self.scene.set_position(group, location)?;
        Ok(())
    }

    /// Absolute location, summing every ancestor group.
    pub fn computed_location(&self, id: ContainerId) -> Result<Point> {
        let group = self.container(id)?.group;
        Ok(self.scene.computed_location(group)?)
    }

    /// Bounding box of the container's layout.
    pub fn bounding_box(&self, id: ContainerId) -> Result<BoundingBox> {
        let layout = self.live(id)?.layout;
        self.layout_bounding_box(layout)
    }

    pub fn geometry(&self, id: ContainerId) -> Result<ContainerGeometry> {
        Ok(ContainerGeometry {
            location: self.location(id)?,
            computed_location: self.computed_location(id)?,
            bounding_box: self.bounding_box(id)?,
        })
    }

    /// Tear a container down.
    ///
    /// Runs the pre-destroy hook, releases every listener and handler, drops
    /// pending batched changes of the group, releases the child shapes,
    /// leaves the parent and destroys the layout. Child geometry stays in the
    /// scene. A second call is a no-op.
    pub fn destroy(&mut self, id: ContainerId) -> Result<()> {
        let container = self.container_mut(id)?;
        if container.destroyed {
            return Ok(());
        }
        if let Some(hook) = container.pre_destroy.take() {
            hook(id);
        }

        let subscriptions = match std::mem::take(&mut container.interaction) {
            InteractionState::Interactive { subscriptions } => subscriptions,
            InteractionState::Passive => Vec::new(),
        };
        container.clear_handlers();
        container.dragging = false;
        container.docked_to = None;
        let children = std::mem::take(&mut container.child_shapes);
        let parent = container.parent;
        let (group, layout) = (container.group, container.layout);

        for subscription in subscriptions {
            self.scene.unsubscribe(subscription);
        }
        self.scene.cancel_pending(group);

        for child in children {
            if let Some(c) = self.containers.get_mut(child) {
                c.parent = None;
            }
        }
        if let Some(parent) = parent {
            self.detach_shape(parent, id, group)?;
        }
        self.layout_destroy(layout)?;

        self.container_mut(id)?.destroyed = true;
        debug!("Destroyed container {:?}", id);
        Ok(())
    }
}

fn container_not_found(id: ContainerId) -> wirekit_core::Error {
    ContainerError::NotFound {
        container: format!("{:?}", id),
    }
    .into()
}
