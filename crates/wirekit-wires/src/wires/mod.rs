//! The wires engine.
//!
//! [`Wires`] owns the scene, every container and every layout. Layouts and
//! containers subscribe to scene attributes with a [`Listener`] value; the
//! engine is the single place where the resulting notifications are matched
//! and dispatched, so no callback ever holds a reference into the engine.
//!
//! Attribute changes are batched by the scene and delivered on [`Wires::tick`]
//! (one animation frame). [`Wires::settle`] ticks until nothing is pending.

mod container_ops;
mod drag;
mod layout_ops;

use slotmap::SlotMap;
use tracing::{debug, trace, warn};
use wirekit_core::{IdAllocator, Result, UuidAllocator};
use wirekit_scene::{moves_position, AttributeNotification};
use wirekit_settings::Config;

use crate::alignment::AlignmentIndex;
use crate::container::{Container, ContainerId};
use crate::event::WiresEventKind;
use crate::layout::{Layout, LayoutContainer, LayoutContext, LayoutId, WireScene};
use crate::listener::Listener;

pub struct Wires {
    scene: WireScene,
    containers: SlotMap<ContainerId, Container>,
    layouts: SlotMap<LayoutId, Layout>,
    ids: Box<dyn IdAllocator>,
    alignment: Option<Box<dyn AlignmentIndex>>,
    config: Config,
}

impl Default for Wires {
    fn default() -> Self {
        Self::new()
    }
}

impl Wires {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        debug!(
            "Wires engine: default grid {}x{}, {} settle passes",
            config.layout.default_rows,
            config.layout.default_columns,
            config.batching.max_settle_passes
        );
        Self {
            scene: WireScene::new(),
            containers: SlotMap::with_key(),
            layouts: SlotMap::with_key(),
            ids: Box::new(UuidAllocator),
            alignment: None,
            config,
        }
    }

    /// Replace the allocator used for nodes created without an id.
    pub fn with_id_allocator(mut self, ids: impl IdAllocator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scene(&self) -> &WireScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut WireScene {
        &mut self.scene
    }

    pub fn set_alignment_index(&mut self, index: impl AlignmentIndex + 'static) {
        self.alignment = Some(Box::new(index));
    }

    pub fn take_alignment_index(&mut self) -> Option<Box<dyn AlignmentIndex>> {
        self.alignment.take()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    /// Flush one batch of attribute changes and dispatch it.
    ///
    /// Returns the number of notifications dispatched. A failing listener is
    /// logged and does not stop the rest of the batch.
    pub fn tick(&mut self) -> usize {
        let notifications = self.scene.flush();
        let mut dispatched = 0;
        for notification in notifications {
            // An earlier listener in this batch may have released it.
            if !self.scene.is_subscribed(notification.subscription) {
                continue;
            }
            let listener = notification.listener;
            if let Err(e) = self.dispatch(notification) {
                warn!("Listener {:?} failed: {}", listener, e);
            }
            dispatched += 1;
        }
        trace!("Tick dispatched {} notifications", dispatched);
        dispatched
    }

    /// Tick until no change is pending, at most `max_settle_passes` times.
    ///
    /// Returns the number of ticks performed.
    pub fn settle(&mut self) -> usize {
        let limit = self.config.batching.max_settle_passes as usize;
        let mut passes = 0;
        while self.scene.has_pending_changes() {
            if passes == limit {
                warn!(
                    "Layout did not settle after {} passes; changes still pending",
                    limit
                );
                break;
            }
            self.tick();
            passes += 1;
        }
        passes
    }

    fn dispatch(&mut self, notification: AttributeNotification<Listener>) -> Result<()> {
        match notification.listener {
            Listener::LayoutChild { layout } => {
                if self.layout_is_live(layout) {
                    let node = notification.node;
                    let attributes = notification.attributes;
                    self.with_layout(layout, |l, cx| {
                        l.on_child_changed(cx, node, &attributes)
                    })?;
                }
            }
            Listener::LayoutBounds { layout } => {
                if self.layout_is_live(layout) {
                    self.with_layout(layout, |l, cx| l.on_bounds_changed(cx))?;
                }
            }
            Listener::ContainerMove { container } => {
                let Some(c) = self.containers.get(container) else {
                    return Ok(());
                };
                if !c.destroyed && !c.dragging && moves_position(&notification.attributes) {
                    let location = self.scene.position(c.group)?;
                    c.fire(WiresEventKind::Move, location);
                }
            }
            Listener::ContainerDrag { .. } => {}
        }
        Ok(())
    }

    fn layout_is_live(&self, layout: LayoutId) -> bool {
        self.layouts
            .get(layout)
            .is_some_and(|l| !l.is_destroyed())
    }

    /// Run `f` on a layout with the scene and id allocator borrowed alongside.
    pub(crate) fn with_layout<T>(
        &mut self,
        id: LayoutId,
        f: impl FnOnce(&mut Layout, &mut LayoutContext<'_>) -> Result<T>,
    ) -> Result<T> {
        let layout = self
            .layouts
            .get_mut(id)
            .ok_or_else(|| layout_not_found(id))?;
        let mut cx = LayoutContext {
            scene: &mut self.scene,
            ids: self.ids.as_mut(),
        };
        f(layout, &mut cx)
    }
}

pub(crate) fn layout_not_found(id: LayoutId) -> wirekit_core::Error {
    wirekit_core::LayoutError::InvalidArgument {
        reason: format!("layout {:?} does not exist", id),
    }
    .into()
}

impl std::fmt::Debug for Wires {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wires")
            .field("containers", &self.containers.len())
            .field("layouts", &self.layouts.len())
            .field("nodes", &self.scene.node_count())
            .field("alignment_index", &self.alignment.is_some())
            .finish()
    }
}
