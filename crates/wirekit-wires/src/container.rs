//! Wires containers: the ownership tree nodes.
//!
//! A container owns a scene group (its layout's group), an ordered list of
//! child shapes, an optional parent and dock target, and a private event bus
//! for move/drag notifications. A shape is a container that also carries a
//! body primitive.
//!
//! Structural operations that touch the scene or other containers live on
//! [`crate::Wires`]; this type holds the per-container state and the handler
//! registration surface.

use std::fmt;

use slotmap::new_key_type;
use wirekit_core::{
    BoundingBox, ContainerError, EventBus, EventBusConfig, EventFilter, Point, Result,
    SubscriptionId,
};
use wirekit_scene::NodeId;

use crate::event::{WiresEvent, WiresEventKind};
use crate::layout::{LayoutId, LayoutKind};

new_key_type! {
    /// Handle to a container owned by [`crate::Wires`].
    pub struct ContainerId;
}

/// Whether drag and position listeners are installed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// No listeners; the container never emits drag or attribute moves.
    #[default]
    Passive,
    /// Listeners installed on the group.
    Interactive { subscriptions: Vec<SubscriptionId> },
}

/// Hook run once at the start of [`crate::Wires::destroy`].
pub type PreDestroyHook = Box<dyn FnOnce(ContainerId) + Send + Sync>;

/// Options for creating a container or shape.
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    /// Layout flavor; the configured default flat grid when unset
    pub layout: Option<LayoutKind>,
    /// Install drag/move listeners at creation and make the group draggable
    pub interactive: bool,
    /// Group id; allocated when unset
    pub id: Option<String>,
    pub location: Point,
    /// Layout and group size
    pub size: Option<(f64, f64)>,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutKind) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.location = Point::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some((width, height));
        self
    }
}

pub struct Container {
    pub(crate) id: ContainerId,
    pub(crate) group: NodeId,
    pub(crate) layout: LayoutId,
    /// Body primitive of a shape
    pub(crate) body: Option<NodeId>,
    pub(crate) parent: Option<ContainerId>,
    pub(crate) child_shapes: Vec<ContainerId>,
    pub(crate) docked_to: Option<ContainerId>,
    pub(crate) dragging: bool,
    pub(crate) interaction: InteractionState,
    pub(crate) destroyed: bool,
    pub(crate) pre_destroy: Option<PreDestroyHook>,
    events: EventBus<WiresEvent>,
}

impl Container {
    pub(crate) fn new(
        id: ContainerId,
        group: NodeId,
        layout: LayoutId,
        body: Option<NodeId>,
        events: EventBusConfig,
    ) -> Self {
        Self {
            id,
            group,
            layout,
            body,
            parent: None,
            child_shapes: Vec::new(),
            docked_to: None,
            dragging: false,
            interaction: InteractionState::Passive,
            destroyed: false,
            pre_destroy: None,
            events: EventBus::with_config(events),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn group(&self) -> NodeId {
        self.group
    }

    pub fn layout(&self) -> LayoutId {
        self.layout
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn is_shape(&self) -> bool {
        self.body.is_some()
    }

    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    /// Child shapes in insertion order.
    pub fn child_shapes(&self) -> &[ContainerId] {
        &self.child_shapes
    }

    pub fn docked_to(&self) -> Option<ContainerId> {
        self.docked_to
    }

    /// Anchor this container to another one. Pure relation: no layout or
    /// child changes follow.
    pub fn set_docked_to(&mut self, docked_to: Option<ContainerId>) -> Result<()> {
        self.ensure_alive()?;
        self.docked_to = docked_to;
        Ok(())
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.interaction, InteractionState::Interactive { .. })
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Install the hook run before teardown, replacing any previous one.
    pub fn set_pre_destroy_hook<F>(&mut self, hook: F) -> Result<()>
    where
        F: FnOnce(ContainerId) + Send + Sync + 'static,
    {
        self.ensure_alive()?;
        self.pre_destroy = Some(Box::new(hook));
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Handler registration
    // ---------------------------------------------------------------------

    pub fn add_move_handler<F>(&self, handler: F) -> Result<SubscriptionId>
    where
        F: Fn(WiresEvent) + Send + Sync + 'static,
    {
        self.add_handler(EventFilter::only(WiresEventKind::Move), handler)
    }

    pub fn add_drag_start_handler<F>(&self, handler: F) -> Result<SubscriptionId>
    where
        F: Fn(WiresEvent) + Send + Sync + 'static,
    {
        self.add_handler(EventFilter::only(WiresEventKind::DragStart), handler)
    }

    pub fn add_drag_move_handler<F>(&self, handler: F) -> Result<SubscriptionId>
    where
        F: Fn(WiresEvent) + Send + Sync + 'static,
    {
        self.add_handler(EventFilter::only(WiresEventKind::DragMove), handler)
    }

    pub fn add_drag_end_handler<F>(&self, handler: F) -> Result<SubscriptionId>
    where
        F: Fn(WiresEvent) + Send + Sync + 'static,
    {
        self.add_handler(EventFilter::only(WiresEventKind::DragEnd), handler)
    }

    /// Register a handler for any combination of event kinds.
    pub fn add_handler<F>(
        &self,
        filter: EventFilter<WiresEventKind>,
        handler: F,
    ) -> Result<SubscriptionId>
    where
        F: Fn(WiresEvent) + Send + Sync + 'static,
    {
        self.ensure_alive()?;
        Ok(self.events.subscribe(filter, handler))
    }

    /// Returns false if the handler was not registered.
    pub fn remove_handler(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn handler_count(&self) -> usize {
        self.events.subscriber_count()
    }

    /// Published events kept when history is enabled.
    pub fn event_history(&self) -> Vec<WiresEvent> {
        self.events.history(None)
    }

    pub(crate) fn fire(&self, kind: WiresEventKind, location: Point) -> usize {
        self.events.publish(WiresEvent::new(kind, self.id, location))
    }

    pub(crate) fn clear_handlers(&self) {
        self.events.clear();
    }

    pub(crate) fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            return Err(ContainerError::Destroyed {
                container: format!("{:?}", self.id),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("group", &self.group)
            .field("layout", &self.layout)
            .field("body", &self.body)
            .field("parent", &self.parent)
            .field("child_shapes", &self.child_shapes)
            .field("docked_to", &self.docked_to)
            .field("dragging", &self.dragging)
            .field("interaction", &self.interaction)
            .field("destroyed", &self.destroyed)
            .field("handlers", &self.events.subscriber_count())
            .finish()
    }
}

/// Geometry snapshot of a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerGeometry {
    pub location: Point,
    pub computed_location: Point,
    pub bounding_box: BoundingBox,
}
