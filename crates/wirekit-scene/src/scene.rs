//! The drawable node tree.
//!
//! `Scene` is the geometry/attribute substrate the wires containers are built
//! on: it stores node frames, parent/child grouping, attribute listeners and
//! drag listeners. Listener payloads are opaque (`L`); the scene only stores
//! and hands them back inside notifications, so the owner decides how to react
//! without the scene ever calling back into it.

use indexmap::IndexMap;
use slotmap::SlotMap;
use tracing::trace;
use wirekit_core::{BoundingBox, Point, SceneError, SubscriptionId};

use crate::batcher::AttributeChangeBatcher;
use crate::node::{Attribute, Node, NodeId, NodeKind, TRANSFORMING_ATTRIBUTES};

/// Result type for scene operations
pub type SceneResult<T> = std::result::Result<T, SceneError>;

#[derive(Debug, Clone)]
struct AttributeSubscription<L> {
    node: NodeId,
    attribute: Attribute,
    listener: L,
}

#[derive(Debug, Clone)]
struct DragSubscription<L> {
    node: NodeId,
    listener: L,
}

/// One coalesced attribute change delivered to one listener.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeNotification<L> {
    pub subscription: SubscriptionId,
    pub node: NodeId,
    /// Every attribute of `node` that changed since the previous flush.
    pub attributes: Vec<Attribute>,
    pub listener: L,
}

/// Phase of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Start,
    Move,
    End,
}

/// A drag gesture step delivered to one listener.
#[derive(Debug, Clone, PartialEq)]
pub struct DragNotification<L> {
    pub subscription: SubscriptionId,
    pub node: NodeId,
    pub phase: DragPhase,
    /// Node location after this step, relative to its parent group.
    pub location: Point,
    pub listener: L,
}

/// In-memory drawable node tree with batched attribute notifications.
#[derive(Debug)]
pub struct Scene<L> {
    nodes: SlotMap<NodeId, Node>,
    attribute_subscriptions: IndexMap<SubscriptionId, AttributeSubscription<L>>,
    drag_subscriptions: IndexMap<SubscriptionId, DragSubscription<L>>,
    batcher: AttributeChangeBatcher,
    active_drag: Option<NodeId>,
    redraw_batches: u64,
}

impl<L: Clone + PartialEq> Default for Scene<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Clone + PartialEq> Scene<L> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            attribute_subscriptions: IndexMap::new(),
            drag_subscriptions: IndexMap::new(),
            batcher: AttributeChangeBatcher::new(),
            active_drag: None,
            redraw_batches: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Node creation and lookup
    // ---------------------------------------------------------------------

    /// Create an empty, detached group.
    pub fn create_group(&mut self) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Group))
    }

    /// Create a detached group with a frame size.
    pub fn create_sized_group(&mut self, width: f64, height: f64) -> NodeId {
        let mut node = Node::new(NodeKind::Group);
        node.width = width;
        node.height = height;
        self.nodes.insert(node)
    }

    /// Create a detached leaf primitive with the given frame.
    pub fn create_primitive(&mut self, frame: BoundingBox) -> NodeId {
        let mut node = Node::new(NodeKind::Primitive);
        node.x = frame.x;
        node.y = frame.y;
        node.width = frame.width;
        node.height = frame.height;
        self.nodes.insert(node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn kind(&self, node: NodeId) -> SceneResult<NodeKind> {
        Ok(self.node(node)?.kind)
    }

    pub fn id(&self, node: NodeId) -> SceneResult<Option<&str>> {
        Ok(self.node(node)?.id.as_deref())
    }

    pub fn set_id(&mut self, node: NodeId, id: impl Into<String>) -> SceneResult<()> {
        self.node_mut(node)?.id = Some(id.into());
        Ok(())
    }

    /// Find a node by its string id.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.id.as_deref() == Some(id))
            .map(|(key, _)| key)
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    /// Location relative to the parent group.
    pub fn position(&self, node: NodeId) -> SceneResult<Point> {
        let n = self.node(node)?;
        Ok(Point::new(n.x, n.y))
    }

    pub fn set_position(&mut self, node: NodeId, position: Point) -> SceneResult<()> {
        self.set_x(node, position.x)?;
        self.set_y(node, position.y)
    }

    pub fn set_x(&mut self, node: NodeId, x: f64) -> SceneResult<()> {
        let n = self.node_mut(node)?;
        if n.x != x {
            n.x = x;
            self.batcher.record(node, Attribute::X);
        }
        Ok(())
    }

    pub fn set_y(&mut self, node: NodeId, y: f64) -> SceneResult<()> {
        let n = self.node_mut(node)?;
        if n.y != y {
            n.y = y;
            self.batcher.record(node, Attribute::Y);
        }
        Ok(())
    }

    pub fn set_size(&mut self, node: NodeId, width: f64, height: f64) -> SceneResult<()> {
        let n = self.node_mut(node)?;
        let width_changed = n.width != width;
        let height_changed = n.height != height;
        n.width = width;
        n.height = height;
        if width_changed {
            self.batcher.record(node, Attribute::Width);
        }
        if height_changed {
            self.batcher.record(node, Attribute::Height);
        }
        Ok(())
    }

    pub fn rotation(&self, node: NodeId) -> SceneResult<f64> {
        Ok(self.node(node)?.rotation)
    }

    pub fn set_rotation(&mut self, node: NodeId, rotation: f64) -> SceneResult<()> {
        let n = self.node_mut(node)?;
        if n.rotation != rotation {
            n.rotation = rotation;
            self.batcher.record(node, Attribute::Rotation);
        }
        Ok(())
    }

    /// Frame of the node in its parent's coordinate space.
    pub fn bounding_box(&self, node: NodeId) -> SceneResult<BoundingBox> {
        let n = self.node(node)?;
        Ok(BoundingBox::new(n.x, n.y, n.width, n.height))
    }

    /// Absolute location, summing the locations of all ancestor groups.
    pub fn computed_location(&self, node: NodeId) -> SceneResult<Point> {
        let mut location = self.position(node)?;
        let mut current = self.node(node)?.parent;
        while let Some(parent) = current {
            let p = self.node(parent)?;
            location = location.translate(Point::new(p.x, p.y));
            current = p.parent;
        }
        Ok(location)
    }

    /// Attributes whose change requires a layout pass.
    pub fn transforming_attributes(&self, node: NodeId) -> SceneResult<&'static [Attribute]> {
        self.node(node)?;
        Ok(&TRANSFORMING_ATTRIBUTES)
    }

    pub fn is_draggable(&self, node: NodeId) -> SceneResult<bool> {
        Ok(self.node(node)?.draggable)
    }

    pub fn set_draggable(&mut self, node: NodeId, draggable: bool) -> SceneResult<()> {
        let n = self.node_mut(node)?;
        if n.draggable != draggable {
            n.draggable = draggable;
            self.batcher.record(node, Attribute::Draggable);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Grouping
    // ---------------------------------------------------------------------

    pub fn parent_group(&self, node: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    pub fn children(&self, group: NodeId) -> SceneResult<&[NodeId]> {
        Ok(&self.node(group)?.children)
    }

    /// Attach `child` as the topmost child of `group`, detaching it from any
    /// previous group first.
    pub fn add_child(&mut self, group: NodeId, child: NodeId) -> SceneResult<()> {
        self.require_group(group)?;
        self.node(child)?;
        if self.is_ancestor_or_self(child, group) {
            return Err(SceneError::WouldCycle {
                group: format!("{:?}", group),
                child: format!("{:?}", child),
            });
        }

        self.detach(child)?;
        self.node_mut(group)?.children.push(child);
        self.node_mut(child)?.parent = Some(group);
        trace!("Attached {:?} to {:?}", child, group);
        Ok(())
    }

    /// Detach `child` from `group`. Returns false if it was not a child.
    pub fn remove_child(&mut self, group: NodeId, child: NodeId) -> SceneResult<bool> {
        self.require_group(group)?;
        let children = &mut self.node_mut(group)?.children;
        let Some(index) = children.iter().position(|c| *c == child) else {
            return Ok(false);
        };
        children.remove(index);
        if let Some(n) = self.nodes.get_mut(child) {
            n.parent = None;
        }
        Ok(true)
    }

    /// Detach every child of `group`, returning them in their former order.
    pub fn remove_all(&mut self, group: NodeId) -> SceneResult<Vec<NodeId>> {
        self.require_group(group)?;
        let children = std::mem::take(&mut self.node_mut(group)?.children);
        for child in &children {
            if let Some(n) = self.nodes.get_mut(*child) {
                n.parent = None;
            }
        }
        Ok(children)
    }

    /// Detach `node` from its parent group, if any.
    pub fn detach(&mut self, node: NodeId) -> SceneResult<()> {
        if let Some(parent) = self.node(node)?.parent {
            self.remove_child(parent, node)?;
        }
        Ok(())
    }

    /// Move `node` to the end of its parent's child list.
    pub fn move_to_top(&mut self, node: NodeId) -> SceneResult<()> {
        let Some(parent) = self.node(node)?.parent else {
            return Ok(());
        };
        let children = &mut self.node_mut(parent)?.children;
        if let Some(index) = children.iter().position(|c| *c == node) {
            let n = children.remove(index);
            children.push(n);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Attribute listeners and batching
    // ---------------------------------------------------------------------

    /// Register `listener` for changes of `attribute` on `node`.
    pub fn subscribe_attribute(
        &mut self,
        node: NodeId,
        attribute: Attribute,
        listener: L,
    ) -> SceneResult<SubscriptionId> {
        self.node(node)?;
        let id = SubscriptionId::new();
        self.attribute_subscriptions.insert(
            id,
            AttributeSubscription {
                node,
                attribute,
                listener,
            },
        );
        Ok(id)
    }

    /// Register `listener` for drag gestures on `node`.
    pub fn subscribe_drag(&mut self, node: NodeId, listener: L) -> SceneResult<SubscriptionId> {
        self.node(node)?;
        let id = SubscriptionId::new();
        self.drag_subscriptions
            .insert(id, DragSubscription { node, listener });
        Ok(id)
    }

    /// Remove an attribute or drag subscription. Returns false if unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.attribute_subscriptions.shift_remove(&id).is_some()
            || self.drag_subscriptions.shift_remove(&id).is_some()
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.attribute_subscriptions.contains_key(&id) || self.drag_subscriptions.contains_key(&id)
    }

    pub fn subscription_count(&self) -> usize {
        self.attribute_subscriptions.len() + self.drag_subscriptions.len()
    }

    /// Drain the batcher and build one notification per (node, listener).
    ///
    /// Listeners registered for several attributes of the same node that
    /// changed in this batch are notified once.
    pub fn flush(&mut self) -> Vec<AttributeNotification<L>> {
        let changes = self.batcher.take();
        let mut notifications = Vec::new();

        for (node, attributes) in changes {
            if !self.nodes.contains_key(node) {
                continue;
            }
            let mut notified: Vec<&L> = Vec::new();
            for (id, subscription) in &self.attribute_subscriptions {
                if subscription.node != node || !attributes.contains(&subscription.attribute) {
                    continue;
                }
                if notified.contains(&&subscription.listener) {
                    continue;
                }
                notified.push(&subscription.listener);
                notifications.push(AttributeNotification {
                    subscription: *id,
                    node,
                    attributes: attributes.clone(),
                    listener: subscription.listener.clone(),
                });
            }
        }

        trace!("Flushed {} attribute notifications", notifications.len());
        notifications
    }

    /// Drop pending changes of `node`.
    pub fn cancel_pending(&mut self, node: NodeId) -> bool {
        self.batcher.cancel(node)
    }

    pub fn has_pending_changes(&self) -> bool {
        self.batcher.has_pending()
    }

    pub fn batcher(&self) -> &AttributeChangeBatcher {
        &self.batcher
    }

    /// Ask the drawing layer to repaint at the next frame.
    pub fn request_redraw_batch(&mut self) {
        self.redraw_batches += 1;
    }

    pub fn redraw_batches(&self) -> u64 {
        self.redraw_batches
    }

    // ---------------------------------------------------------------------
    // Drag gesture source
    // ---------------------------------------------------------------------

    /// Start dragging `node`. Nothing is emitted unless the node is draggable.
    pub fn begin_drag(&mut self, node: NodeId) -> SceneResult<Vec<DragNotification<L>>> {
        if !self.node(node)?.draggable {
            return Ok(Vec::new());
        }
        self.active_drag = Some(node);
        self.drag_notifications(node, DragPhase::Start)
    }

    /// Move the node being dragged to `location`.
    pub fn drag_to(&mut self, node: NodeId, location: Point) -> SceneResult<Vec<DragNotification<L>>> {
        if self.active_drag != Some(node) {
            return Ok(Vec::new());
        }
        self.set_position(node, location)?;
        self.drag_notifications(node, DragPhase::Move)
    }

    /// Finish the gesture on `node`.
    pub fn end_drag(&mut self, node: NodeId) -> SceneResult<Vec<DragNotification<L>>> {
        if self.active_drag != Some(node) {
            return Ok(Vec::new());
        }
        self.active_drag = None;
        self.drag_notifications(node, DragPhase::End)
    }

    pub fn active_drag(&self) -> Option<NodeId> {
        self.active_drag
    }

    fn drag_notifications(
        &self,
        node: NodeId,
        phase: DragPhase,
    ) -> SceneResult<Vec<DragNotification<L>>> {
        let location = self.position(node)?;
        Ok(self
            .drag_subscriptions
            .iter()
            .filter(|(_, s)| s.node == node)
            .map(|(id, s)| DragNotification {
                subscription: *id,
                node,
                phase,
                location,
                listener: s.listener.clone(),
            })
            .collect())
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn node(&self, node: NodeId) -> SceneResult<&Node> {
        self.nodes.get(node).ok_or_else(|| SceneError::UnknownNode {
            node: format!("{:?}", node),
        })
    }

    fn node_mut(&mut self, node: NodeId) -> SceneResult<&mut Node> {
        self.nodes.get_mut(node).ok_or_else(|| SceneError::UnknownNode {
            node: format!("{:?}", node),
        })
    }

    fn require_group(&self, node: NodeId) -> SceneResult<()> {
        match self.node(node)?.kind {
            NodeKind::Group => Ok(()),
            NodeKind::Primitive => Err(SceneError::NotAGroup {
                node: format!("{:?}", node),
            }),
        }
    }

    /// True if `candidate` is `node` or one of its ancestors.
    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == candidate {
                return true;
            }
            current = self.nodes.get(n).and_then(|n| n.parent);
        }
        false
    }
}
