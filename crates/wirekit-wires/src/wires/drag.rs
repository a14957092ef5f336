//! Drag gesture entry points.

use tracing::trace;
use wirekit_core::{Point, Result};
use wirekit_scene::{DragNotification, DragPhase, NodeId};

use super::Wires;
use crate::event::WiresEventKind;
use crate::listener::Listener;

impl Wires {
    /// Start dragging `node`. Returns the number of container events fired.
    pub fn begin_drag(&mut self, node: NodeId) -> Result<usize> {
        let notifications = self.scene.begin_drag(node)?;
        Ok(self.dispatch_drag(notifications))
    }

    /// Move the dragged node to (x, y), then run one frame so listeners see
    /// the new position while the drag is still active.
    pub fn drag_to(&mut self, node: NodeId, x: f64, y: f64) -> Result<usize> {
        let notifications = self.scene.drag_to(node, Point::new(x, y))?;
        let fired = self.dispatch_drag(notifications);
        self.tick();
        Ok(fired)
    }

    /// Finish the drag of `node`.
    pub fn end_drag(&mut self, node: NodeId) -> Result<usize> {
        let notifications = self.scene.end_drag(node)?;
        Ok(self.dispatch_drag(notifications))
    }

    fn dispatch_drag(&mut self, notifications: Vec<DragNotification<Listener>>) -> usize {
        let mut fired = 0;
        for notification in notifications {
            let Listener::ContainerDrag { container } = notification.listener else {
                continue;
            };
            let Some(c) = self.containers.get_mut(container) else {
                continue;
            };
            if c.destroyed {
                continue;
            }
            let kind = match notification.phase {
                DragPhase::Start => {
                    c.dragging = true;
                    WiresEventKind::DragStart
                }
                DragPhase::Move => {
                    c.dragging = true;
                    WiresEventKind::DragMove
                }
                DragPhase::End => {
                    c.dragging = false;
                    WiresEventKind::DragEnd
                }
            };
            trace!("Container {:?}: {}", container, kind);
            c.fire(kind, notification.location);
            fired += 1;
        }
        fired
    }
}
