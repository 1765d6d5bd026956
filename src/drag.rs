//! Repositioning a single node by dragging it.
//!
//! The controller moves between two states:
//!
//! ```text
//! Idle --begin--> Dragging --drop--> Idle
//! ```
//!
//! While dragging, every drag-over event recomputes the node's position as
//! `pointer - offset`, where `offset` is the pointer's distance from the
//! node's top-left corner at drag start. Only that one node is touched.

use crate::geometry::Point;
use crate::model::{DiagramModel, NodeId};

/// 1x1 transparent GIF. Native drag-and-drop insists on a drag image; this
/// keeps the node from being drawn twice under the cursor.
pub const EMPTY_DRAG_IMAGE: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

/// What the host should show under the cursor while a node is dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    pub image: &'static str,
    pub hotspot: Point,
}

impl DragPreview {
    pub const EMPTY: DragPreview = DragPreview { image: EMPTY_DRAG_IMAGE, hotspot: Point::ZERO };
}

/// The node being dragged and where the pointer grabbed it.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub node_id: NodeId,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// How a drop event should be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A node drag finished; the node already sits where it was dropped.
    Repositioned(NodeId),
    /// No node drag was active, so the drop introduces a new node.
    NewNode,
}

#[derive(Debug, Clone, Default)]
pub struct NodeDragController {
    state: Option<DragState>,
}

impl NodeDragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    /// Start dragging `node_id`, grabbed at `pointer` (canvas space).
    ///
    /// A drag that is still active is replaced. Unknown nodes are ignored and
    /// return `None`.
    pub fn begin(&mut self, model: &DiagramModel, node_id: &str, pointer: Point) -> Option<DragPreview> {
        let Some(node) = model.node(node_id) else {
            tracing::debug!(node_id, "drag start on unknown node ignored");
            return None;
        };

        if let Some(previous) = self.state.take() {
            tracing::debug!(previous = %previous.node_id, node_id, "replacing active node drag");
        }

        let offset = pointer - node.position;
        self.state = Some(DragState {
            node_id: node.id.clone(),
            offset_x: offset.x,
            offset_y: offset.y,
        });
        tracing::debug!(node_id, offset_x = offset.x, offset_y = offset.y, "node drag started");
        Some(DragPreview::EMPTY)
    }

    /// Move the dragged node so the grab point follows `pointer` (canvas space).
    ///
    /// Returns `true` if a node was moved.
    pub fn drag_over(&self, model: &mut DiagramModel, pointer: Point) -> bool {
        let Some(state) = &self.state else {
            return false;
        };
        let position = Point::new(pointer.x - state.offset_x, pointer.y - state.offset_y);
        tracing::trace!(node_id = %state.node_id, x = position.x, y = position.y, "node dragged");
        model.move_node(&state.node_id, position)
    }

    /// Finish the gesture.
    pub fn end(&mut self) -> DropOutcome {
        match self.state.take() {
            Some(state) => {
                tracing::debug!(node_id = %state.node_id, "node drag ended");
                DropOutcome::Repositioned(state.node_id)
            }
            None => DropOutcome::NewNode,
        }
    }

    /// Abandon the drag, leaving the node where the last drag-over put it.
    pub fn cancel(&mut self) {
        self.state = None;
    }
}
