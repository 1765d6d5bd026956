//! Drawing a new edge from a source handle to a target handle.
//!
//! ```text
//! Idle --press source handle--> Connecting --release on target handle--> Idle (edge requested)
//!                                          \--release anywhere else----> Idle (cancelled)
//! ```
//!
//! While connecting, pointer moves only update the preview; the diagram model
//! is written once, on a successful release, and only if the edge passes the
//! model's validation.

use crate::config::CanvasConfig;
use crate::geometry::Point;
use crate::hit_test::{handle_anchor, HandleKind};
use crate::model::{DiagramModel, EdgeId, NodeId};
use crate::path::{generate_preview_path, CubicBezier};

/// An in-progress connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState {
    pub source_node_id: NodeId,
    /// Source handle anchor, canvas space.
    pub start_anchor: Point,
    /// Latest pointer position, canvas space.
    pub live_pointer: Point,
}

/// Result of releasing the pointer while connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new edge was appended to the model.
    Connected(EdgeId),
    /// Released on a target handle, but the model refused the edge.
    Rejected,
    /// Released somewhere that is not a target handle.
    Cancelled,
    /// No connection was in progress.
    Idle,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionController {
    state: Option<ConnectionState>,
}

impl ConnectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&ConnectionState> {
        self.state.as_ref()
    }

    pub fn is_connecting(&self) -> bool {
        self.state.is_some()
    }

    /// Press on `node_id`'s source handle with the pointer at `pointer` (canvas space).
    ///
    /// Replaces a connection that is still in progress. Returns `false` if
    /// the node does not exist.
    pub fn begin(
        &mut self,
        model: &DiagramModel,
        node_id: &str,
        pointer: Point,
        config: &CanvasConfig,
    ) -> bool {
        let Some(node) = model.node(node_id) else {
            tracing::debug!(node_id, "connection start on unknown node ignored");
            return false;
        };
        let start_anchor = handle_anchor(node, HandleKind::Source, config);
        self.state = Some(ConnectionState {
            source_node_id: node.id.clone(),
            start_anchor,
            live_pointer: pointer,
        });
        tracing::debug!(node_id, x = start_anchor.x, y = start_anchor.y, "connection started");
        true
    }

    /// Follow the pointer. Returns `true` while a connection is in progress.
    pub fn update(&mut self, pointer: Point) -> bool {
        match &mut self.state {
            Some(state) => {
                state.live_pointer = pointer;
                true
            }
            None => false,
        }
    }

    /// Release on `target_node_id`'s target handle.
    pub fn finish(&mut self, model: &mut DiagramModel, target_node_id: &str) -> ConnectOutcome {
        let Some(state) = self.state.take() else {
            return ConnectOutcome::Idle;
        };
        match model.add_edge(&state.source_node_id, target_node_id) {
            Ok(id) => {
                tracing::debug!(edge_id = %id, "connection completed");
                ConnectOutcome::Connected(id)
            }
            Err(reason) => {
                tracing::debug!(
                    source = %state.source_node_id,
                    target = target_node_id,
                    %reason,
                    "connection rejected"
                );
                ConnectOutcome::Rejected
            }
        }
    }

    /// Release anywhere that is not a target handle.
    pub fn cancel(&mut self) -> ConnectOutcome {
        match self.state.take() {
            Some(state) => {
                tracing::debug!(source = %state.source_node_id, "connection cancelled");
                ConnectOutcome::Cancelled
            }
            None => ConnectOutcome::Idle,
        }
    }

    /// Dashed preview curve from the source anchor to the pointer, canvas space.
    pub fn preview_curve(&self, config: &CanvasConfig) -> Option<CubicBezier> {
        self.state
            .as_ref()
            .map(|s| CubicBezier::preview(s.start_anchor, s.live_pointer, config.preview_offset))
    }

    /// SVG commands of the preview curve, canvas space.
    pub fn preview_path(&self, config: &CanvasConfig) -> Option<String> {
        self.state
            .as_ref()
            .map(|s| generate_preview_path(s.start_anchor, s.live_pointer, config.preview_offset))
    }
}
