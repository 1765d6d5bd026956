//! # Slint Workflow Canvas
//!
//! The interaction core of a visual workflow builder: an infinite, pannable and
//! zoomable canvas on which workflow steps (triggers, actions, conditions,
//! delays) are placed, dragged and wired together.
//!
//! ## Features
//!
//! - **Headless Core** - Every gesture is a plain state transition that can be
//!   driven and tested without a window
//! - **Exact Coordinate Mapping** - Raw pointer positions map into canvas space
//!   through the inverse of the render transform
//! - **Validated Edges** - Self-loops and duplicate connections are refused;
//!   applications add their own rules through [`EdgeValidator`]
//! - **Slint Bindings** - Rendered edges and nodes sync into `VecModel`s
//!
//! ## Core Pieces
//!
//! - [`WorkflowCanvas`] - Routes pointer, wheel and drop events; owns the model
//! - [`ViewportController`] - Pan and zoom state
//! - [`NodeDragController`] - Repositions one node per drag
//! - [`ConnectionController`] - Draws new edges from source to target handles
//! - [`DiagramModel`] - Nodes, edges and selection
//!
//! ## Rust Helpers
//!
//! - [`to_canvas_space`] - Map raw pointer coordinates into canvas space
//! - [`generate_edge_path`] - SVG path for an edge between two anchors
//! - [`hit_test`] - Resolve what lies under the pointer
//! - [`find_edge_at`] - Hit-test edges along their rendered curve
//! - [`generate_dot_grid_commands`] - Background dots that follow the view
//! - [`EdgeRenderer`] / [`NodeRenderer`] - Render and sync to Slint models

pub mod canvas;
pub mod config;
pub mod connection;
pub mod drag;
pub mod error;
pub mod exchange;
pub mod geometry;
pub mod grid;
pub mod model;
pub mod palette;
pub mod path;
pub mod render;
pub mod selection;
pub mod viewport;

pub use canvas::{CanvasHandle, DropResult, Gesture, PressOutcome, WorkflowCanvas};
pub use config::{CanvasConfig, WheelAnchor};
pub use connection::{ConnectOutcome, ConnectionController, ConnectionState};
pub use drag::{DragPreview, DragState, DropOutcome, NodeDragController, EMPTY_DRAG_IMAGE};
pub use error::{CanvasError, EdgeRejection, Result};
pub use exchange::{parse_suggestions, SuggestionKind, WorkflowGraph, WorkflowSuggestion};
pub use geometry::{
    clamp_scale, to_canvas_space, to_viewport_space, Point, ViewTransform, ViewportRect, MAX_SCALE,
    MIN_SCALE,
};
pub use grid::{generate_dot_grid_commands, DotGrid};
pub use hit_test::{
    find_edge_at, find_handle_at, find_node_at, handle_anchor, hit_test, HandleKind, HitTarget,
    NodeBox,
};
pub use model::{
    generate_edge_id, generate_node_id, ActionType, ConditionValue, DelayUnit, DiagramModel, Edge,
    EdgeId, Node, NodeData, NodeDataPatch, NodeId, NodeKind, Operator,
    // Edge validation framework
    BasicEdgeValidator, CompositeValidator, EdgeValidator, NoDuplicatesValidator, ValidationResult,
};
pub use palette::{default_templates, DragPayload, DRAG_PAYLOAD_FORMAT};
pub use path::{
    arrowhead, arrowhead_path, distance_to_bezier, generate_edge_path, generate_preview_path,
    CubicBezier,
};
pub use render::{
    render_edge, render_edges, render_nodes, EdgeRenderer, NodeRenderer, NodeVisual,
    NodeVisualKind, RenderedEdge, RenderedNode,
};
pub use selection::Selection;
pub use viewport::{ViewportController, ZoomDirection};
