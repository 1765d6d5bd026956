//! The interactive canvas: routes pointer, wheel and drag-and-drop events to
//! the viewport, node-drag and connection controllers, and owns the diagram
//! model they write to.
//!
//! All event methods take raw pointer coordinates (the same space as the
//! viewport rectangle reported by [`WorkflowCanvas::set_viewport_rect`]).
//!
//! # Example
//!
//! ```ignore
//! use slint_workflow_canvas::{CanvasConfig, CanvasHandle, WorkflowGraph};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let canvas = CanvasHandle::new(CanvasConfig::default()).unwrap();
//!     canvas.borrow_mut().load_graph(WorkflowGraph::demo()).unwrap();
//!
//!     window.on_pointer_down(canvas.pointer_down_callback());
//!     window.on_pointer_move(canvas.pointer_move_callback());
//!     window.on_pointer_up(canvas.pointer_up_callback());
//!     window.on_wheel(canvas.wheel_callback());
//!     window.on_drop(canvas.drop_callback());
//!
//!     window.run().unwrap();
//! }
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use slint::SharedString;

use crate::config::CanvasConfig;
use crate::connection::{ConnectOutcome, ConnectionController};
use crate::drag::{DragPreview, DropOutcome, NodeDragController};
use crate::error::Result;
use crate::exchange::WorkflowGraph;
use crate::geometry::{to_canvas_space, Point, ViewTransform, ViewportRect};
use crate::grid::DotGrid;
use crate::hit_test::{find_edge_at, hit_test, HandleKind, HitTarget};
use crate::model::{DiagramModel, Edge, NodeDataPatch, NodeId};
use crate::palette::DragPayload;
use crate::path::CubicBezier;
use crate::render::{render_edges, render_nodes, RenderedEdge, RenderedNode};
use crate::viewport::ViewportController;

/// The gesture currently in progress. At most one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Idle,
    Panning,
    DraggingNode,
    Connecting,
}

/// What a pointer press started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// Pressed a source handle; a connection is being drawn.
    Connecting(NodeId),
    /// Pressed a node body or target handle; the node is now selected.
    Selected(NodeId),
    /// Pressed the background; the view follows the pointer.
    Panning,
    /// Another gesture is still active.
    Ignored,
}

/// What a drop did to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropResult {
    /// A node drag finished.
    Repositioned(NodeId),
    /// A palette template became a new node.
    Created(NodeId),
    /// Nothing changed: no payload, a bad payload, or no measured viewport.
    Ignored,
}

pub struct WorkflowCanvas {
    config: CanvasConfig,
    model: DiagramModel,
    viewport: ViewportController,
    drag: NodeDragController,
    connection: ConnectionController,
    /// Unknown until the host has laid the canvas out.
    viewport_rect: Option<ViewportRect>,
}

impl fmt::Debug for WorkflowCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowCanvas")
            .field("model", &self.model)
            .field("transform", &self.viewport.transform())
            .field("gesture", &self.gesture())
            .field("viewport_rect", &self.viewport_rect)
            .finish_non_exhaustive()
    }
}

impl WorkflowCanvas {
    /// Create an empty canvas. Fails if `config` is unusable.
    pub fn new(config: CanvasConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            viewport: ViewportController::new(&config),
            config,
            model: DiagramModel::new(),
            drag: NodeDragController::new(),
            connection: ConnectionController::new(),
            viewport_rect: None,
        })
    }

    /// Use `model` instead of the empty one, keeping its validators.
    pub fn with_model(mut self, model: DiagramModel) -> Self {
        self.model = model;
        self
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn model(&self) -> &DiagramModel {
        &self.model
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn transform(&self) -> ViewTransform {
        self.viewport.transform()
    }

    pub fn drag(&self) -> &NodeDragController {
        &self.drag
    }

    pub fn connection(&self) -> &ConnectionController {
        &self.connection
    }

    pub fn gesture(&self) -> Gesture {
        if self.connection.is_connecting() {
            Gesture::Connecting
        } else if self.drag.is_dragging() {
            Gesture::DraggingNode
        } else if self.viewport.is_panning() {
            Gesture::Panning
        } else {
            Gesture::Idle
        }
    }

    // === Viewport geometry ===

    /// Record where the canvas element sits on screen.
    pub fn set_viewport_rect(&mut self, rect: ViewportRect) {
        self.viewport_rect = Some(rect);
    }

    pub fn viewport_rect(&self) -> Option<ViewportRect> {
        self.viewport_rect
    }

    /// Map a raw pointer position into canvas space.
    pub fn to_canvas(&self, x: f32, y: f32) -> Point {
        to_canvas_space(x, y, self.viewport_rect.as_ref(), &self.viewport.transform())
    }

    /// Raw pointer position relative to the canvas element.
    fn to_local(&self, x: f32, y: f32) -> Point {
        let origin = self.viewport_rect.map(|r| r.origin()).unwrap_or(Point::ZERO);
        Point::new(x, y) - origin
    }

    // === Pointer ===

    /// Pointer pressed at a raw position.
    ///
    /// Handles take precedence over node bodies, node bodies over the
    /// background. A node drag still open at this point was abandoned by the
    /// host without a drop and is cancelled first.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> PressOutcome {
        if self.node_drag_end() {
            tracing::debug!("stale node drag cancelled by a new press");
        }
        if self.gesture() != Gesture::Idle {
            tracing::debug!(gesture = ?self.gesture(), "press ignored while a gesture is active");
            return PressOutcome::Ignored;
        }

        let p = self.to_canvas(x, y);
        match hit_test(p, self.model.nodes(), &self.config) {
            HitTarget::Handle { node_id, handle: HandleKind::Source } => {
                self.connection.begin(&self.model, &node_id, p, &self.config);
                PressOutcome::Connecting(node_id)
            }
            HitTarget::Handle { node_id, handle: HandleKind::Target } | HitTarget::Node(node_id) => {
                self.model.select(&node_id);
                PressOutcome::Selected(node_id)
            }
            HitTarget::Background => {
                self.viewport.begin_pan(Point::new(x, y));
                PressOutcome::Panning
            }
        }
    }

    /// Pointer moved. Returns `true` if anything visible changed.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        match self.gesture() {
            Gesture::Connecting => {
                let p = self.to_canvas(x, y);
                tracing::trace!(x = p.x, y = p.y, "connection preview moved");
                self.connection.update(p)
            }
            Gesture::Panning => self.viewport.continue_pan(Point::new(x, y)),
            Gesture::DraggingNode | Gesture::Idle => false,
        }
    }

    /// Pointer released. Completes or cancels a connection and ends a pan.
    pub fn pointer_up(&mut self, x: f32, y: f32) -> ConnectOutcome {
        self.viewport.end_pan();
        if !self.connection.is_connecting() {
            return ConnectOutcome::Idle;
        }

        let p = self.to_canvas(x, y);
        match hit_test(p, self.model.nodes(), &self.config) {
            HitTarget::Handle { node_id, handle: HandleKind::Target } => {
                self.connection.finish(&mut self.model, &node_id)
            }
            _ => self.connection.cancel(),
        }
    }

    /// Wheel scrolled by `delta` (positive zooms out) with the pointer at a
    /// raw position.
    pub fn wheel(&mut self, delta: f32, x: f32, y: f32) {
        let cursor = self.to_local(x, y);
        self.viewport.wheel(delta, cursor);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }

    pub fn zoom_percent(&self) -> i32 {
        self.viewport.zoom_percent()
    }

    // === Drag and drop ===

    /// Native drag started on a node body.
    ///
    /// Returns the drag image the host must install, or `None` when the drag
    /// is refused (unknown node, or a connection or pan is in progress).
    pub fn node_drag_start(&mut self, node_id: &str, x: f32, y: f32) -> Option<DragPreview> {
        if self.connection.is_connecting() || self.viewport.is_panning() {
            tracing::debug!(node_id, gesture = ?self.gesture(), "node drag refused");
            return None;
        }
        let p = self.to_canvas(x, y);
        self.drag.begin(&self.model, node_id, p)
    }

    /// Drag moved over the canvas. Returns `true` if a node moved.
    pub fn drag_over(&mut self, x: f32, y: f32) -> bool {
        let p = self.to_canvas(x, y);
        self.drag.drag_over(&mut self.model, p)
    }

    /// Native drag ended without a drop (cancelled, or released outside the
    /// canvas). Returns `true` if a node drag was open.
    pub fn node_drag_end(&mut self) -> bool {
        let Some(state) = self.drag.state() else {
            return false;
        };
        tracing::debug!(node_id = %state.node_id, "node drag abandoned without a drop");
        self.drag.cancel();
        true
    }

    /// Something was dropped on the canvas.
    ///
    /// Ends an active node drag; otherwise `payload` is read as a palette
    /// template and a new node is centered under the pointer.
    pub fn drop_at(&mut self, x: f32, y: f32, payload: Option<&str>) -> DropResult {
        match self.drag.end() {
            DropOutcome::Repositioned(id) => DropResult::Repositioned(id),
            DropOutcome::NewNode => self.place_template(x, y, payload.unwrap_or_default()),
        }
    }

    fn place_template(&mut self, x: f32, y: f32, payload: &str) -> DropResult {
        if self.viewport_rect.is_none() {
            tracing::debug!("drop before the canvas was measured ignored");
            return DropResult::Ignored;
        }
        let payload = match DragPayload::from_text(payload) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(error = %err, "drop without a usable palette payload ignored");
                return DropResult::Ignored;
            }
        };

        let (half_w, half_h) = self.config.half_node_size();
        let position = self.to_canvas(x, y).offset(-half_w, -half_h);
        let id = self.model.create_node(payload.kind, position, payload.node_data());
        DropResult::Created(id)
    }

    // === Model writes from collaborators ===

    pub fn select(&mut self, node_id: &str) -> bool {
        self.model.select(node_id)
    }

    pub fn clear_selection(&mut self) {
        self.model.clear_selection();
    }

    /// Property editor write path.
    pub fn update_node_data(&mut self, node_id: &str, patch: NodeDataPatch) -> bool {
        self.model.update_node_data(node_id, patch)
    }

    /// Replace the whole diagram. In-flight gestures are dropped with it.
    pub fn load_graph(&mut self, graph: WorkflowGraph) -> Result<()> {
        self.model.replace(graph)?;
        self.abort_gestures();
        Ok(())
    }

    /// Apply the outcome of an asynchronous generation request. Failures and
    /// malformed graphs leave the diagram untouched.
    pub fn apply_generated<E: fmt::Display>(&mut self, outcome: std::result::Result<WorkflowGraph, E>) -> bool {
        let replaced = self.model.apply_external(outcome);
        if replaced {
            self.abort_gestures();
        }
        replaced
    }

    /// Parse a generator's raw response text and apply it.
    pub fn apply_generated_text(&mut self, text: &str) -> bool {
        self.apply_generated(WorkflowGraph::from_response_text(text))
    }

    pub fn export_graph(&self) -> WorkflowGraph {
        self.model.to_graph()
    }

    fn abort_gestures(&mut self) {
        self.drag.cancel();
        self.connection.cancel();
        self.viewport.end_pan();
    }

    // === Rendering ===

    /// Edges in viewport space.
    pub fn rendered_edges(&self) -> Vec<RenderedEdge> {
        render_edges(&self.model, &self.config, &self.viewport.transform())
    }

    /// Nodes in viewport space.
    pub fn rendered_nodes(&self) -> Vec<RenderedNode> {
        render_nodes(&self.model, &self.config, &self.viewport.transform())
    }

    /// The dashed connection preview in viewport space.
    pub fn preview_curve(&self) -> Option<CubicBezier> {
        let t = self.viewport.transform();
        self.connection
            .preview_curve(&self.config)
            .map(|c| c.scaled(t.scale, Point::new(t.x, t.y)))
    }

    pub fn preview_path(&self) -> Option<String> {
        self.preview_curve().map(|c| c.to_svg())
    }

    pub fn dot_grid(&self) -> Option<DotGrid> {
        DotGrid::for_transform(&self.viewport.transform(), self.config.grid_spacing)
    }

    /// Edge under a raw pointer position, if any.
    pub fn edge_at(&self, x: f32, y: f32, hover_distance: f32) -> Option<&Edge> {
        let p = self.to_canvas(x, y);
        let scale = self.viewport.transform().scale;
        find_edge_at(p, self.model.nodes(), self.model.edges(), &self.config, hover_distance / scale, 20)
    }
}

/// Shared handle to a [`WorkflowCanvas`] for wiring into Slint callbacks.
///
/// Clone this handle to share it across callbacks.
#[derive(Clone)]
pub struct CanvasHandle {
    inner: Rc<RefCell<WorkflowCanvas>>,
}

impl CanvasHandle {
    pub fn new(config: CanvasConfig) -> Result<Self> {
        Ok(Self::from_canvas(WorkflowCanvas::new(config)?))
    }

    pub fn from_canvas(canvas: WorkflowCanvas) -> Self {
        Self { inner: Rc::new(RefCell::new(canvas)) }
    }

    pub fn borrow(&self) -> Ref<'_, WorkflowCanvas> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, WorkflowCanvas> {
        self.inner.borrow_mut()
    }

    /// Callback for `pointer-down(x, y)`.
    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32) {
        let inner = self.inner.clone();
        move |x, y| {
            inner.borrow_mut().pointer_down(x, y);
        }
    }

    /// Callback for `pointer-move(x, y)`.
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32) {
        let inner = self.inner.clone();
        move |x, y| {
            inner.borrow_mut().pointer_move(x, y);
        }
    }

    /// Callback for `pointer-up(x, y)`.
    pub fn pointer_up_callback(&self) -> impl Fn(f32, f32) {
        let inner = self.inner.clone();
        move |x, y| {
            inner.borrow_mut().pointer_up(x, y);
        }
    }

    /// Callback for `wheel(delta, x, y)`.
    pub fn wheel_callback(&self) -> impl Fn(f32, f32, f32) {
        let inner = self.inner.clone();
        move |delta, x, y| inner.borrow_mut().wheel(delta, x, y)
    }

    /// Callback for `node-drag-started(node_id, x, y)`. Returns the drag
    /// image to install, empty when the drag is refused.
    pub fn node_drag_start_callback(&self) -> impl Fn(SharedString, f32, f32) -> SharedString {
        let inner = self.inner.clone();
        move |node_id, x, y| {
            inner
                .borrow_mut()
                .node_drag_start(&node_id, x, y)
                .map(|preview| SharedString::from(preview.image))
                .unwrap_or_default()
        }
    }

    /// Callback for `drag-over(x, y)`.
    pub fn drag_over_callback(&self) -> impl Fn(f32, f32) {
        let inner = self.inner.clone();
        move |x, y| {
            inner.borrow_mut().drag_over(x, y);
        }
    }

    /// Callback for `node-drag-ended()`, fired when a native drag finishes
    /// without a drop on the canvas.
    pub fn node_drag_end_callback(&self) -> impl Fn() {
        let inner = self.inner.clone();
        move || {
            inner.borrow_mut().node_drag_end();
        }
    }

    /// Callback for `drop(x, y, payload)`. An empty payload means no palette data.
    pub fn drop_callback(&self) -> impl Fn(f32, f32, SharedString) {
        let inner = self.inner.clone();
        move |x, y, payload| {
            let payload = (!payload.is_empty()).then_some(payload.as_str());
            inner.borrow_mut().drop_at(x, y, payload);
        }
    }

    /// Callback returning the SVG commands of the connection preview, empty
    /// when no connection is being drawn.
    pub fn preview_path_callback(&self) -> impl Fn() -> SharedString {
        let inner = self.inner.clone();
        move || inner.borrow().preview_path().map(SharedString::from).unwrap_or_default()
    }
}
