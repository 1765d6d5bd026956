//! Test harness wiring a canvas to Slint models the way an application does.
//!
//! Provides a complete setup with event logging and helper methods for
//! simulating user interactions in raw pointer coordinates.

#![allow(dead_code)]

use super::{init_tracing, EventLog};
use slint::{Color, Model, SharedString, VecModel};
use slint_workflow_canvas::{
    handle_anchor, to_viewport_space, CanvasConfig, CanvasHandle, DragPayload, DragPreview,
    EdgeRenderer, HandleKind, Node, NodeData, NodeKind, NodeRenderer, Point, ViewportRect,
    WorkflowCanvas, WorkflowGraph,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Screen rectangle of the canvas element in every harness.
pub const VIEWPORT: ViewportRect = ViewportRect::new(0.0, 0.0, 1200.0, 800.0);

/// Row of the edge list model, as a `.slint` struct would declare it.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct EdgeRow {
    pub id: SharedString,
    pub path_commands: SharedString,
    pub arrow_commands: SharedString,
    pub label: SharedString,
    pub label_x: f32,
    pub label_y: f32,
}

/// Row of the node list model.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct NodeRow {
    pub id: SharedString,
    pub label: SharedString,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub selected: bool,
    pub border: Color,
    pub icon: SharedString,
}

/// Two nodes side by side: `A` (Trigger) at (50,150) and `B` (Action) at (300,150).
pub fn two_node_graph() -> WorkflowGraph {
    WorkflowGraph {
        nodes: vec![
            Node::new("A", NodeKind::Trigger, Point::new(50.0, 150.0), NodeData::labeled("Start")),
            Node::new("B", NodeKind::Action, Point::new(300.0, 150.0), NodeData::labeled("Next")),
        ],
        edges: vec![],
    }
}

pub struct CanvasTestHarness {
    pub canvas: CanvasHandle,
    pub edges: Rc<VecModel<EdgeRow>>,
    pub nodes: Rc<VecModel<NodeRow>>,
    edge_renderer: EdgeRenderer,
    node_renderer: NodeRenderer,
    pub log: EventLog,
}

impl CanvasTestHarness {
    /// Harness with the two-node fixture and default configuration.
    pub fn new() -> Self {
        Self::with_graph(two_node_graph())
    }

    /// Harness with the six-node demo workflow.
    pub fn demo() -> Self {
        Self::with_graph(WorkflowGraph::demo())
    }

    pub fn with_graph(graph: WorkflowGraph) -> Self {
        Self::with_config_and_graph(CanvasConfig::default(), graph)
    }

    pub fn with_config_and_graph(config: CanvasConfig, graph: WorkflowGraph) -> Self {
        let mut canvas = WorkflowCanvas::new(config).unwrap();
        canvas.load_graph(graph).unwrap();
        Self::with_canvas(canvas)
    }

    pub fn with_canvas(mut canvas: WorkflowCanvas) -> Self {
        init_tracing();
        canvas.set_viewport_rect(VIEWPORT);

        let edges = Rc::new(VecModel::<EdgeRow>::default());
        let mut edge_renderer = EdgeRenderer::new();
        edge_renderer.bind_model(edges.clone(), |e| EdgeRow {
            id: e.id.as_str().into(),
            path_commands: e.path_commands.as_str().into(),
            arrow_commands: e.arrow_commands.as_str().into(),
            label: e.label.as_deref().unwrap_or_default().into(),
            label_x: e.label_position.x,
            label_y: e.label_position.y,
        });

        let nodes = Rc::new(VecModel::<NodeRow>::default());
        let mut node_renderer = NodeRenderer::new();
        node_renderer.bind_model(nodes.clone(), |n| NodeRow {
            id: n.id.as_str().into(),
            label: n.label.as_str().into(),
            x: n.x,
            y: n.y,
            width: n.width,
            height: n.height,
            selected: n.selected,
            border: n.visual.border,
            icon: n.visual.icon.into(),
        });

        let mut harness = Self {
            canvas: CanvasHandle::from_canvas(canvas),
            edges,
            nodes,
            edge_renderer,
            node_renderer,
            log: EventLog::new(),
        };
        harness.refresh();
        harness
    }

    /// Re-render into the bound models, as the UI does after each event.
    pub fn refresh(&mut self) {
        let canvas = self.canvas.borrow();
        let transform = canvas.transform();
        self.edge_renderer.update(canvas.model(), canvas.config(), &transform);
        self.node_renderer.update(canvas.model(), canvas.config(), &transform);
        *self.log.refreshes.borrow_mut() += 1;
    }

    // === Coordinates ===

    /// Raw pointer position over a canvas point under the current transform.
    pub fn screen_of(&self, p: Point) -> Point {
        let canvas = self.canvas.borrow();
        to_viewport_space(p, canvas.viewport_rect().as_ref(), &canvas.transform())
    }

    fn handle(&self, node_id: &str, handle: HandleKind) -> Point {
        let anchor = {
            let canvas = self.canvas.borrow();
            let node = canvas.model().node(node_id).unwrap_or_else(|| panic!("no node {node_id}"));
            handle_anchor(node, handle, canvas.config())
        };
        self.screen_of(anchor)
    }

    /// Raw position of a node's output handle.
    pub fn source_handle(&self, node_id: &str) -> Point {
        self.handle(node_id, HandleKind::Source)
    }

    /// Raw position of a node's input handle.
    pub fn target_handle(&self, node_id: &str) -> Point {
        self.handle(node_id, HandleKind::Target)
    }

    /// Raw position inside a node's body, away from both handles.
    pub fn node_body(&self, node_id: &str) -> Point {
        let p = {
            let canvas = self.canvas.borrow();
            canvas.model().node(node_id).unwrap().position.offset(60.0, 20.0)
        };
        self.screen_of(p)
    }

    pub fn node_position(&self, node_id: &str) -> Point {
        self.canvas.borrow().model().node(node_id).unwrap().position
    }

    pub fn edge_count(&self) -> usize {
        self.canvas.borrow().model().edges().len()
    }

    pub fn node_count(&self) -> usize {
        self.canvas.borrow().model().nodes().len()
    }

    // === Pointer ===

    pub fn press(&mut self, p: Point) {
        let outcome = self.canvas.borrow_mut().pointer_down(p.x, p.y);
        self.log.presses.borrow_mut().push(outcome);
        self.refresh();
    }

    pub fn move_to(&mut self, p: Point) {
        self.canvas.borrow_mut().pointer_move(p.x, p.y);
        self.refresh();
    }

    pub fn release(&mut self, p: Point) {
        let outcome = self.canvas.borrow_mut().pointer_up(p.x, p.y);
        self.log.releases.borrow_mut().push(outcome);
        self.refresh();
    }

    pub fn click(&mut self, p: Point) {
        self.press(p);
        self.release(p);
    }

    /// Press, move in `steps` increments, release.
    pub fn press_drag(&mut self, from: Point, to: Point, steps: usize) {
        self.press(from);
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.move_to(Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t));
        }
        self.release(to);
    }

    /// Draw a connection from `source`'s output to `target`'s input.
    pub fn connect(&mut self, source: &str, target: &str) {
        let from = self.source_handle(source);
        let to = self.target_handle(target);
        self.press_drag(from, to, 4);
    }

    pub fn wheel(&mut self, delta: f32, at: Point) {
        self.canvas.borrow_mut().wheel(delta, at.x, at.y);
        self.refresh();
    }

    // === Drag and drop ===

    /// Drag a node by its body from its current place by `(dx, dy)` pixels.
    pub fn drag_node(&mut self, node_id: &str, dx: f32, dy: f32, steps: usize) -> Option<DragPreview> {
        let start = self.node_body(node_id);
        let preview = self.canvas.borrow_mut().node_drag_start(node_id, start.x, start.y);
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.canvas.borrow_mut().drag_over(start.x + dx * t, start.y + dy * t);
        }
        let result = self.canvas.borrow_mut().drop_at(start.x + dx, start.y + dy, None);
        self.log.drops.borrow_mut().push(result);
        self.refresh();
        preview
    }

    /// Drop a palette template at a raw position.
    pub fn drop_template(&mut self, payload: &DragPayload, at: Point) {
        let text = payload.to_text().unwrap();
        let result = self.canvas.borrow_mut().drop_at(at.x, at.y, Some(&text));
        self.log.drops.borrow_mut().push(result);
        self.refresh();
    }

    // === Models ===

    pub fn edge_row(&self, index: usize) -> EdgeRow {
        self.edges.row_data(index).unwrap()
    }

    pub fn node_row(&self, node_id: &str) -> NodeRow {
        (0..self.nodes.row_count())
            .filter_map(|i| self.nodes.row_data(i))
            .find(|row| row.id.as_str() == node_id)
            .unwrap_or_else(|| panic!("no row for {node_id}"))
    }
}
