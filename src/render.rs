//! Visual output computed from the diagram model and the view transform.
//!
//! Nothing here is persistent state of the diagram: every call recomputes
//! from the model. The renderers only cache their last output so it can be
//! pushed into Slint models.
//!
//! # Example
//!
//! ```ignore
//! let mut edges = EdgeRenderer::new();
//! let model = Rc::new(VecModel::<EdgePath>::default());
//! edges.bind_model(model.clone(), |edge| EdgePath {
//!     id: edge.id.as_str().into(),
//!     path_commands: edge.path_commands.as_str().into(),
//!     arrow_commands: edge.arrow_commands.as_str().into(),
//! });
//! window.set_edges(ModelRc::from(model));
//!
//! // After every state change
//! edges.update(canvas.model(), canvas.config(), &canvas.transform());
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use slint::{Color, Model, VecModel};

use crate::config::CanvasConfig;
use crate::geometry::{Point, ViewTransform};
use crate::hit_test::{handle_anchor, HandleKind};
use crate::model::{ActionType, DiagramModel, EdgeId, Node, NodeId, NodeKind};
use crate::path::{arrowhead, arrowhead_path, CubicBezier};

/// Arrowhead size at scale 1.
pub const ARROW_LENGTH: f32 = 12.0;
pub const ARROW_WIDTH: f32 = 12.0;

// ============================================================================
// Node visuals
// ============================================================================

/// The closed set of looks a node can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeVisualKind {
    Trigger,
    /// Action without an action type yet.
    Action,
    ActionOf(ActionType),
    Condition,
    Delay,
}

impl NodeVisualKind {
    pub fn of(node: &Node) -> Self {
        match (node.kind, node.data.action_type) {
            (NodeKind::Trigger, _) => NodeVisualKind::Trigger,
            (NodeKind::Action, Some(action)) => NodeVisualKind::ActionOf(action),
            (NodeKind::Action, None) => NodeVisualKind::Action,
            (NodeKind::Condition, _) => NodeVisualKind::Condition,
            (NodeKind::Delay, _) => NodeVisualKind::Delay,
        }
    }

    pub fn visual(self) -> NodeVisual {
        let (icon, [border, background, foreground]) = match self {
            NodeVisualKind::Trigger => ("play", [0x22c55e, 0xdcfce7, 0x16a34a]),
            NodeVisualKind::Action => ("user-check", [0x3b82f6, 0xdbeafe, 0x2563eb]),
            NodeVisualKind::Condition => ("split", [0xeab308, 0xfef9c3, 0xca8a04]),
            NodeVisualKind::Delay => ("timer", [0xa855f7, 0xf3e8ff, 0x9333ea]),
            NodeVisualKind::ActionOf(action) => match action {
                ActionType::SendEmail => ("mail", [0x0ea5e9, 0xe0f2fe, 0x0284c7]),
                ActionType::SendSms => ("message-square-text", [0x6366f1, 0xe0e7ff, 0x4f46e5]),
                ActionType::MakeCall => ("phone", [0xf43f5e, 0xffe4e6, 0xe11d48]),
                ActionType::UpdateLead => ("user-check", [0x14b8a6, 0xccfbf1, 0x0d9488]),
                ActionType::AssignTo => ("users", [0xf97316, 0xffedd5, 0xea580c]),
            },
        };
        NodeVisual {
            icon,
            border: rgb(border),
            icon_background: rgb(background),
            icon_foreground: rgb(foreground),
        }
    }
}

fn rgb(hex: u32) -> Color {
    Color::from_argb_encoded(0xff00_0000 | hex)
}

/// How a node box is drawn: accent border and icon badge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    /// Icon name from the host's icon set.
    pub icon: &'static str,
    pub border: Color,
    pub icon_background: Color,
    pub icon_foreground: Color,
}

impl NodeVisual {
    pub fn of(node: &Node) -> Self {
        NodeVisualKind::of(node).visual()
    }
}

// ============================================================================
// Rendered output
// ============================================================================

/// One edge ready to draw, in the coordinate space it was rendered for.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEdge {
    pub id: EdgeId,
    pub curve: CubicBezier,
    pub path_commands: String,
    /// Closed triangle whose tip touches the target anchor.
    pub arrow_commands: String,
    pub label: Option<String>,
    /// Where the label is centered: the curve midpoint, lifted by the
    /// configured label offset.
    pub label_position: Point,
}

/// One node box ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub selected: bool,
    pub visual: NodeVisual,
}

/// Render one edge between two nodes.
pub fn render_edge(
    id: &str,
    label: Option<&str>,
    source: &Node,
    target: &Node,
    config: &CanvasConfig,
    transform: &ViewTransform,
) -> RenderedEdge {
    let canvas_curve = CubicBezier::edge(
        handle_anchor(source, HandleKind::Source, config),
        handle_anchor(target, HandleKind::Target, config),
        config.curvature,
    );
    let curve = canvas_curve.scaled(transform.scale, Point::new(transform.x, transform.y));

    let mut direction = curve.derivative(1.0);
    if direction.distance_sq(Point::ZERO) <= f32::EPSILON {
        direction = curve.p3 - curve.p0;
    }
    let arrow = arrowhead(
        curve.p3,
        direction,
        ARROW_LENGTH * transform.scale,
        ARROW_WIDTH * transform.scale,
    );

    let mid = curve.midpoint();
    RenderedEdge {
        id: id.to_owned(),
        curve,
        path_commands: curve.to_svg(),
        arrow_commands: arrowhead_path(&arrow),
        label: label.map(str::to_owned),
        label_position: mid.offset(0.0, config.label_offset * transform.scale),
    }
}

/// Render every edge of the model. Edges whose endpoints are missing are
/// skipped.
pub fn render_edges(
    model: &DiagramModel,
    config: &CanvasConfig,
    transform: &ViewTransform,
) -> Vec<RenderedEdge> {
    let by_id: HashMap<&str, &Node> = model.nodes().iter().map(|n| (n.id.as_str(), n)).collect();
    model
        .edges()
        .iter()
        .filter_map(|edge| {
            let source = *by_id.get(edge.source.as_str())?;
            let target = *by_id.get(edge.target.as_str())?;
            Some(render_edge(&edge.id, edge.label.as_deref(), source, target, config, transform))
        })
        .collect()
}

/// Render every node of the model, in drawing order.
pub fn render_nodes(
    model: &DiagramModel,
    config: &CanvasConfig,
    transform: &ViewTransform,
) -> Vec<RenderedNode> {
    let selected = model.selection().selected();
    model
        .nodes()
        .iter()
        .map(|node| {
            let origin = transform.apply(node.position);
            RenderedNode {
                id: node.id.clone(),
                kind: node.kind,
                label: node.data.label.clone(),
                x: origin.x,
                y: origin.y,
                width: config.node_width * transform.scale,
                height: config.node_height * transform.scale,
                selected: selected == Some(node.id.as_str()),
                visual: NodeVisual::of(node),
            }
        })
        .collect()
}

// ============================================================================
// Slint model sync
// ============================================================================

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer<T> {
    fn sync(&self, items: &[T]);
}

/// Concrete implementation of ModelSyncer for a specific row type.
struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<T, P, F> ModelSyncer<T> for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&T) -> P,
{
    fn sync(&self, items: &[T]) {
        // Update existing rows or add new ones
        for (i, item) in items.iter().enumerate() {
            let row = (self.constructor)(item);
            if i < self.model.row_count() {
                self.model.set_row_data(i, row);
            } else {
                self.model.push(row);
            }
        }
        // Remove excess rows
        while self.model.row_count() > items.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

/// Keeps the last rendered rows and mirrors them into a bound Slint model.
struct Rendered<T> {
    items: Vec<T>,
    syncer: Option<Box<dyn ModelSyncer<T>>>,
}

impl<T: 'static> Rendered<T> {
    fn new() -> Self {
        Self { items: Vec::new(), syncer: None }
    }

    fn bind<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&T) -> P + 'static,
    {
        let syncer = ConcreteModelSyncer { model, constructor };
        syncer.sync(&self.items);
        self.syncer = Some(Box::new(syncer));
    }

    fn set(&mut self, items: Vec<T>) {
        self.items = items;
        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.items);
        }
    }
}

/// Renders the model's edges and keeps a bound Slint model in step.
pub struct EdgeRenderer {
    rendered: Rendered<RenderedEdge>,
}

impl Default for EdgeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeRenderer {
    pub fn new() -> Self {
        Self { rendered: Rendered::new() }
    }

    /// Bind to a Slint model for automatic synchronization.
    ///
    /// The model is filled immediately, then refreshed by every
    /// [`update`](Self::update).
    pub fn bind_model<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&RenderedEdge) -> P + 'static,
    {
        self.rendered.bind(model, constructor);
    }

    /// Recompute every edge from the model.
    pub fn update(&mut self, model: &DiagramModel, config: &CanvasConfig, transform: &ViewTransform) {
        self.rendered.set(render_edges(model, config, transform));
    }

    pub fn edges(&self) -> &[RenderedEdge] {
        &self.rendered.items
    }
}

/// Renders the model's nodes and keeps a bound Slint model in step.
pub struct NodeRenderer {
    rendered: Rendered<RenderedNode>,
}

impl Default for NodeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRenderer {
    pub fn new() -> Self {
        Self { rendered: Rendered::new() }
    }

    /// Bind to a Slint model for automatic synchronization.
    pub fn bind_model<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&RenderedNode) -> P + 'static,
    {
        self.rendered.bind(model, constructor);
    }

    pub fn update(&mut self, model: &DiagramModel, config: &CanvasConfig, transform: &ViewTransform) {
        self.rendered.set(render_nodes(model, config, transform));
    }

    pub fn nodes(&self) -> &[RenderedNode] {
        &self.rendered.items
    }
}
