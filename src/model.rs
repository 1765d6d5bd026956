//! The diagram model: workflow nodes, the edges between them, and the rules
//! that keep the edge set well formed.
//!
//! Controllers are the only writers. The renderer reads the model and never
//! mutates it.

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{CanvasError, EdgeRejection};
use crate::exchange::WorkflowGraph;
use crate::geometry::Point;
use crate::selection::Selection;

pub type NodeId = String;
pub type EdgeId = String;

/// The closed set of workflow step kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Trigger,
    Action,
    Condition,
    Delay,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] =
        [NodeKind::Trigger, NodeKind::Action, NodeKind::Condition, NodeKind::Delay];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Trigger => "Trigger",
            NodeKind::Action => "Action",
            NodeKind::Condition => "Condition",
            NodeKind::Delay => "Delay",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an [`NodeKind::Action`] node does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    SendEmail,
    #[serde(rename = "SendSMS")]
    SendSms,
    MakeCall,
    UpdateLead,
    AssignTo,
}

impl ActionType {
    pub const ALL: [ActionType; 5] = [
        ActionType::SendEmail,
        ActionType::SendSms,
        ActionType::MakeCall,
        ActionType::UpdateLead,
        ActionType::AssignTo,
    ];
}

/// Comparison used by condition nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    Contains,
    GreaterThan,
    LessThan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayUnit {
    Minutes,
    Hours,
    Days,
}

/// Right-hand side of a condition: either free text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
}

/// Type-specific fields of a node. Keys are camelCase on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ConditionValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_unit: Option<DelayUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

impl NodeData {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Default::default() }
    }

    pub fn with_action(mut self, action: ActionType) -> Self {
        self.action_type = Some(action);
        self
    }

    /// Shallow merge: every `Some` field of `patch` overwrites ours.
    pub fn merge(&mut self, patch: NodeDataPatch) {
        let NodeDataPatch {
            label,
            description,
            action_type,
            field,
            operator,
            value,
            delay_value,
            delay_unit,
            template_id,
            assignee_id,
        } = patch;

        if let Some(label) = label {
            self.label = label;
        }
        if description.is_some() {
            self.description = description;
        }
        if action_type.is_some() {
            self.action_type = action_type;
        }
        if field.is_some() {
            self.field = field;
        }
        if operator.is_some() {
            self.operator = operator;
        }
        if value.is_some() {
            self.value = value;
        }
        if delay_value.is_some() {
            self.delay_value = delay_value;
        }
        if delay_unit.is_some() {
            self.delay_unit = delay_unit;
        }
        if template_id.is_some() {
            self.template_id = template_id;
        }
        if assignee_id.is_some() {
            self.assignee_id = assignee_id;
        }
    }
}

/// Partial update written by the property editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub action_type: Option<ActionType>,
    pub field: Option<String>,
    pub operator: Option<Operator>,
    pub value: Option<ConditionValue>,
    pub delay_value: Option<f64>,
    pub delay_unit: Option<DelayUnit>,
    pub template_id: Option<String>,
    pub assignee_id: Option<String>,
}

/// A workflow step placed on the canvas. `position` is the top-left corner
/// of its box, in canvas space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Point,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, position: Point, data: NodeData) -> Self {
        Self { id: id.into(), kind, position, data }
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self { id: id.into(), source: source.into(), target: target.into(), label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// `{type}_{ulid}`, e.g. `delay_01J9...`.
pub fn generate_node_id(kind: NodeKind) -> NodeId {
    format!("{}_{}", kind.as_str().to_lowercase(), Ulid::new())
}

/// `e{source}-{target}_{ulid}`.
pub fn generate_edge_id(source: &str, target: &str) -> EdgeId {
    format!("e{source}-{target}_{}", Ulid::new())
}

// ============================================================================
// Edge Validation Framework
// ============================================================================

/// Result of edge validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(EdgeRejection),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }

    pub fn into_result(self) -> Result<(), EdgeRejection> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(reason) => Err(reason),
        }
    }
}

/// A rule a prospective `source -> target` edge must satisfy.
///
/// # Example
///
/// ```
/// use slint_workflow_canvas::{EdgeValidator, Edge, Node, NodeKind, ValidationResult, EdgeRejection};
///
/// /// Triggers start a workflow; nothing may flow into them.
/// struct NoEdgesIntoTriggers;
///
/// impl EdgeValidator for NoEdgesIntoTriggers {
///     fn validate(&self, _source: &str, target: &str, nodes: &[Node], _edges: &[Edge]) -> ValidationResult {
///         match nodes.iter().find(|n| n.id == target) {
///             Some(n) if n.kind == NodeKind::Trigger => {
///                 ValidationResult::Invalid(EdgeRejection::Custom("triggers have no inputs".into()))
///             }
///             _ => ValidationResult::Valid,
///         }
///     }
/// }
/// ```
pub trait EdgeValidator {
    fn validate(&self, source: &str, target: &str, nodes: &[Node], edges: &[Edge]) -> ValidationResult;
}

/// Both endpoints exist and differ.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicEdgeValidator;

impl EdgeValidator for BasicEdgeValidator {
    fn validate(&self, source: &str, target: &str, nodes: &[Node], _edges: &[Edge]) -> ValidationResult {
        if source == target {
            return ValidationResult::Invalid(EdgeRejection::SelfLoop);
        }
        for id in [source, target] {
            if !nodes.iter().any(|n| n.id == id) {
                return ValidationResult::Invalid(EdgeRejection::UnknownNode(id.to_owned()));
            }
        }
        ValidationResult::Valid
    }
}

/// At most one edge per ordered `(source, target)` pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDuplicatesValidator;

impl EdgeValidator for NoDuplicatesValidator {
    fn validate(&self, source: &str, target: &str, _nodes: &[Node], edges: &[Edge]) -> ValidationResult {
        if edges.iter().any(|e| e.connects(source, target)) {
            ValidationResult::Invalid(EdgeRejection::Duplicate)
        } else {
            ValidationResult::Valid
        }
    }
}

/// All validators must pass; the first failure wins.
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn EdgeValidator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules every diagram enforces: no self-loops, no dangling
    /// endpoints, no duplicate pairs.
    pub fn standard() -> Self {
        Self::new().add(BasicEdgeValidator).add(NoDuplicatesValidator)
    }

    pub fn add<V: EdgeValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl EdgeValidator for CompositeValidator {
    fn validate(&self, source: &str, target: &str, nodes: &[Node], edges: &[Edge]) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(source, target, nodes, edges);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

// ============================================================================
// DiagramModel
// ============================================================================

/// Nodes, edges and the current selection.
pub struct DiagramModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    selection: Selection,
    validator: CompositeValidator,
}

impl Default for DiagramModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiagramModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramModel")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl DiagramModel {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            selection: Selection::new(),
            validator: CompositeValidator::standard(),
        }
    }

    /// Build a model from an exchange graph, validating it first.
    pub fn from_graph(graph: WorkflowGraph) -> Result<Self, CanvasError> {
        let mut model = Self::new();
        model.replace(graph)?;
        Ok(model)
    }

    /// Add an application rule on top of the standard edge rules.
    pub fn with_validator<V: EdgeValidator + 'static>(mut self, validator: V) -> Self {
        self.validator = std::mem::take(&mut self.validator).add(validator);
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges.iter().any(|e| e.connects(source, target))
    }

    /// IDs of all edges that start or end at `node_id`.
    pub fn edges_connected_to(&self, node_id: &str) -> Vec<EdgeId> {
        self.edges.iter().filter(|e| e.touches(node_id)).map(|e| e.id.clone()).collect()
    }

    // === Nodes ===

    /// Append a node. Returns `false` if its id is already taken.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.node(&node.id).is_some() {
            tracing::debug!(node_id = %node.id, "node id already in use");
            return false;
        }
        tracing::debug!(node_id = %node.id, kind = %node.kind, "node added");
        self.nodes.push(node);
        true
    }

    /// Create a node with a freshly generated id.
    pub fn create_node(&mut self, kind: NodeKind, position: Point, data: NodeData) -> NodeId {
        let id = generate_node_id(kind);
        self.nodes.push(Node::new(id.clone(), kind, position, data));
        tracing::debug!(node_id = %id, %kind, x = position.x, y = position.y, "node created");
        id
    }

    /// Move a single node. Returns `false` if no such node exists.
    pub fn move_node(&mut self, id: &str, position: Point) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Merge a property-editor patch into a node's data.
    pub fn update_node_data(&mut self, id: &str, patch: NodeDataPatch) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.data.merge(patch);
                true
            }
            None => false,
        }
    }

    // === Edges ===

    /// Check a prospective edge against every rule.
    pub fn validate_edge(&self, source: &str, target: &str) -> ValidationResult {
        self.validator.validate(source, target, &self.nodes, &self.edges)
    }

    /// Append an edge `source -> target` with a generated id.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<EdgeId, EdgeRejection> {
        self.validate_edge(source, target).into_result()?;
        let id = generate_edge_id(source, target);
        self.edges.push(Edge::new(id.clone(), source, target));
        tracing::debug!(edge_id = %id, source, target, "edge added");
        Ok(id)
    }

    // === Selection ===

    pub fn select(&mut self, id: &str) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        self.selection.select(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.selected().and_then(|id| self.node(id))
    }

    // === Whole-graph exchange ===

    /// Snapshot in the exchange format.
    pub fn to_graph(&self) -> WorkflowGraph {
        WorkflowGraph { nodes: self.nodes.clone(), edges: self.edges.clone() }
    }

    /// Replace nodes and edges in one step and clear the selection.
    ///
    /// The graph is validated first; on failure the model is left untouched.
    pub fn replace(&mut self, graph: WorkflowGraph) -> Result<(), CanvasError> {
        graph.validate()?;
        tracing::info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "diagram replaced");
        self.nodes = graph.nodes;
        self.edges = graph.edges;
        self.selection.clear();
        Ok(())
    }

    /// Accept the outcome of an external generation call.
    ///
    /// A well-formed graph replaces the model; an error or an invalid graph
    /// leaves it untouched. Returns whether the model changed.
    pub fn apply_external<E: fmt::Display>(&mut self, outcome: Result<WorkflowGraph, E>) -> bool {
        match outcome {
            Ok(graph) => match self.replace(graph) {
                Ok(()) => true,
                Err(error) => {
                    tracing::warn!(%error, "refusing external workflow graph");
                    false
                }
            },
            Err(error) => {
                tracing::warn!(%error, "external workflow generation failed");
                false
            }
        }
    }
}
