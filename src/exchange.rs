//! The `{ nodes, edges }` record exchanged with the workflow generator, the
//! suggestion service and the property/report views.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};
use crate::geometry::Point;
use crate::model::{ActionType, ConditionValue, DelayUnit, Edge, Node, NodeData, NodeKind, Operator};

/// A complete workflow diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl WorkflowGraph {
    /// Structural checks a graph must pass before it may replace the model:
    /// unique ids, edges between existing nodes, no self-loops, no
    /// duplicate `(source, target)` pairs.
    pub fn validate(&self) -> Result<()> {
        fn invalid(reason: String) -> Result<()> {
            Err(CanvasError::InvalidGraph { reason })
        }

        let mut node_ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return invalid(format!("duplicate node id '{}'", node.id));
            }
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        let mut pairs = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            if !edge_ids.insert(edge.id.as_str()) {
                return invalid(format!("duplicate edge id '{}'", edge.id));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint.as_str()) {
                    return invalid(format!("edge '{}' references unknown node '{endpoint}'", edge.id));
                }
            }
            if edge.source == edge.target {
                return invalid(format!("edge '{}' connects '{}' to itself", edge.id, edge.source));
            }
            if !pairs.insert((edge.source.as_str(), edge.target.as_str())) {
                return invalid(format!(
                    "more than one edge from '{}' to '{}'",
                    edge.source, edge.target
                ));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the text a generator returned.
    ///
    /// Tolerates surrounding whitespace and a ```` ```json ```` fence. Both
    /// `nodes` and `edges` must be present.
    pub fn from_response_text(text: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Raw {
            nodes: Option<Vec<Node>>,
            edges: Option<Vec<Edge>>,
        }

        let raw: Raw = serde_json::from_str(strip_code_fence(text))?;
        match (raw.nodes, raw.edges) {
            (Some(nodes), Some(edges)) => Ok(Self { nodes, edges }),
            _ => Err(CanvasError::InvalidGraph {
                reason: "response is missing `nodes` or `edges`".to_owned(),
            }),
        }
    }

    /// The lead-nurture workflow the builder opens with.
    pub fn demo() -> Self {
        let node = |id: &str, kind, x, y, data| Node::new(id, kind, Point::new(x, y), data);

        let nodes = vec![
            node("1", NodeKind::Trigger, 50.0, 150.0, NodeData::labeled("New Lead Created")),
            node(
                "2",
                NodeKind::Action,
                300.0,
                150.0,
                NodeData {
                    template_id: Some("template_welcome".into()),
                    ..NodeData::labeled("Send Welcome Email").with_action(ActionType::SendEmail)
                },
            ),
            node(
                "3",
                NodeKind::Delay,
                550.0,
                150.0,
                NodeData {
                    delay_value: Some(2.0),
                    delay_unit: Some(DelayUnit::Days),
                    ..NodeData::labeled("Wait 2 Days")
                },
            ),
            node(
                "4",
                NodeKind::Condition,
                800.0,
                150.0,
                NodeData {
                    field: Some("last_email_opened".into()),
                    operator: Some(Operator::Equals),
                    value: Some(ConditionValue::Text("true".into())),
                    ..NodeData::labeled("Lead Opened Email?")
                },
            ),
            node(
                "5",
                NodeKind::Action,
                1050.0,
                50.0,
                NodeData {
                    assignee_id: Some("user_sales_1".into()),
                    ..NodeData::labeled("Assign to Sales Rep").with_action(ActionType::AssignTo)
                },
            ),
            node(
                "6",
                NodeKind::Action,
                1050.0,
                250.0,
                NodeData {
                    template_id: Some("template_followup".into()),
                    ..NodeData::labeled("Send Follow-up SMS").with_action(ActionType::SendSms)
                },
            ),
        ];

        let edges = vec![
            Edge::new("e1-2", "1", "2"),
            Edge::new("e2-3", "2", "3"),
            Edge::new("e3-4", "3", "4"),
            Edge::new("e4-5", "4", "5").with_label("Yes"),
            Edge::new("e4-6", "4", "6").with_label("No"),
        ];

        Self { nodes, edges }
    }
}

/// Category of a suggestion returned by the review service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Improvement,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub suggestion: String,
}

/// Parse a suggestion response. A response without a `suggestions` list
/// means "nothing to suggest".
pub fn parse_suggestions(text: &str) -> Result<Vec<WorkflowSuggestion>> {
    #[derive(Deserialize)]
    struct Raw {
        #[serde(default)]
        suggestions: Option<Vec<WorkflowSuggestion>>,
    }

    let raw: Raw = serde_json::from_str(strip_code_fence(text))?;
    Ok(raw.suggestions.unwrap_or_default())
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text).trim_start();
    text.strip_suffix("```").unwrap_or(text).trim_end()
}
